//! Built-in seed applications.
//!
//! Six submissions sharing one mock CV payload. The payload is kept exactly as
//! it was captured, including its missing trailing padding.

use chrono::{DateTime, Utc};

use crate::entity::{Application, ApplicationStatus, FinalYearModule, PersonalDetails};
use crate::error::{AdmissionsError, Result};

/// Base64 of a one-page dummy PDF shared by every seed application.
pub const MOCK_CV_BASE64: &str = "\
    JVBERi0xLjQKJdPr6eEKMSAwIG9iago8PAovVHlwZSAvQ2F0YWxvZwovUGFnZXMgMiAwIFIKPj4K\
    ZW5kb2JqCjIgMCBvYmoKPDwKL1R5cGUgL1BhZ2VzCi9LaWRzIFszIDAgUl0KL0NvdW50IDEKPD4K\
    ZW5kb2JqCjMgMCBvYmoKPDwKL1R5cGUgL1BhZ2UKL1BhcmVudCAyIDAgUgovUmVzb3VyY2VzIDw8\
    Ci9Gb250IDw8Ci9GMSA0IDAgUgo+Pgo+PgovTWVkaWFCb3ggWzAgMCA2MTIgNzkyXQovQ29udGVu\
    dHMgNSAwIFIKPj4KZW5kb2JqCjQgMCBvYmoKPDwKL1R5cGUgL0ZvbnQKL1N1YnR5cGUgL1R5cGUx\
    Ci9CYXNlRm9udCAvSGVsdmV0aWNhCj4+CmVuZG9iago1IDAgb2JqCjw8Ci9MZW5ndGggNDQKPj4K\
    c3RyZWFtCkJUIAovRjEgMTIgVGYKNzIgNzIwIFRkCihTYW1wbGUgQ1YpIFRqCkVUCmVuZHN0cmVh\
    bQplbmRvYmoKeHJlZgowIDYKMDAwMDAwMDAwMCA2NTUzNSBmIAowMDAwMDAwMDA5IDAwMDAwIG4g\
    CjAwMDAwMDAwNTggMDAwMDAgbiAKMDAwMDAwMDExNSAwMDAwMCBuIAowMDAwMDAMDI0NSAwMDAwM\
    CBuIAowMDAwMDAwMzIzIDAwMDAwIG4gCnRyYWlsZXIKPDwKL1NpemUgNgovUm9vdCAxIDAgUgo+P\
    gpzdGFydHhyZWYKNDE1CiUlRU9G";

struct Seed<'a> {
    id: &'a str,
    person: [&'a str; 5],
    course: &'a str,
    modules: [(&'a str, &'a str, f64); 4],
    cv_file_name: &'a str,
    status: ApplicationStatus,
    submitted: &'a str,
    average_mark: f64,
}

impl Seed<'_> {
    fn build(&self) -> Result<Application> {
        let [full_name, id_number, email, phone_number, address] = self.person;
        let submission_date = DateTime::parse_from_rfc3339(self.submitted)
            .map_err(|e| {
                AdmissionsError::Validation(format!(
                    "{}: bad submission date '{}': {}",
                    self.id, self.submitted, e
                ))
            })?
            .with_timezone(&Utc);

        Ok(Application {
            id: self.id.to_string(),
            personal_details: PersonalDetails {
                full_name: full_name.to_string(),
                id_number: id_number.to_string(),
                email: email.to_string(),
                phone_number: phone_number.to_string(),
                address: address.to_string(),
            },
            course_code: self.course.to_string(),
            final_year_modules: self
                .modules
                .iter()
                .map(|(code, name, mark)| FinalYearModule {
                    module_code: code.to_string(),
                    module_name: name.to_string(),
                    mark: *mark,
                })
                .collect(),
            cv_file: MOCK_CV_BASE64.to_string(),
            cv_file_name: self.cv_file_name.to_string(),
            application_status: self.status,
            submission_date,
            average_mark: self.average_mark,
        })
    }
}

/// The seed collection, in fixture order.
///
/// # Errors
/// `Validation` when a seed carries a malformed submission date.
pub fn applications() -> Result<Vec<Application>> {
    SEEDS.iter().map(Seed::build).collect()
}

const SEEDS: [Seed<'static>; 6] = [
    Seed {
        id: "app-001",
        person: [
            "Sarah Johnson",
            "9801125678901",
            "sarah.johnson@email.com",
            "+27 11 234 5678",
            "123 Main Street, Johannesburg, 2001",
        ],
        course: "DS-ADVANCED",
        modules: [
            ("STAT301", "Advanced Statistics", 85.0),
            ("CS302", "Machine Learning", 92.0),
            ("MATH303", "Linear Algebra", 78.0),
            ("DS304", "Data Visualization", 88.0),
        ],
        cv_file_name: "sarah_johnson_cv.pdf",
        status: ApplicationStatus::Pending,
        submitted: "2024-01-15T10:30:00Z",
        average_mark: 85.75,
    },
    Seed {
        id: "app-002",
        person: [
            "Michael Chen",
            "9505148901234",
            "michael.chen@email.com",
            "+27 21 345 6789",
            "456 Oak Avenue, Cape Town, 8001",
        ],
        course: "DS-FUNDAMENTALS",
        modules: [
            ("STAT201", "Statistics Fundamentals", 75.0),
            ("CS201", "Programming Basics", 82.0),
            ("MATH202", "Calculus", 70.0),
            ("DS203", "Data Analysis", 79.0),
        ],
        cv_file_name: "michael_chen_cv.pdf",
        status: ApplicationStatus::Approved,
        submitted: "2024-01-12T14:20:00Z",
        average_mark: 76.5,
    },
    Seed {
        id: "app-003",
        person: [
            "Priya Patel",
            "9701203456789",
            "priya.patel@email.com",
            "+27 31 456 7890",
            "789 Sunset Boulevard, Durban, 4001",
        ],
        course: "DS-ADVANCED",
        modules: [
            ("STAT301", "Advanced Statistics", 95.0),
            ("CS302", "Machine Learning", 89.0),
            ("MATH303", "Linear Algebra", 91.0),
            ("DS304", "Data Visualization", 87.0),
        ],
        cv_file_name: "priya_patel_cv.pdf",
        status: ApplicationStatus::Pending,
        submitted: "2024-01-18T09:45:00Z",
        average_mark: 90.5,
    },
    Seed {
        id: "app-004",
        person: [
            "James Robertson",
            "9203157890123",
            "james.robertson@email.com",
            "+27 12 567 8901",
            "321 Pine Street, Pretoria, 0001",
        ],
        course: "DS-FUNDAMENTALS",
        modules: [
            ("STAT201", "Statistics Fundamentals", 58.0),
            ("CS201", "Programming Basics", 62.0),
            ("MATH202", "Calculus", 45.0),
            ("DS203", "Data Analysis", 55.0),
        ],
        cv_file_name: "james_robertson_cv.pdf",
        status: ApplicationStatus::Rejected,
        submitted: "2024-01-10T16:15:00Z",
        average_mark: 55.0,
    },
    Seed {
        id: "app-005",
        person: [
            "Nomsa Mthembu",
            "9012258901234",
            "nomsa.mthembu@email.com",
            "+27 33 678 9012",
            "654 Valley Road, Pietermaritzburg, 3201",
        ],
        course: "DS-SPECIALIST",
        modules: [
            ("STAT401", "Advanced Statistical Modeling", 93.0),
            ("CS402", "Deep Learning", 88.0),
            ("MATH403", "Optimization Theory", 85.0),
            ("DS404", "Big Data Analytics", 90.0),
        ],
        cv_file_name: "nomsa_mthembu_cv.pdf",
        status: ApplicationStatus::Approved,
        submitted: "2024-01-20T11:30:00Z",
        average_mark: 89.0,
    },
    Seed {
        id: "app-006",
        person: [
            "David Kim",
            "9406129876543",
            "david.kim@email.com",
            "+27 11 789 0123",
            "987 Elm Street, Sandton, 2146",
        ],
        course: "DS-SPECIALIST",
        modules: [
            ("STAT401", "Advanced Statistical Modeling", 77.0),
            ("CS402", "Deep Learning", 73.0),
            ("MATH403", "Optimization Theory", 69.0),
            ("DS404", "Big Data Analytics", 75.0),
        ],
        cv_file_name: "david_kim_cv.pdf",
        status: ApplicationStatus::Pending,
        submitted: "2024-01-22T15:45:00Z",
        average_mark: 73.5,
    },
];
