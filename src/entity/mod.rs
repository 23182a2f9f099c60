mod application;

pub use application::{
    Application, ApplicationStatus, FinalYearModule, PersonalDetails, AVERAGE_MARK_TOLERANCE,
};

pub(crate) use application::validate_applications;
