//! List view engine: status tab, text/course filters, sort, and pagination.
//!
//! [`ViewState`] is immutable. Every interaction produces a new state, and
//! [`ViewState::render`] turns a record slice into the visible [`ListPage`].

use std::cmp::Ordering;

use serde::Serialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::entity::{Application, ApplicationStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    FullName,
    AverageMark,
    SubmissionDate,
    CourseCode,
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortField::FullName => write!(f, "fullName"),
            SortField::AverageMark => write!(f, "averageMark"),
            SortField::SubmissionDate => write!(f, "submissionDate"),
            SortField::CourseCode => write!(f, "courseCode"),
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "fullname" | "name" => Ok(SortField::FullName),
            "averagemark" | "mark" => Ok(SortField::AverageMark),
            "submissiondate" | "date" => Ok(SortField::SubmissionDate),
            "coursecode" | "course" => Ok(SortField::CourseCode),
            _ => Err(format!("Invalid sort field: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(format!("Invalid sort direction: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    /// Newest submissions first.
    fn default() -> Self {
        Self {
            field: SortField::SubmissionDate,
            direction: SortDirection::Desc,
        }
    }
}

impl SortSpec {
    /// Same field flips direction; a different field starts ascending.
    pub fn toggled(self, field: SortField) -> Self {
        if self.field == field {
            Self {
                field,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                field,
                direction: SortDirection::Asc,
            }
        }
    }

    pub fn compare(&self, a: &Application, b: &Application) -> Ordering {
        let ordering = match self.field {
            SortField::FullName => locale_compare(a.full_name(), b.full_name()),
            SortField::CourseCode => locale_compare(&a.course_code, &b.course_code),
            SortField::AverageMark => a.average_mark.total_cmp(&b.average_mark),
            SortField::SubmissionDate => a.submission_date.cmp(&b.submission_date),
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Collation-style string order.
///
/// Letters compare without accents or case first ("Émile" sorts with "emile",
/// before "Zanele"). Ties are broken by accents, unaccented first, and then by
/// case, lowercase first.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| a.to_lowercase().nfd().cmp(b.to_lowercase().nfd()))
        .then_with(|| b.nfd().cmp(a.nfd()))
}

fn base_letters(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase", tag = "kind", content = "code")]
pub enum CourseFilter {
    #[default]
    All,
    Course(String),
}

impl CourseFilter {
    pub fn matches(&self, course_code: &str) -> bool {
        match self {
            CourseFilter::All => true,
            CourseFilter::Course(code) => code == course_code,
        }
    }
}

impl std::fmt::Display for CourseFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CourseFilter::All => write!(f, "all"),
            CourseFilter::Course(code) => write!(f, "{}", code),
        }
    }
}

impl std::str::FromStr for CourseFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(CourseFilter::All)
        } else {
            Ok(CourseFilter::Course(s.to_string()))
        }
    }
}

/// Everything that decides which rows are visible.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub tab: ApplicationStatus,
    pub search: String,
    pub course: CourseFilter,
    pub sort: SortSpec,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PAGE_SIZE)
    }
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            tab: ApplicationStatus::Pending,
            search: String::new(),
            course: CourseFilter::All,
            sort: SortSpec::default(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    // Filter changes go back to the first page.

    pub fn with_tab(&self, tab: ApplicationStatus) -> Self {
        Self {
            tab,
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_search(&self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_course(&self, course: CourseFilter) -> Self {
        Self {
            course,
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_sort(&self, sort: SortSpec) -> Self {
        Self {
            sort,
            ..self.clone()
        }
    }

    pub fn toggle_sort(&self, field: SortField) -> Self {
        self.with_sort(self.sort.toggled(field))
    }

    pub fn next_page(&self, total_pages: usize) -> Self {
        Self {
            page: (self.page + 1).min(total_pages.max(1)),
            ..self.clone()
        }
    }

    pub fn previous_page(&self) -> Self {
        Self {
            page: self.page.saturating_sub(1).max(1),
            ..self.clone()
        }
    }

    pub fn go_to_page(&self, page: usize, total_pages: usize) -> Self {
        Self {
            page: page.clamp(1, total_pages.max(1)),
            ..self.clone()
        }
    }

    /// True when `app` passes the tab, search, and course filters.
    pub fn matches(&self, app: &Application) -> bool {
        if app.application_status != self.tab {
            return false;
        }
        if !self.search.is_empty() {
            let name_hit = app
                .full_name()
                .to_lowercase()
                .contains(&self.search.to_lowercase());
            // ID numbers are digits, so the match is exact.
            let id_hit = app.id_number().contains(self.search.as_str());
            if !name_hit && !id_hit {
                return false;
            }
        }
        self.course.matches(&app.course_code)
    }

    /// Filtered and sorted rows, before pagination.
    pub fn visible<'a>(&self, records: &'a [Application]) -> Vec<&'a Application> {
        let mut rows = filter_records(records, self);
        sort_records(&mut rows, self.sort);
        rows
    }

    /// The page of rows this state shows. A stale page is clamped into range.
    pub fn render<'a>(&self, records: &'a [Application]) -> ListPage<'a> {
        paginate(self.visible(records), self.page, self.page_size)
    }
}

pub fn filter_records<'a>(records: &'a [Application], state: &ViewState) -> Vec<&'a Application> {
    records.iter().filter(|app| state.matches(app)).collect()
}

/// Stable sort; equal keys keep their input order in both directions.
pub fn sort_records(rows: &mut [&Application], sort: SortSpec) {
    rows.sort_by(|a, b| sort.compare(a, b));
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// One page of rows plus the numbers needed for the pager.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListPage<'a> {
    pub rows: Vec<&'a Application>,
    /// 1-based, always within `1..=max(total_pages, 1)`.
    pub page: usize,
    pub total_pages: usize,
    pub total_matching: usize,
    pub page_size: usize,
}

impl ListPage<'_> {
    pub fn is_empty(&self) -> bool {
        self.total_matching == 0
    }

    /// 1-based index of the first row on this page, 0 when empty.
    pub fn first_index(&self) -> usize {
        if self.rows.is_empty() {
            0
        } else {
            (self.page - 1) * self.page_size + 1
        }
    }

    /// 1-based index of the last row on this page, 0 when empty.
    pub fn last_index(&self) -> usize {
        if self.rows.is_empty() {
            0
        } else {
            self.first_index() + self.rows.len() - 1
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

pub fn paginate(rows: Vec<&Application>, page: usize, page_size: usize) -> ListPage<'_> {
    let page_size = page_size.max(1);
    let total_matching = rows.len();
    let total_pages = total_pages(total_matching, page_size);
    let page = page.clamp(1, total_pages.max(1));
    let start = (page - 1) * page_size;

    let rows = rows.into_iter().skip(start).take(page_size).collect();

    ListPage {
        rows,
        page,
        total_pages,
        total_matching,
        page_size,
    }
}
