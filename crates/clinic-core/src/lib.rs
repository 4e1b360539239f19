pub mod dates;
pub mod error;
pub mod outcome;
pub mod pagination;
pub mod records;
pub mod resource;

pub use error::{CoreError, ErrorCategory, Result};
pub use outcome::{OperationResult, Severity};
pub use pagination::{PageMeta, Pagination, DEFAULT_PAGE_SIZE};
pub use records::{
    Appointment, AppointmentStatus, ClinicService, Episode, EpisodeStatus, EpisodeTemplate,
    Patient, Role, Staff, StaffType,
};
pub use resource::{CountSummary, Resource, ResourceKind, filter_active, filter_by_text};
pub use dates::{ClinicDate, ClinicDateTime, age_in_years, days_between, now_utc, today_utc};
