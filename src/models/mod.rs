mod direction;
mod feedback;
mod holiday;
mod journey_link;
mod service_day;
mod station;
mod timetable;
mod verification;

pub use direction::{Direction, DirectionFilter};
pub use feedback::{parse_delay_minutes, DelayReport, FEEDBACK_EMAIL, FEEDBACK_TYPE};
pub use holiday::{is_public_holiday, parse_holidays, Holiday, HolidayCalendar};
pub use journey_link::JourneyLink;
pub use service_day::{day_name, ServiceDay};
pub use station::Station;
pub use timetable::{StationSchedule, Timetable};
pub use verification::{
    add_pending, generate_time_id, parse_pending, DispatchPayload, DispatchRequest, PendingVerification,
    PendingVerifications, VerificationRecord, VerifiedSet, VerifiedTimesFile,
};
