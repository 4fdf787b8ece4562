pub mod photo_state;
pub mod record;
pub mod role;
pub mod status;
pub mod stored;

pub use photo_state::PhotoState;
pub use record::{AttendanceRecord, NewRecord, RecordChanges, RecordTime};
pub use role::Role;
pub use status::Status;
pub use stored::Stored;
