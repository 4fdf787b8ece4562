pub mod clock;
pub mod directory;
pub mod ledger;
pub mod mark;

pub use clock::{Clock, FixedClock, SystemClock};
pub use directory::{Directory, Person};
pub use ledger::{Ledger, PhotoCleanup};
pub use mark::{MarkLogic, MarkOutcome, PhotoUpload, Submission};
