pub mod business_days;
pub mod overlap;
pub mod request_dates;
pub mod state_machine;

pub use business_days::*;
pub use overlap::*;
pub use request_dates::*;
pub use state_machine::*;
