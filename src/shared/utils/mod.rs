pub mod email_validator;

pub use email_validator::*;
