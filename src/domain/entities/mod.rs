pub mod settings;
pub mod user;
pub mod vacation_request;

pub use settings::*;
pub use user::*;
pub use vacation_request::*;
