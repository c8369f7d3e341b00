pub mod balance_service;
pub mod settings_service;
pub mod user_service;
pub mod vacation_service;

pub use balance_service::*;
pub use settings_service::*;
pub use user_service::*;
pub use vacation_service::*;
