pub mod balance_ledger;
pub mod clock;
pub mod settings_repository;
pub mod user_repository;
pub mod vacation_request_repository;
