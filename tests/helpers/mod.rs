#![allow(dead_code)]
pub mod test_db;
pub mod vacation_helpers;

pub use test_db::*;
pub use vacation_helpers::*;
