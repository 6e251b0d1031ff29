pub mod database;
pub mod form;
pub mod storage;

pub use database::*;
pub use form::*;
pub use storage::*;
