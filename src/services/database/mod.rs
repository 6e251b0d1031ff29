mod insert;
mod manager;
mod types;

pub use manager::{DatabaseManager, SessionWriter};
pub use types::ConnectionConfig;
