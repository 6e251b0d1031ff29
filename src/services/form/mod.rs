//! The session form and its normalization into an insert-ready record.

mod fields;
mod normalize;
mod state;
mod types;

pub use fields::{FIELDS, FieldGroup};
pub use normalize::{SessionRecord, ValidationError, normalize};
pub use state::FormState;
pub use types::*;
