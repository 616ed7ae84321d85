pub mod validation;

pub use validation::{UserId, ValidatedJson};
