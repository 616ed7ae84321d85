pub mod user;

pub use user::{CreatedUserResponse, UserRequest, UserResponse};
