use crate::models::{User, UserFields};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /user` and `PUT /user/:id`.
///
/// Absent keys deserialize to empty strings so that a missing field is
/// reported by validation, by name, rather than as a JSON parse failure.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UserRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "dob is required"))]
    pub dob: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
}

impl From<UserRequest> for UserFields {
    fn from(req: UserRequest) -> Self {
        Self {
            name: req.name,
            dob: req.dob,
            address: req.address,
            description: req.description,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub dob: String,
    pub address: String,
    pub description: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id_hex(),
            name: user.name,
            dob: user.dob,
            address: user.address,
            description: user.description,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedUserResponse {
    #[serde(rename = "insertedId")]
    pub inserted_id: String,
}
