use chrono::{SecondsFormat, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// The four client-supplied fields of a user. Create and edit both carry all
/// of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFields {
    pub name: String,
    pub dob: String,
    pub address: String,
    pub description: String,
}

/// A persisted user document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub dob: String,
    pub address: String,
    pub description: String,
    /// Written once on insert; updates never touch it.
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl User {
    /// A new, not yet persisted user stamped with the current time. The id is
    /// assigned by the store on insert.
    pub fn new(fields: UserFields) -> Self {
        Self {
            id: None,
            name: fields.name,
            dob: fields.dob,
            address: fields.address,
            description: fields.description,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn apply(&mut self, fields: &UserFields) {
        self.name.clone_from(&fields.name);
        self.dob.clone_from(&fields.dob);
        self.address.clone_from(&fields.address);
        self.description.clone_from(&fields.description);
    }

    pub fn id_hex(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }
}
