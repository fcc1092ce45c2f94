use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub name: String,

    // unique across the collection
    pub email: String,

    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Customer {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            name: name.into(),
            email: email.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
