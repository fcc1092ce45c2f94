use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub name: String,
    pub price: f64,

    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Product {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            name: name.into(),
            price,
            created_at: now,
            updated_at: now,
        }
    }
}
