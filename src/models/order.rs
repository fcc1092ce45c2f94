use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use super::Customer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    Cancelled,
}

/// Line item embedded in an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    // hex string of the customer's _id
    pub customer_id: String,
    pub customer_name: String,
    pub customer_email: String,

    pub items: Vec<OrderItem>,
    pub status: OrderStatus,

    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Order {
    /// New pending order for `customer`, denormalizing its name and email.
    pub fn new(customer: &Customer, items: Vec<OrderItem>) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            customer_id: customer.id.to_hex(),
            customer_name: customer.name.clone(),
            customer_email: customer.email.clone(),
            items,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}
