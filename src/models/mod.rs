pub mod customer;
pub mod product;
pub mod order;

pub use customer::Customer;
pub use product::Product;
pub use order::{Order, OrderItem, OrderStatus};
