//! Domain models
//!
//! - [`User`] - registered customer account
//! - [`Order`] - placed order with its lifecycle status

mod order;
mod user;

pub use order::{ORDER_NUMBER_BASE, Order, OrderItem, OrderStatus};
pub use user::User;
