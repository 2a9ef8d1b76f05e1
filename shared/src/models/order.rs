//! Order model and lifecycle status

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sequence numbers are human-facing and start above this base, so the
/// first order in an empty ledger is 1001.
pub const ORDER_NUMBER_BASE: u64 = 1000;

/// Order lifecycle status
///
/// `AwaitingKey` is the initial state; `Fulfilled` is terminal. There is
/// no cancellation or refund state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    AwaitingKey,
    Fulfilled,
}

/// A single ordered line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub title: String,
    pub qty: u32,
    pub price: i64,
}

/// Placed order
///
/// References its owner by login only. The total is the value declared by
/// the buyer at checkout; it is not recomputed from the items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    /// Human-facing sequence number, strictly increasing per ledger
    pub number: u64,
    pub user_login: String,
    pub phone: String,
    pub items: Vec<OrderItem>,
    pub total: i64,
    pub status: OrderStatus,
    /// Fulfillment key, set when the order transitions to `Fulfilled`
    pub key: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Create a new order in the `AwaitingKey` state
    pub fn new(
        number: u64,
        user_login: impl Into<String>,
        phone: impl Into<String>,
        items: Vec<OrderItem>,
        total: i64,
    ) -> Self {
        Self {
            id: format!("o{}", Uuid::new_v4().simple()),
            number,
            user_login: user_login.into(),
            phone: phone.into(),
            items,
            total,
            status: OrderStatus::AwaitingKey,
            key: None,
            created_at: Utc::now(),
        }
    }

    /// Short "title × qty" listing of the ordered items
    pub fn item_summary(&self) -> String {
        self.items
            .iter()
            .map(|i| format!("{} × {}", i.title, i.qty))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
