//! Request/response types shared between server and clients
//!
//! Every endpoint has an explicit typed body; request payloads are
//! validated before any domain logic runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Order, OrderItem, User};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub surname: String,
    pub login: String,
    pub email: String,
    pub pass: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub pass: String,
}

/// Login / registration response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Public user projection (no password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub login: String,
    pub email: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            surname: user.surname.clone(),
            login: user.login.clone(),
            email: user.email.clone(),
        }
    }
}

/// Current user profile, as returned by `GET /api/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub login: String,
    pub email: String,
    pub banned: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            surname: user.surname.clone(),
            login: user.login.clone(),
            email: user.email.clone(),
            banned: user.banned,
            created_at: user.created_at,
        }
    }
}

/// Password change request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_pass: String,
    pub new_pass: String,
}

// =============================================================================
// Order API DTOs
// =============================================================================

/// Order creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub phone: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total: i64,
}

/// Fulfillment key entry, as returned by `GET /api/user/keys`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEntry {
    pub key: String,
    pub order_number: u64,
    pub product: String,
    pub created_at: DateTime<Utc>,
}

impl KeyEntry {
    /// Project a fulfilled order into its key entry, `None` while the
    /// order has no key
    pub fn from_order(order: &Order) -> Option<Self> {
        order.key.as_ref().map(|key| Self {
            key: key.clone(),
            order_number: order.number,
            product: order.item_summary(),
            created_at: order.created_at,
        })
    }
}

// =============================================================================
// Admin API DTOs
// =============================================================================

/// Admin login handshake response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestLoginResponse {
    pub ok: bool,
    pub nonce: String,
}

/// Nonce poll response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    pub verified: bool,
}

/// Admin token response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Order fulfillment request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FulfillRequest {
    pub key: String,
}

/// User list entry with order count, as returned by `GET /api/admin/users`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserEntry {
    pub id: String,
    pub login: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub banned: bool,
    pub order_count: usize,
}

/// Ban toggle response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BanResponse {
    pub banned: bool,
}

/// Forced password reset response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordResponse {
    pub ok: bool,
    pub new_pass: String,
}

/// Generic acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}
