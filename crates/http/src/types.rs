//! Request bodies and the few response shapes the client interprets itself

use crate::client::error::ClientError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shop_core::Role;
use std::fmt;

/// Username/password pair for login and registration
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemRequest {
    pub product_id: i64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayOrderRequest {
    pub order_id: i64,
}

/// Product fields an administrator can create or replace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub price: f64,
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_url: Option<String>,
}

/// Token and role handed out by a successful login
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginGrant {
    pub token: String,
    pub role: Role,
}

impl LoginGrant {
    /// Extract the grant from a login response
    ///
    /// The fields are read from the `data` envelope when there is one and
    /// from the top level otherwise. A response with no grant at all is the
    /// backend refusing the credentials; a grant that does not decode is a
    /// serialization error.
    pub fn from_response(response: &Value) -> Result<Self, ClientError> {
        let payload = match response.get("data") {
            Some(Value::Null) => None,
            Some(data) => Some(data),
            None if response.get("token").is_some() => Some(response),
            None => None,
        };

        let Some(payload) = payload else {
            let message = response
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("login response carried no token");
            return Err(ClientError::Rejected(message.to_string()));
        };

        Ok(Self::deserialize(payload)?)
    }
}
