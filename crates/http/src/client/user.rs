//! User account routes

use super::{ClientError, ShopClient};
use crate::types::Credentials;
use reqwest::Method;
use serde_json::Value;

impl ShopClient {
    /// Submit credentials for a token
    pub async fn login(&self, credentials: &Credentials) -> Result<Value, ClientError> {
        let request = self
            .request(Method::POST, "/api/users/login")
            .json(credentials);
        self.execute(request).await
    }

    /// Create an account
    pub async fn register(&self, credentials: &Credentials) -> Result<Value, ClientError> {
        let request = self
            .request(Method::POST, "/api/users/register")
            .json(credentials);
        self.execute(request).await
    }
}
