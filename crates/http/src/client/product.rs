//! Catalog routes

use super::{ClientError, ShopClient};
use reqwest::Method;
use serde_json::Value;

impl ShopClient {
    pub async fn list_products(&self) -> Result<Value, ClientError> {
        let request = self.request(Method::GET, "/api/products");
        self.execute(request).await
    }

    /// Search the catalog; `query` is sent URL-encoded
    pub async fn search_products(&self, query: &str) -> Result<Value, ClientError> {
        let request = self
            .request(Method::GET, "/api/products/search")
            .query(&[("query", query)]);
        self.execute(request).await
    }
}
