//! Order lifecycle routes

use super::{ClientError, ShopClient};
use crate::types::PayOrderRequest;
use reqwest::Method;
use serde_json::Value;

impl ShopClient {
    /// Orders belonging to the logged in user
    pub async fn list_orders(&self) -> Result<Value, ClientError> {
        let request = self.request(Method::GET, "/api/orders");
        self.execute(request).await
    }

    pub async fn get_order(&self, order_id: i64) -> Result<Value, ClientError> {
        let request = self.request(Method::GET, &format!("/api/orders/{order_id}"));
        self.execute(request).await
    }

    /// Turn the current cart into a pending order
    pub async fn create_order(&self) -> Result<Value, ClientError> {
        let request = self.request(Method::POST, "/api/orders/create");
        self.execute(request).await
    }

    pub async fn pay_order(&self, order_id: i64) -> Result<Value, ClientError> {
        let request = self
            .request(Method::POST, "/api/orders/pay")
            .json(&PayOrderRequest { order_id });
        self.execute(request).await
    }

    pub async fn cancel_order(&self, order_id: i64) -> Result<Value, ClientError> {
        let request = self.request(Method::PUT, &format!("/api/orders/{order_id}/cancel"));
        self.execute(request).await
    }

    /// Confirm receipt of a shipped order
    pub async fn complete_order(&self, order_id: i64) -> Result<Value, ClientError> {
        let request = self.request(Method::PUT, &format!("/api/orders/{order_id}/complete"));
        self.execute(request).await
    }
}
