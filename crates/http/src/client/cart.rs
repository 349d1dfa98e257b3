//! Shopping cart routes

use super::{ClientError, ShopClient};
use crate::types::{AddCartItemRequest, UpdateQuantityRequest};
use reqwest::Method;
use serde_json::Value;

impl ShopClient {
    pub async fn get_cart(&self) -> Result<Value, ClientError> {
        let request = self.request(Method::GET, "/api/cart");
        self.execute(request).await
    }

    pub async fn add_to_cart(&self, product_id: i64, quantity: u32) -> Result<Value, ClientError> {
        let request = self
            .request(Method::POST, "/api/cart/add")
            .json(&AddCartItemRequest {
                product_id,
                quantity,
            });
        self.execute(request).await
    }

    pub async fn update_cart_item(&self, item_id: i64, quantity: u32) -> Result<Value, ClientError> {
        let request = self
            .request(Method::PUT, &format!("/api/cart/items/{item_id}"))
            .json(&UpdateQuantityRequest { quantity });
        self.execute(request).await
    }

    pub async fn remove_cart_item(&self, item_id: i64) -> Result<Value, ClientError> {
        let request = self.request(Method::DELETE, &format!("/api/cart/items/{item_id}"));
        self.execute(request).await
    }
}
