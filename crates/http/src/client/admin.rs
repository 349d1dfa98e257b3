//! Administration routes
//!
//! The backend enforces the admin role; these bindings do not check it.

use super::{ClientError, ShopClient};
use crate::types::ProductInput;
use reqwest::Method;
use serde_json::Value;

impl ShopClient {
    pub async fn admin_list_products(&self) -> Result<Value, ClientError> {
        let request = self.request(Method::GET, "/api/admin/products");
        self.execute(request).await
    }

    pub async fn admin_create_product(&self, product: &ProductInput) -> Result<Value, ClientError> {
        let request = self
            .request(Method::POST, "/api/admin/products")
            .json(product);
        self.execute(request).await
    }

    pub async fn admin_update_product(
        &self,
        product_id: i64,
        product: &ProductInput,
    ) -> Result<Value, ClientError> {
        let request = self
            .request(Method::PUT, &format!("/api/admin/products/{product_id}"))
            .json(product);
        self.execute(request).await
    }

    pub async fn admin_delete_product(&self, product_id: i64) -> Result<Value, ClientError> {
        let request = self.request(Method::DELETE, &format!("/api/admin/products/{product_id}"));
        self.execute(request).await
    }

    pub async fn admin_list_orders(&self) -> Result<Value, ClientError> {
        let request = self.request(Method::GET, "/api/admin/orders");
        self.execute(request).await
    }

    pub async fn admin_ship_order(&self, order_id: i64) -> Result<Value, ClientError> {
        let request = self.request(Method::POST, &format!("/api/admin/orders/{order_id}/ship"));
        self.execute(request).await
    }

    pub async fn admin_delete_order(&self, order_id: i64) -> Result<Value, ClientError> {
        let request = self.request(Method::DELETE, &format!("/api/admin/orders/{order_id}"));
        self.execute(request).await
    }

    pub async fn admin_list_users(&self) -> Result<Value, ClientError> {
        let request = self.request(Method::GET, "/api/admin/users");
        self.execute(request).await
    }

    pub async fn admin_delete_user(&self, user_id: i64) -> Result<Value, ClientError> {
        let request = self.request(Method::DELETE, &format!("/api/admin/users/{user_id}"));
        self.execute(request).await
    }
}
