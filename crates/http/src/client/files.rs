//! Image upload

use super::{ClientError, ShopClient};
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

impl ShopClient {
    /// Upload a product image
    ///
    /// The backend stores it under a generated name and answers with the
    /// backend-relative URL, which [`ShopClient::image_url`] resolves.
    pub async fn upload_image(
        &self,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Value, ClientError> {
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.into()));
        let request = self
            .request(Method::POST, "/api/files/upload")
            .multipart(form);
        self.execute(request).await
    }
}
