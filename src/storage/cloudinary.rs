use crate::error::{AppError, Result};
use axum::async_trait;
use serde::Deserialize;

use super::ImageStore;

/// Uploads to Cloudinary's unsigned upload endpoint. Cloudinary accepts the
/// raw data URI as the `file` form field, so no decoding happens here.
pub struct CloudinaryStore {
    client: reqwest::Client,
    cloud_name: String,
    upload_preset: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

impl CloudinaryStore {
    pub fn new(cloud_name: String, upload_preset: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            cloud_name,
            upload_preset,
        }
    }
}

#[async_trait]
impl ImageStore for CloudinaryStore {
    async fn upload(&self, data_uri: &str) -> Result<String> {
        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.cloud_name
        );

        let params = [
            ("file", data_uri),
            ("upload_preset", self.upload_preset.as_str()),
        ];

        let response = self
            .client
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Upload(format!(
                "Cloudinary returned {}",
                response.status()
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upload(e.to_string()))?;

        Ok(body.secure_url)
    }
}
