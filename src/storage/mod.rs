pub mod cloudinary;

pub use cloudinary::CloudinaryStore;

use crate::error::Result;
use axum::async_trait;

/// Object-storage seam: takes an image payload (base64 data URI) and
/// returns a durable public URL. The send path owns the failure handling;
/// implementations only report upload errors.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload(&self, data_uri: &str) -> Result<String>;
}
