use crate::db::DbPool;
use std::sync::Arc;

use crate::{
    message::{message_repository::MessageRepository, message_service::MessageService},
    storage::ImageStore,
    user::user_repository::UserRepository,
    websocket::ConnectionManager,
};

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub ws_connections: ConnectionManager,
    pub image_store: Arc<dyn ImageStore>,
    pub user_repository: UserRepository,
    pub message_repository: MessageRepository,
    pub message_service: MessageService,
}

#[derive(Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub cloudinary_cloud_name: String,
    pub cloudinary_upload_preset: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: std::env::var("JWT_SECRET")
                .expect("JWT_SECRET must be set"),
            cloudinary_cloud_name: std::env::var("CLOUDINARY_CLOUD_NAME")
                .expect("CLOUDINARY_CLOUD_NAME must be set"),
            cloudinary_upload_preset: std::env::var("CLOUDINARY_UPLOAD_PRESET")
                .expect("CLOUDINARY_UPLOAD_PRESET must be set"),
        }
    }
}
