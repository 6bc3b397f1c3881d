//! Application state shared across handlers.

use clipvault_core::{Config, UploadValidator};
use clipvault_db::{AccountRepository, VideoRepository};
use clipvault_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::jwt::JwtService;

pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub accounts: AccountRepository,
    pub videos: VideoRepository,
    pub storage: Arc<dyn Storage>,
    pub jwt: JwtService,
    pub upload_validator: UploadValidator,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool, storage: Arc<dyn Storage>) -> Self {
        let jwt = JwtService::new(&config.jwt_secret, config.token_expiry_days);
        let upload_validator = UploadValidator::new(config.max_video_size_bytes as u64);

        Self {
            accounts: AccountRepository::new(pool.clone()),
            videos: VideoRepository::new(pool.clone()),
            config,
            pool,
            storage,
            jwt,
            upload_validator,
        }
    }
}
