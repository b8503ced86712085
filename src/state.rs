use sqlx::PgPool;
use std::sync::Arc;

use crate::media::MediaUploader;

/// Shared per-process resources handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub media: Arc<dyn MediaUploader>,
}

impl AppState {
    pub fn new(pool: PgPool, media: Arc<dyn MediaUploader>) -> Self {
        Self { pool, media }
    }
}
