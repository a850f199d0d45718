use std::sync::Arc;

use crate::config::Config;
use crate::db::DatabaseBackend;
use crate::ocr::OcrDispatcher;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<dyn DatabaseBackend>,
    pub ocr: OcrDispatcher,
}

impl AppState {
    pub fn new(config: Config, db: Arc<dyn DatabaseBackend>, ocr: OcrDispatcher) -> Self {
        Self {
            config: Arc::new(config),
            db,
            ocr,
        }
    }
}
