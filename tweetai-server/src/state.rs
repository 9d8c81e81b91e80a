use std::sync::Arc;

use crate::api::docs;
use crate::db::Database;
use crate::realtime::CountBroadcaster;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub counts: CountBroadcaster,
    /// OpenAPI document, built once at startup
    pub api_docs: Arc<serde_json::Value>,
}

impl AppState {
    pub fn new(db: Database, public_url: &str) -> Self {
        Self {
            db,
            counts: CountBroadcaster::new(),
            api_docs: Arc::new(docs::openapi_document(public_url)),
        }
    }
}
