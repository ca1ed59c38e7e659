use geostac_reconcile::{FieldQuery, ReconciliationEngine};
use geostac_stac::ImageryCatalog;
use geostac_store::FieldStore;
use std::sync::Arc;

pub struct AppState {
    pub store: Arc<dyn FieldStore>,
    pub engine: ReconciliationEngine,
    pub query: FieldQuery,
}

impl AppState {
    pub fn new(store: Arc<dyn FieldStore>, catalog: Arc<dyn ImageryCatalog>) -> Self {
        Self {
            engine: ReconciliationEngine::new(store.clone(), catalog),
            query: FieldQuery::new(store.clone()),
            store,
        }
    }
}
