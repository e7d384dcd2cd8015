use crate::storage::Dataset;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub data: Arc<Dataset>,
}

impl AppState {
    pub fn new(data: Dataset) -> Self {
        Self {
            data: Arc::new(data),
        }
    }
}
