use std::sync::Arc;

use crate::shared::sheets::SheetsApi;

/// Shared handler state. The spreadsheet client is behind the trait so
/// tests can drop in a fake.
#[derive(Clone)]
pub struct AppState {
    pub sheets: Arc<dyn SheetsApi>,
}

impl AppState {
    pub fn new(sheets: Arc<dyn SheetsApi>) -> Self {
        Self { sheets }
    }
}
