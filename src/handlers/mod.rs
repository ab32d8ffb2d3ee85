pub mod common;
pub mod companies;
pub mod invoices;

use crate::db::DbPool;
use crate::services::{CompanyService, InvoiceService};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub companies: Arc<CompanyService>,
    pub invoices: Arc<InvoiceService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            companies: Arc::new(CompanyService::new(db_pool.clone())),
            invoices: Arc::new(InvoiceService::new(db_pool)),
        }
    }
}
