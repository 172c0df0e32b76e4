pub mod common;

pub mod accounts;
pub mod admin;
pub mod customers;
pub mod expenses;
pub mod payments;
pub mod products;
pub mod quotes;
pub mod returns;
pub mod sales;
pub mod warehouses;

use crate::db::DbPool;
use crate::services;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub products: Arc<services::products::ProductService>,
    pub customers: Arc<services::customers::CustomerService>,
    pub warehouses: Arc<services::warehouses::WarehouseService>,
    pub sales: Arc<services::sales::SaleService>,
    pub payments: Arc<services::payments::PaymentService>,
    pub returns: Arc<services::returns::ReturnService>,
    pub expenses: Arc<services::expenses::ExpenseService>,
    pub accounts: Arc<services::accounts::AccountService>,
    pub quotes: Arc<services::quotes::QuoteService>,
    pub users: Arc<services::users::UserService>,
    pub plans: Arc<services::plans::PlanService>,
}

impl AppServices {
    /// Builds the full service container over one shared connection pool.
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            products: Arc::new(services::products::ProductService::new(db_pool.clone())),
            customers: Arc::new(services::customers::CustomerService::new(db_pool.clone())),
            warehouses: Arc::new(services::warehouses::WarehouseService::new(db_pool.clone())),
            sales: Arc::new(services::sales::SaleService::new(db_pool.clone())),
            payments: Arc::new(services::payments::PaymentService::new(db_pool.clone())),
            returns: Arc::new(services::returns::ReturnService::new(db_pool.clone())),
            expenses: Arc::new(services::expenses::ExpenseService::new(db_pool.clone())),
            accounts: Arc::new(services::accounts::AccountService::new(db_pool.clone())),
            quotes: Arc::new(services::quotes::QuoteService::new(db_pool.clone())),
            users: Arc::new(services::users::UserService::new(db_pool.clone())),
            plans: Arc::new(services::plans::PlanService::new(db_pool)),
        }
    }
}
