pub use sea_orm_migration::prelude::*;

mod m20240105_000001_create_users_table;
mod m20240105_000002_create_plans_table;
mod m20240112_000003_create_user_sessions_table;
mod m20240112_000004_create_password_reset_tokens_table;
mod m20240119_000005_create_customers_table;
mod m20240119_000006_create_products_table;
mod m20240126_000007_create_warehouses_table;
mod m20240126_000008_add_warehouse_to_products;
mod m20240202_000009_create_sales_table;
mod m20240202_000010_create_sale_items_table;
mod m20240209_000011_create_payments_table;
mod m20240209_000012_create_expenses_table;
mod m20240216_000013_create_accounts_table;
mod m20240216_000014_create_returns_table;
mod m20240223_000015_create_quotes_table;
mod m20240301_000016_add_plan_to_users;
mod m20240308_000017_add_invoice_fields_to_sales;
mod m20240315_000018_backfill_invoice_issued;
mod m20240322_000019_remove_manager_role;
mod m20240405_000020_widen_product_price_precision;
mod m20240412_000021_add_critical_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240105_000001_create_users_table::Migration),
            Box::new(m20240105_000002_create_plans_table::Migration),
            Box::new(m20240112_000003_create_user_sessions_table::Migration),
            Box::new(m20240112_000004_create_password_reset_tokens_table::Migration),
            Box::new(m20240119_000005_create_customers_table::Migration),
            Box::new(m20240119_000006_create_products_table::Migration),
            Box::new(m20240126_000007_create_warehouses_table::Migration),
            Box::new(m20240126_000008_add_warehouse_to_products::Migration),
            Box::new(m20240202_000009_create_sales_table::Migration),
            Box::new(m20240202_000010_create_sale_items_table::Migration),
            Box::new(m20240209_000011_create_payments_table::Migration),
            Box::new(m20240209_000012_create_expenses_table::Migration),
            Box::new(m20240216_000013_create_accounts_table::Migration),
            Box::new(m20240216_000014_create_returns_table::Migration),
            Box::new(m20240223_000015_create_quotes_table::Migration),
            Box::new(m20240301_000016_add_plan_to_users::Migration),
            Box::new(m20240308_000017_add_invoice_fields_to_sales::Migration),
            Box::new(m20240315_000018_backfill_invoice_issued::Migration),
            Box::new(m20240322_000019_remove_manager_role::Migration),
            Box::new(m20240405_000020_widen_product_price_precision::Migration),
            Box::new(m20240412_000021_add_critical_indexes::Migration),
        ]
    }
}
