pub use sea_orm_migration::prelude::*;

mod m20250815_000001_create_customers_table;
mod m20250815_000002_create_categories_table;
mod m20250815_000003_create_products_table;
mod m20250815_000004_create_orders_table;
mod m20250815_000005_create_order_rows_table;
mod m20250815_000006_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250815_000001_create_customers_table::Migration),
            Box::new(m20250815_000002_create_categories_table::Migration),
            Box::new(m20250815_000003_create_products_table::Migration),
            Box::new(m20250815_000004_create_orders_table::Migration),
            Box::new(m20250815_000005_create_order_rows_table::Migration),
            Box::new(m20250815_000006_add_indexes::Migration),
        ]
    }
}
