#![allow(dead_code)]

use std::sync::Arc;

use migrations::Migrator;
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use shopkeeper::services::{
    categories::{CategoryService, CreateCategoryRequest},
    customers::{CreateCustomerRequest, CustomerService, CustomerView},
    orders::OrderService,
    products::{CreateProductRequest, ProductService},
};

/// Test harness backed by a migrated in-memory SQLite database.
///
/// A single pooled connection keeps the in-memory database alive and shared
/// across all service calls in one test.
pub struct TestShop {
    pub db: Arc<DatabaseConnection>,
    pub customers: CustomerService,
    pub categories: CategoryService,
    pub products: ProductService,
    pub orders: OrderService,
}

impl TestShop {
    pub async fn new() -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:".to_string());
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(options).await.expect("connect test db");
        Migrator::up(&db, None).await.expect("migrate test db");

        let db = Arc::new(db);
        Self {
            customers: CustomerService::new(db.clone()),
            categories: CategoryService::new(db.clone()),
            products: ProductService::new(db.clone()),
            orders: OrderService::new(db.clone()),
            db,
        }
    }

    pub async fn seed_customer(&self, name: &str, email: &str) -> CustomerView {
        self.customers
            .create(CreateCustomerRequest {
                name: name.to_string(),
                email: email.to_string(),
                city: Some("Stockholm".to_string()),
                personnummer: "199001011234".to_string(),
            })
            .await
            .expect("seed customer")
    }

    pub async fn seed_category(&self, name: &str) -> i32 {
        self.categories
            .create(CreateCategoryRequest {
                name: name.to_string(),
                description: None,
            })
            .await
            .expect("seed category")
            .id
    }

    pub async fn seed_product(&self, name: &str, price: Decimal) -> i32 {
        self.products
            .create(CreateProductRequest {
                name: name.to_string(),
                description: None,
                price,
                category_id: None,
            })
            .await
            .expect("seed product")
            .id
    }
}
