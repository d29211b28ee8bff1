mod common;

use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use shopkeeper::{
    entities::{
        order::{self, Entity as OrderEntity},
        order_row::{self, Entity as OrderRowEntity},
    },
    services::{
        categories::CreateCategoryRequest,
        customers::CreateCustomerRequest,
        orders::{CreateOrderRequest, OrderItemInput},
        products::CreateProductRequest,
    },
    ServiceError,
};

use common::TestShop;

#[tokio::test]
async fn deleting_customer_cascades_to_orders_and_rows() {
    let shop = TestShop::new().await;
    let customer = shop.seed_customer("Greta", "greta@example.com").await;
    let product = shop.seed_product("Keyboard", dec!(599)).await;

    let order = shop
        .orders
        .create(CreateOrderRequest {
            customer_id: customer.id,
            items: vec![OrderItemInput {
                product_id: product,
                quantity: 2,
            }],
        })
        .await
        .expect("create order");

    shop.customers
        .delete(customer.id)
        .await
        .expect("delete customer");

    let orders = OrderEntity::find()
        .filter(order::Column::CustomerId.eq(customer.id))
        .count(&*shop.db)
        .await
        .expect("count orders");
    assert_eq!(orders, 0);

    let rows = OrderRowEntity::find()
        .filter(order_row::Column::OrderId.eq(order.id))
        .count(&*shop.db)
        .await
        .expect("count rows");
    assert_eq!(rows, 0);
}

#[tokio::test]
async fn deleting_referenced_product_is_rejected_and_order_unaffected() {
    let shop = TestShop::new().await;
    let customer = shop.seed_customer("Hugo", "hugo@example.com").await;
    let product = shop.seed_product("Monitor", dec!(349)).await;

    let order = shop
        .orders
        .create(CreateOrderRequest {
            customer_id: customer.id,
            items: vec![OrderItemInput {
                product_id: product,
                quantity: 2,
            }],
        })
        .await
        .expect("create order");

    let err = shop
        .products
        .delete(product)
        .await
        .expect_err("referenced product must not be deletable");
    assert!(matches!(err, ServiceError::ConstraintViolation(_)));

    // Historical data is untouched.
    let details = shop.orders.get_details(order.id).await.expect("details");
    assert_eq!(details.rows.len(), 1);
    assert_eq!(details.total_amount, dec!(698));
}

#[tokio::test]
async fn deleting_referenced_category_is_rejected() {
    let shop = TestShop::new().await;
    let category = shop.seed_category("Electronics").await;
    shop.products
        .create(CreateProductRequest {
            name: "Headphones".to_string(),
            description: None,
            price: dec!(799),
            category_id: Some(category),
        })
        .await
        .expect("create product");

    let err = shop
        .categories
        .delete(category)
        .await
        .expect_err("referenced category must not be deletable");
    assert!(matches!(err, ServiceError::ConstraintViolation(_)));
}

#[tokio::test]
async fn unreferenced_product_and_category_can_be_deleted() {
    let shop = TestShop::new().await;
    let category = shop.seed_category("Gaming").await;
    let product = shop.seed_product("Powerbank", dec!(200)).await;

    shop.products.delete(product).await.expect("delete product");
    shop.categories
        .delete(category)
        .await
        .expect("delete category");
}

#[tokio::test]
async fn duplicate_email_is_a_constraint_violation() {
    let shop = TestShop::new().await;
    shop.seed_customer("Ivar", "shared@example.com").await;

    let err = shop
        .customers
        .create(CreateCustomerRequest {
            name: "Imposter".to_string(),
            email: "shared@example.com".to_string(),
            city: None,
            personnummer: "199001011234".to_string(),
        })
        .await
        .expect_err("duplicate email must be rejected");
    assert!(matches!(err, ServiceError::ConstraintViolation(_)));
}

#[tokio::test]
async fn duplicate_category_name_is_a_constraint_violation() {
    let shop = TestShop::new().await;
    shop.seed_category("Wearables").await;

    let err = shop
        .categories
        .create(CreateCategoryRequest {
            name: "Wearables".to_string(),
            description: None,
        })
        .await
        .expect_err("duplicate category name must be rejected");
    assert!(matches!(err, ServiceError::ConstraintViolation(_)));
}

#[tokio::test]
async fn missing_ids_report_not_found() {
    let shop = TestShop::new().await;
    assert!(matches!(
        shop.customers.get(404).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        shop.orders.get_details(404).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        shop.orders.delete_row(404).await,
        Err(ServiceError::NotFound(_))
    ));
}
