mod common;

use rust_decimal_macros::dec;
use sea_orm::EntityTrait;
use shopkeeper::{
    entities::{customer::Entity as CustomerEntity, order::Entity as OrderEntity},
    services::orders::{CreateOrderRequest, OrderItemInput},
    ServiceError,
};

use common::TestShop;

async fn stored_total(shop: &TestShop, order_id: i32) -> rust_decimal::Decimal {
    OrderEntity::find_by_id(order_id)
        .one(&*shop.db)
        .await
        .expect("query order")
        .expect("order exists")
        .total_amount
}

async fn stored_order_count(shop: &TestShop, customer_id: i32) -> i32 {
    CustomerEntity::find_by_id(customer_id)
        .one(&*shop.db)
        .await
        .expect("query customer")
        .expect("customer exists")
        .order_count
}

#[tokio::test]
async fn order_total_and_order_count_follow_row_mutations() {
    let shop = TestShop::new().await;
    let anna = shop.seed_customer("Anna", "anna@example.com").await;
    let widget = shop.seed_product("Widget", dec!(10.00)).await;
    let gadget = shop.seed_product("Gadget", dec!(5.00)).await;

    // Two rows: 2 @ 10.00 and 1 @ 5.00.
    let order = shop
        .orders
        .create(CreateOrderRequest {
            customer_id: anna.id,
            items: vec![
                OrderItemInput {
                    product_id: widget,
                    quantity: 2,
                },
                OrderItemInput {
                    product_id: gadget,
                    quantity: 1,
                },
            ],
        })
        .await
        .expect("create order");

    assert_eq!(order.total_amount, dec!(25.00));
    assert_eq!(stored_total(&shop, order.id).await, dec!(25.00));
    assert_eq!(stored_order_count(&shop, anna.id).await, 1);

    // Delete the 5.00 row; the total is recomputed from what is left.
    let gadget_row = order
        .rows
        .iter()
        .find(|r| r.product_id == gadget)
        .expect("gadget row")
        .row_id;
    let details = shop.orders.delete_row(gadget_row).await.expect("delete row");
    assert_eq!(details.total_amount, dec!(20.00));
    assert_eq!(stored_total(&shop, order.id).await, dec!(20.00));

    // Delete the order; Anna's order count drops back to zero.
    shop.orders.delete(order.id).await.expect("delete order");
    assert_eq!(stored_order_count(&shop, anna.id).await, 0);
}

#[tokio::test]
async fn updating_row_quantity_recomputes_total() {
    let shop = TestShop::new().await;
    let customer = shop.seed_customer("Berit", "berit@example.com").await;
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
    assert_eq!(order.total_amount, dec!(698));

    let row_id = order.rows[0].row_id;
    let details = shop
        .orders
        .update_row_quantity(row_id, 5)
        .await
        .expect("update quantity");
    assert_eq!(details.total_amount, dec!(1745));
    assert_eq!(stored_total(&shop, order.id).await, dec!(1745));
}

#[tokio::test]
async fn deleting_last_row_leaves_total_zero_not_null() {
    let shop = TestShop::new().await;
    let customer = shop.seed_customer("Carl", "carl@example.com").await;
    let product = shop.seed_product("Powerbank", dec!(200)).await;

    let order = shop
        .orders
        .create(CreateOrderRequest {
            customer_id: customer.id,
            items: vec![OrderItemInput {
                product_id: product,
                quantity: 1,
            }],
        })
        .await
        .expect("create order");

    shop.orders
        .delete_row(order.rows[0].row_id)
        .await
        .expect("delete row");
    assert_eq!(stored_total(&shop, order.id).await, dec!(0));
}

#[tokio::test]
async fn adding_row_to_existing_order_recomputes_total() {
    let shop = TestShop::new().await;
    let customer = shop.seed_customer("Dora", "dora@example.com").await;
    let keyboard = shop.seed_product("Keyboard", dec!(599)).await;
    let mouse = shop.seed_product("Mouse", dec!(49)).await;

    let order = shop
        .orders
        .create(CreateOrderRequest {
            customer_id: customer.id,
            items: vec![OrderItemInput {
                product_id: keyboard,
                quantity: 1,
            }],
        })
        .await
        .expect("create order");

    let details = shop
        .orders
        .add_row(
            order.id,
            OrderItemInput {
                product_id: mouse,
                quantity: 3,
            },
        )
        .await
        .expect("add row");
    assert_eq!(details.total_amount, dec!(746));
}

#[tokio::test]
async fn product_price_change_never_touches_existing_rows() {
    let shop = TestShop::new().await;
    let customer = shop.seed_customer("Erik", "erik@example.com").await;
    let product = shop.seed_product("Smart Watch", dec!(999)).await;

    let order = shop
        .orders
        .create(CreateOrderRequest {
            customer_id: customer.id,
            items: vec![OrderItemInput {
                product_id: product,
                quantity: 1,
            }],
        })
        .await
        .expect("create order");
    assert_eq!(order.total_amount, dec!(999));

    shop.products
        .update(
            product,
            shopkeeper::services::products::UpdateProductRequest {
                price: Some(dec!(1499)),
                ..Default::default()
            },
        )
        .await
        .expect("update price");

    // The existing row keeps the unit price it captured.
    let details = shop.orders.get_details(order.id).await.expect("details");
    assert_eq!(details.rows[0].unit_price, dec!(999));
    assert_eq!(details.total_amount, dec!(999));

    // A new row captures the new price.
    let details = shop
        .orders
        .add_row(
            order.id,
            OrderItemInput {
                product_id: product,
                quantity: 1,
            },
        )
        .await
        .expect("add row");
    assert_eq!(details.total_amount, dec!(2498));
}

#[tokio::test]
async fn order_creation_validates_before_touching_the_database() {
    let shop = TestShop::new().await;
    let customer = shop.seed_customer("Frida", "frida@example.com").await;
    let product = shop.seed_product("Headphones", dec!(799)).await;

    // No line items.
    let err = shop
        .orders
        .create(CreateOrderRequest {
            customer_id: customer.id,
            items: vec![],
        })
        .await
        .expect_err("empty order must be rejected");
    assert!(matches!(err, ServiceError::ValidationError(_)));

    // Non-positive quantity.
    let err = shop
        .orders
        .create(CreateOrderRequest {
            customer_id: customer.id,
            items: vec![OrderItemInput {
                product_id: product,
                quantity: 0,
            }],
        })
        .await
        .expect_err("zero quantity must be rejected");
    assert!(matches!(err, ServiceError::ValidationError(_)));

    // Unknown customer: the transaction rolls back, nothing is half-created.
    let err = shop
        .orders
        .create(CreateOrderRequest {
            customer_id: 9999,
            items: vec![OrderItemInput {
                product_id: product,
                quantity: 1,
            }],
        })
        .await
        .expect_err("unknown customer must be rejected");
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert_eq!(stored_order_count(&shop, customer.id).await, 0);
}
