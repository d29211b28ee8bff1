mod common;

use rust_decimal_macros::dec;
use shopkeeper::services::orders::{CreateOrderRequest, OrderItemInput};

use common::TestShop;

#[tokio::test]
async fn order_summaries_match_stored_totals_and_show_plaintext_email() {
    let shop = TestShop::new().await;
    let customer = shop.seed_customer("Johan", "johan@example.com").await;
    let product = shop.seed_product("Headphones", dec!(799)).await;

    let order = shop
        .orders
        .create(CreateOrderRequest {
            customer_id: customer.id,
            items: vec![OrderItemInput {
                product_id: product,
                quantity: 4,
            }],
        })
        .await
        .expect("create order");

    let summaries = shop.orders.summaries().await.expect("summaries");
    let summary = summaries
        .iter()
        .find(|s| s.order_id == order.id)
        .expect("order appears in summary");

    // The view recomputes from rows; it must agree with the stored total.
    assert_eq!(summary.total_amount, order.total_amount);
    assert_eq!(summary.total_amount, dec!(3196));
    assert_eq!(summary.customer_name, "Johan");
    assert_eq!(summary.customer_email, "johan@example.com");
}

#[tokio::test]
async fn customers_with_no_orders_appear_with_zero_count() {
    let shop = TestShop::new().await;
    let with_orders = shop.seed_customer("Karin", "karin@example.com").await;
    let without_orders = shop.seed_customer("Lars", "lars@example.com").await;
    let product = shop.seed_product("Keyboard", dec!(599)).await;

    shop.orders
        .create(CreateOrderRequest {
            customer_id: with_orders.id,
            items: vec![OrderItemInput {
                product_id: product,
                quantity: 1,
            }],
        })
        .await
        .expect("create order");

    let counts = shop.customers.order_counts().await.expect("counts");
    let karin = counts
        .iter()
        .find(|c| c.customer_id == with_orders.id)
        .expect("karin present");
    let lars = counts
        .iter()
        .find(|c| c.customer_id == without_orders.id)
        .expect("lars present even with zero orders");

    assert_eq!(karin.number_of_orders, 1);
    assert_eq!(lars.number_of_orders, 0);
    assert_eq!(lars.email, "lars@example.com");
}

#[tokio::test]
async fn unsold_products_report_zero_quantity_not_absence() {
    let shop = TestShop::new().await;
    let customer = shop.seed_customer("Maja", "maja@example.com").await;
    let sold = shop.seed_product("Monitor", dec!(349)).await;
    let unsold = shop.seed_product("Powerbank", dec!(200)).await;

    shop.orders
        .create(CreateOrderRequest {
            customer_id: customer.id,
            items: vec![OrderItemInput {
                product_id: sold,
                quantity: 6,
            }],
        })
        .await
        .expect("create order");

    let sales = shop.products.sales().await.expect("sales");
    let sold_row = sales.iter().find(|s| s.product_id == sold).expect("sold");
    let unsold_row = sales
        .iter()
        .find(|s| s.product_id == unsold)
        .expect("unsold product still listed");

    assert_eq!(sold_row.total_quantity_sold, 6);
    assert_eq!(unsold_row.total_quantity_sold, 0);
}

#[tokio::test]
async fn deleting_rows_is_reflected_in_reports_immediately() {
    let shop = TestShop::new().await;
    let customer = shop.seed_customer("Nils", "nils@example.com").await;
    let product = shop.seed_product("Smart Watch", dec!(999)).await;

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

    shop.orders
        .delete_row(order.rows[0].row_id)
        .await
        .expect("delete row");

    let summaries = shop.orders.summaries().await.expect("summaries");
    let summary = summaries
        .iter()
        .find(|s| s.order_id == order.id)
        .expect("order still summarized");
    assert_eq!(summary.total_amount, dec!(0));

    let sales = shop.products.sales().await.expect("sales");
    let row = sales.iter().find(|s| s.product_id == product).expect("row");
    assert_eq!(row.total_quantity_sold, 0);
}
