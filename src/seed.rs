//! Demo-data seeder. Each table is only seeded while it is empty, so
//! re-running the tool never duplicates rows. After seeding, the derived
//! aggregates are reconciled so the database starts consistent.

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use tracing::{info, instrument};

use crate::{
    aggregates, crypto,
    db::DbPool,
    entities::{category, customer, order, order_row, product},
    errors::ServiceError,
};

#[instrument(skip(db))]
pub async fn seed_demo_data(db: &DbPool) -> Result<(), ServiceError> {
    if customer::Entity::find().count(db).await? == 0 {
        let customers = [
            ("Anna Andersson", "anna.andersson@gmail.com", "Stockholm", "198505150001"),
            ("Peter Persson", "peter@persson.com", "Malmö", "197902280002"),
            ("Olof Olson", "olof.olson@live.se", "Umeå", "199011010003"),
            ("Gunilla Gran", "gunillagran@outlook.com", "Göteborg", "196507070004"),
        ];
        for (name, email, city, personnummer) in customers {
            let salt = crypto::generate_salt();
            let hash = crypto::hash_with_salt(personnummer, &salt)
                .ok_or_else(|| ServiceError::ValidationError("invalid salt".to_string()))?;
            customer::ActiveModel {
                name: Set(name.to_string()),
                email: Set(crypto::obfuscate(email)),
                city: Set(Some(city.to_string())),
                personnummer_salt: Set(salt),
                personnummer_hash: Set(hash),
                order_count: Set(0),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        info!("Seeded customers");
    }

    if category::Entity::find().count(db).await? == 0 {
        let categories = [
            ("Electronics", "Devices and gadgets"),
            ("Accessories", "Phone and computer accessories"),
            ("Wearables", "Smart watches and fitness trackers"),
            ("Gaming", "Gaming peripherals and consoles"),
        ];
        for (name, description) in categories {
            category::ActiveModel {
                name: Set(name.to_string()),
                description: Set(Some(description.to_string())),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        info!("Seeded categories");
    }

    if product::Entity::find().count(db).await? == 0 {
        let products = [
            ("Headphones", "Wireless headphones", dec!(799), 2),
            ("Keyboard", "Backlit mechanical keyboard", dec!(599), 1),
            ("Monitor", "4K display", dec!(349), 2),
            ("Smart Watch", "Smart fitness watch", dec!(999), 3),
            ("Powerbank", "Fast charging powerbank", dec!(200), 2),
        ];
        for (name, description, price, category_id) in products {
            product::ActiveModel {
                name: Set(name.to_string()),
                description: Set(Some(description.to_string())),
                price: Set(price),
                category_id: Set(Some(category_id)),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        info!("Seeded products");
    }

    if order::Entity::find().count(db).await? == 0 {
        let now = Utc::now();
        let orders = [
            (1, 10, order::OrderStatus::Completed),
            (2, 2, order::OrderStatus::Processing),
            (1, 5, order::OrderStatus::Completed),
            (3, 4, order::OrderStatus::Canceled),
        ];
        for (customer_id, days_ago, status) in orders {
            order::ActiveModel {
                customer_id: Set(customer_id),
                order_date: Set(now - Duration::days(days_ago)),
                status: Set(status),
                total_amount: Set(dec!(0)),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        info!("Seeded orders");
    }

    if order_row::Entity::find().count(db).await? == 0 {
        let rows = [
            (1, 1, 4, dec!(799)),
            (2, 2, 2, dec!(599)),
            (3, 3, 6, dec!(349)),
        ];
        for (order_id, product_id, quantity, unit_price) in rows {
            order_row::ActiveModel {
                order_id: Set(order_id),
                product_id: Set(product_id),
                quantity: Set(quantity),
                unit_price: Set(unit_price),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        info!("Seeded order rows");
    }

    reconcile_aggregates(db).await?;
    Ok(())
}

/// Recomputes every stored aggregate from its detail rows. Seed rows are
/// inserted directly, bypassing the service-layer hooks, so the derived
/// columns have to be brought in line once here.
async fn reconcile_aggregates(db: &DbPool) -> Result<(), ServiceError> {
    for order in order::Entity::find().all(db).await? {
        aggregates::recompute_order_total(db, order.id).await?;
    }
    for customer in customer::Entity::find().all(db).await? {
        aggregates::recompute_customer_order_count(db, customer.id).await?;
    }
    Ok(())
}
