mod common;

use sea_orm::EntityTrait;
use shopkeeper::{
    entities::customer::Entity as CustomerEntity,
    services::customers::{CreateCustomerRequest, UpdateCustomerRequest},
    ServiceError,
};

use common::TestShop;

#[tokio::test]
async fn emails_are_stored_obfuscated_but_shown_in_plaintext() {
    let shop = TestShop::new().await;
    let created = shop.seed_customer("Anna", "anna@example.com").await;
    assert_eq!(created.email, "anna@example.com");

    // The row itself never holds the plaintext address.
    let stored = CustomerEntity::find_by_id(created.id)
        .one(&*shop.db)
        .await
        .expect("query customer")
        .expect("customer exists");
    assert_ne!(stored.email, "anna@example.com");

    // Deterministic obfuscation keeps equality lookups working.
    let found = shop
        .customers
        .get_by_email("anna@example.com")
        .await
        .expect("lookup")
        .expect("found by plaintext email");
    assert_eq!(found.id, created.id);
}

#[tokio::test]
async fn personnummer_is_hashed_and_verifiable() {
    let shop = TestShop::new().await;
    let created = shop
        .customers
        .create(CreateCustomerRequest {
            name: "Olof".to_string(),
            email: "olof@example.com".to_string(),
            city: None,
            personnummer: "198204040042".to_string(),
        })
        .await
        .expect("create");

    let stored = CustomerEntity::find_by_id(created.id)
        .one(&*shop.db)
        .await
        .expect("query customer")
        .expect("customer exists");
    assert_ne!(stored.personnummer_hash, "198204040042");
    assert!(!stored.personnummer_salt.is_empty());

    assert!(shop
        .customers
        .verify_personnummer(created.id, "198204040042")
        .await
        .expect("verify"));
    assert!(!shop
        .customers
        .verify_personnummer(created.id, "198204040043")
        .await
        .expect("verify"));
}

#[tokio::test]
async fn partial_update_only_changes_provided_fields() {
    let shop = TestShop::new().await;
    let created = shop.seed_customer("Pelle", "pelle@example.com").await;

    let updated = shop
        .customers
        .update(
            created.id,
            UpdateCustomerRequest {
                city: Some("Malmö".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("update");

    assert_eq!(updated.name, "Pelle");
    assert_eq!(updated.email, "pelle@example.com");
    assert_eq!(updated.city.as_deref(), Some("Malmö"));
}

#[tokio::test]
async fn listing_is_paginated_and_rejects_bad_pages() {
    let shop = TestShop::new().await;
    for i in 0..5 {
        shop.seed_customer(&format!("Customer {i}"), &format!("c{i}@example.com"))
            .await;
    }

    let page = shop.customers.list(1, 2).await.expect("page 1");
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 5);
    assert_eq!(page.total_pages(), 3);

    let last = shop.customers.list(3, 2).await.expect("page 3");
    assert_eq!(last.items.len(), 1);

    assert!(matches!(
        shop.customers.list(0, 2).await,
        Err(ServiceError::InvalidInput(_))
    ));
    assert!(matches!(
        shop.customers.list(1, 0).await,
        Err(ServiceError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn create_rejects_invalid_personnummer_before_db_work() {
    let shop = TestShop::new().await;
    let err = shop
        .customers
        .create(CreateCustomerRequest {
            name: "Quirin".to_string(),
            email: "quirin@example.com".to_string(),
            city: None,
            personnummer: "too short".to_string(),
        })
        .await
        .expect_err("invalid personnummer must be rejected");
    assert!(matches!(err, ServiceError::ValidationError(_)));
}
