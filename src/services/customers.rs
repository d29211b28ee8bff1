use std::sync::Arc;

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    crypto,
    db::DbPool,
    entities::customer::{self, Entity as CustomerEntity},
    errors::ServiceError,
    queries::reports::{self, CustomerOrderCount},
    services::{validate_pagination, Page},
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required (max 100 characters)"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Email is required (max 100 characters)"))]
    pub email: String,
    #[validate(length(max = 100, message = "City must be at most 100 characters"))]
    pub city: Option<String>,
    #[validate(length(equal = 12, message = "Personnummer must be 12 digits (YYYYMMDDXXXX)"))]
    pub personnummer: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Email must be 1-100 characters"))]
    pub email: Option<String>,
    #[validate(length(max = 100, message = "City must be at most 100 characters"))]
    pub city: Option<String>,
}

/// Customer as shown to the operator: email deobfuscated, hash material
/// omitted.
#[derive(Debug, Serialize)]
pub struct CustomerView {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub city: Option<String>,
    pub order_count: i32,
}

impl From<customer::Model> for CustomerView {
    fn from(model: customer::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: crypto::deobfuscate(&model.email),
            city: model.city,
            order_count: model.order_count,
        }
    }
}

/// Service for managing customers.
#[derive(Clone)]
pub struct CustomerService {
    db_pool: Arc<DbPool>,
}

impl CustomerService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists customers ordered by id, one page at a time.
    #[instrument(skip(self))]
    pub async fn list(&self, page: u64, page_size: u64) -> Result<Page<CustomerView>, ServiceError> {
        validate_pagination(page, page_size)?;
        let db = &*self.db_pool;

        let paginator = CustomerEntity::find()
            .order_by_asc(customer::Column::Id)
            .paginate(db, page_size);
        let total = paginator.num_items().await?;
        let items = paginator
            .fetch_page(page - 1)
            .await?
            .into_iter()
            .map(CustomerView::from)
            .collect();

        Ok(Page {
            items,
            total,
            page,
            page_size,
        })
    }

    /// Gets a customer by id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<CustomerView, ServiceError> {
        let db = &*self.db_pool;
        let customer = CustomerEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("customer {id}")))?;
        Ok(customer.into())
    }

    /// Creates a customer. The personnummer is stored as a salted
    /// PBKDF2-SHA256 hash and the email in obfuscated form; a duplicate
    /// email surfaces as a constraint violation.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: CreateCustomerRequest) -> Result<CustomerView, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let salt = crypto::generate_salt();
        let hash = crypto::hash_with_salt(&request.personnummer, &salt)
            .ok_or_else(|| ServiceError::ValidationError("invalid salt".to_string()))?;

        let db = &*self.db_pool;
        let model = customer::ActiveModel {
            name: Set(request.name),
            email: Set(crypto::obfuscate(&request.email)),
            city: Set(request.city),
            personnummer_salt: Set(salt),
            personnummer_hash: Set(hash),
            order_count: Set(0),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(ServiceError::from_db)?;

        info!(customer_id = model.id, "Customer created");
        Ok(model.into())
    }

    /// Partially updates a customer's name, email and city.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: i32,
        request: UpdateCustomerRequest,
    ) -> Result<CustomerView, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;
        let customer = CustomerEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("customer {id}")))?;

        let mut active: customer::ActiveModel = customer.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(email) = request.email {
            active.email = Set(crypto::obfuscate(&email));
        }
        if let Some(city) = request.city {
            active.city = Set(Some(city));
        }

        let model = active.update(db).await.map_err(ServiceError::from_db)?;
        info!(customer_id = id, "Customer updated");
        Ok(model.into())
    }

    /// Deletes a customer. Their orders and order rows go with them
    /// (cascading foreign keys).
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let customer = CustomerEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("customer {id}")))?;

        CustomerEntity::delete_by_id(customer.id)
            .exec(db)
            .await
            .map_err(ServiceError::from_db)?;
        info!(customer_id = id, "Customer deleted");
        Ok(())
    }

    /// Looks a customer up by plaintext email. The stored form is the
    /// deterministic obfuscation, so equality lookups still work.
    #[instrument(skip(self, email))]
    pub async fn get_by_email(&self, email: &str) -> Result<Option<CustomerView>, ServiceError> {
        let db = &*self.db_pool;
        let customer = CustomerEntity::find()
            .filter(customer::Column::Email.eq(crypto::obfuscate(email)))
            .one(db)
            .await?;
        Ok(customer.map(CustomerView::from))
    }

    /// Verifies a personnummer against the stored salt + hash.
    #[instrument(skip(self, personnummer))]
    pub async fn verify_personnummer(
        &self,
        id: i32,
        personnummer: &str,
    ) -> Result<bool, ServiceError> {
        let db = &*self.db_pool;
        let customer = CustomerEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("customer {id}")))?;
        Ok(crypto::verify(
            personnummer,
            &customer.personnummer_salt,
            &customer.personnummer_hash,
        ))
    }

    /// Order counts per customer, recomputed from the orders table at read
    /// time (the reporting counterpart of the stored `order_count` column).
    #[instrument(skip(self))]
    pub async fn order_counts(&self) -> Result<Vec<CustomerOrderCount>, ServiceError> {
        let db = &*self.db_pool;
        let mut counts = reports::customer_order_counts(db).await?;
        for row in &mut counts {
            row.email = crypto::deobfuscate(&row.email);
        }
        Ok(counts)
    }
}
