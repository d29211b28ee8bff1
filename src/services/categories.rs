use std::sync::Arc;

use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    db::DbPool,
    entities::category::{self, Entity as CategoryEntity, Model as CategoryModel},
    errors::ServiceError,
    services::{validate_pagination, Page},
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required (max 100 characters)"))]
    pub name: String,
    #[validate(length(max = 250, message = "Description must be at most 250 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 250, message = "Description must be at most 250 characters"))]
    pub description: Option<String>,
}

/// Service for managing product categories.
#[derive(Clone)]
pub struct CategoryService {
    db_pool: Arc<DbPool>,
}

impl CategoryService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists categories ordered by id, one page at a time.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<Page<CategoryModel>, ServiceError> {
        validate_pagination(page, page_size)?;
        let db = &*self.db_pool;

        let paginator = CategoryEntity::find()
            .order_by_asc(category::Column::Id)
            .paginate(db, page_size);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page - 1).await?;

        Ok(Page {
            items,
            total,
            page,
            page_size,
        })
    }

    /// Gets a category by id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<CategoryModel, ServiceError> {
        let db = &*self.db_pool;
        CategoryEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("category {id}")))
    }

    /// Creates a category; a duplicate name surfaces as a constraint
    /// violation.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: CreateCategoryRequest) -> Result<CategoryModel, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;
        let model = category::ActiveModel {
            name: Set(request.name),
            description: Set(request.description),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(ServiceError::from_db)?;

        info!(category_id = model.id, "Category created");
        Ok(model)
    }

    /// Partially updates a category.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: i32,
        request: UpdateCategoryRequest,
    ) -> Result<CategoryModel, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;
        let category = CategoryEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("category {id}")))?;

        let mut active: category::ActiveModel = category.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }

        let model = active.update(db).await.map_err(ServiceError::from_db)?;
        info!(category_id = id, "Category updated");
        Ok(model)
    }

    /// Deletes a category. Rejected (constraint violation) while any product
    /// still references it.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let category = CategoryEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("category {id}")))?;

        CategoryEntity::delete_by_id(category.id)
            .exec(db)
            .await
            .map_err(ServiceError::from_db)?;
        info!(category_id = id, "Category deleted");
        Ok(())
    }
}
