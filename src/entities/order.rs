use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order lifecycle status, stored as a lowercase string.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[strum(ascii_case_insensitive)]
pub enum OrderStatus {
    #[sea_orm(string_value = "processing")]
    #[strum(serialize = "processing")]
    Processing,
    #[sea_orm(string_value = "completed")]
    #[strum(serialize = "completed")]
    Completed,
    #[sea_orm(string_value = "canceled")]
    #[strum(serialize = "canceled")]
    Canceled,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub customer_id: i32,

    pub order_date: DateTime<Utc>,

    pub status: OrderStatus,

    /// Derived: sum of `quantity * unit_price` over this order's rows.
    /// Maintained by the aggregate engine; never written directly by callers.
    pub total_amount: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
    #[sea_orm(has_many = "super::order_row::Entity")]
    OrderRows,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::order_row::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderRows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
