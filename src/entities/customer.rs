use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    /// Stored in obfuscated form; see `crypto::obfuscate`. The transform is
    /// deterministic, so the unique index on this column still enforces
    /// one row per plaintext address.
    #[sea_orm(unique)]
    pub email: String,

    pub city: Option<String>,

    /// Base64 salt for the personnummer hash.
    pub personnummer_salt: String,

    /// Base64 PBKDF2-SHA256 hash of the personnummer.
    pub personnummer_hash: String,

    /// Derived: number of orders owned by this customer. Maintained by the
    /// aggregate engine; never written directly by callers.
    pub order_count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
