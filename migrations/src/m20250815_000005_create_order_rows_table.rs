use sea_orm_migration::prelude::*;

use crate::m20250815_000003_create_products_table::Products;
use crate::m20250815_000004_create_orders_table::Orders;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrderRows::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderRows::Id)
                            .integer()
                            .primary_key()
                            .auto_increment()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OrderRows::OrderId).integer().not_null())
                    .col(ColumnDef::new(OrderRows::ProductId).integer().not_null())
                    .col(ColumnDef::new(OrderRows::Quantity).integer().not_null())
                    // Captured from the product at order-creation time and
                    // never rewritten; later product price changes must not
                    // alter historical rows.
                    .col(ColumnDef::new(OrderRows::UnitPrice).decimal().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_rows_order")
                            .from(OrderRows::Table, OrderRows::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_rows_product")
                            .from(OrderRows::Table, OrderRows::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrderRows::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum OrderRows {
    Table,
    Id,
    OrderId,
    ProductId,
    Quantity,
    UnitPrice,
}
