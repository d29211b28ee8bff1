use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .integer()
                            .primary_key()
                            .auto_increment()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Customers::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    // Stored in obfuscated form; the transform is deterministic,
                    // so the unique index still holds per plaintext address.
                    .col(
                        ColumnDef::new(Customers::Email)
                            .string_len(200)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Customers::City).string_len(100).null())
                    .col(
                        ColumnDef::new(Customers::PersonnummerSalt)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Customers::PersonnummerHash)
                            .string()
                            .not_null(),
                    )
                    // Derived: count of this customer's orders, maintained by
                    // the aggregate engine inside every order mutation.
                    .col(
                        ColumnDef::new(Customers::OrderCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Customers {
    Table,
    Id,
    Name,
    Email,
    City,
    PersonnummerSalt,
    PersonnummerHash,
    OrderCount,
}
