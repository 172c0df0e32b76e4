use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Returns::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Returns::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Returns::UserId).uuid().not_null())
                    .col(ColumnDef::new(Returns::SaleId).uuid().null())
                    .col(ColumnDef::new(Returns::CustomerId).uuid().null())
                    .col(ColumnDef::new(Returns::ReturnDate).timestamp().not_null())
                    .col(ColumnDef::new(Returns::Reason).text().null())
                    // Returned line items as a JSON array, snapshot of the sold rows.
                    .col(ColumnDef::new(Returns::Items).json().not_null())
                    .col(
                        ColumnDef::new(Returns::Total)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Returns::Status)
                            .string_len(50)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Returns::Restock)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Returns::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Returns::UpdatedAt).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_returns_user")
                            .from(Returns::Table, Returns::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_returns_sale")
                            .from(Returns::Table, Returns::SaleId)
                            .to(Sales::Table, Sales::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_returns_customer")
                            .from(Returns::Table, Returns::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_returns_user_id")
                    .table(Returns::Table)
                    .col(Returns::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_returns_sale_id")
                    .table(Returns::Table)
                    .col(Returns::SaleId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Returns::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Returns {
    Table,
    Id,
    UserId,
    SaleId,
    CustomerId,
    ReturnDate,
    Reason,
    Items,
    Total,
    Status,
    Restock,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Sales {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
}
