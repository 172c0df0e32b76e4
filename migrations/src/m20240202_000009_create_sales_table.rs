use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sales::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sales::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Sales::UserId).uuid().not_null())
                    .col(ColumnDef::new(Sales::CustomerId).uuid().null())
                    .col(ColumnDef::new(Sales::SaleNumber).string_len(50).not_null())
                    .col(ColumnDef::new(Sales::SaleDate).timestamp().not_null())
                    .col(
                        ColumnDef::new(Sales::Subtotal)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Sales::VatTotal)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Sales::Discount)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Sales::GrandTotal)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Sales::Status)
                            .string_len(50)
                            .not_null()
                            .default("completed"),
                    )
                    .col(ColumnDef::new(Sales::Notes).text().null())
                    .col(ColumnDef::new(Sales::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Sales::UpdatedAt).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sales_user")
                            .from(Sales::Table, Sales::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sales_customer")
                            .from(Sales::Table, Sales::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sales_user_id")
                    .table(Sales::Table)
                    .col(Sales::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sales_customer_id")
                    .table(Sales::Table)
                    .col(Sales::CustomerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sales_sale_number")
                    .table(Sales::Table)
                    .col(Sales::SaleNumber)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sales::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Sales {
    Table,
    Id,
    UserId,
    CustomerId,
    SaleNumber,
    SaleDate,
    Subtotal,
    VatTotal,
    Discount,
    GrandTotal,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
}
