use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SaleItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SaleItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SaleItems::SaleId).uuid().not_null())
                    .col(ColumnDef::new(SaleItems::ProductId).uuid().null())
                    .col(
                        ColumnDef::new(SaleItems::ProductName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SaleItems::Quantity)
                            .decimal_len(15, 3)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SaleItems::Unit)
                            .string_len(50)
                            .not_null()
                            .default("adet"),
                    )
                    .col(
                        ColumnDef::new(SaleItems::UnitPrice)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SaleItems::VatRate)
                            .decimal_len(5, 2)
                            .not_null()
                            .default(20),
                    )
                    .col(
                        ColumnDef::new(SaleItems::Discount)
                            .decimal_len(12, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SaleItems::LineTotal)
                            .decimal_len(15, 2)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sale_items_sale")
                            .from(SaleItems::Table, SaleItems::SaleId)
                            .to(Sales::Table, Sales::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sale_items_product")
                            .from(SaleItems::Table, SaleItems::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sale_items_sale_id")
                    .table(SaleItems::Table)
                    .col(SaleItems::SaleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sale_items_product_id")
                    .table(SaleItems::Table)
                    .col(SaleItems::ProductId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SaleItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SaleItems {
    Table,
    Id,
    SaleId,
    ProductId,
    ProductName,
    Quantity,
    Unit,
    UnitPrice,
    VatRate,
    Discount,
    LineTotal,
}

#[derive(DeriveIden)]
enum Sales {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
}
