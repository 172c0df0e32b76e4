use sea_orm_migration::{prelude::*, sea_orm::DatabaseBackend};

/// Widens product price columns from DECIMAL(12,2) to DECIMAL(15,6) so that
/// per-unit prices imported from supplier feeds keep their sub-cent digits.
///
/// `down` narrows back to (12,2); Postgres rounds stored values to two
/// decimal places when it does.
pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240405_000020_widen_product_price_precision"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        match manager.get_database_backend() {
            DatabaseBackend::Postgres => {
                manager
                    .alter_table(
                        Table::alter()
                            .table(Products::Table)
                            .modify_column(
                                ColumnDef::new(Products::PurchasePrice)
                                    .decimal_len(15, 6)
                                    .not_null(),
                            )
                            .modify_column(
                                ColumnDef::new(Products::SalePrice)
                                    .decimal_len(15, 6)
                                    .not_null(),
                            )
                            .to_owned(),
                    )
                    .await?;
            }
            _ => {
                // SQLite does not enforce declared NUMERIC precision.
            }
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        match manager.get_database_backend() {
            DatabaseBackend::Postgres => {
                manager
                    .alter_table(
                        Table::alter()
                            .table(Products::Table)
                            .modify_column(
                                ColumnDef::new(Products::PurchasePrice)
                                    .decimal_len(12, 2)
                                    .not_null(),
                            )
                            .modify_column(
                                ColumnDef::new(Products::SalePrice)
                                    .decimal_len(12, 2)
                                    .not_null(),
                            )
                            .to_owned(),
                    )
                    .await?;
            }
            _ => {
                // No-op for backends without enforced precision.
            }
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Products {
    Table,
    PurchasePrice,
    SalePrice,
}
