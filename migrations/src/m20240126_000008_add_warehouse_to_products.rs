use sea_orm_migration::{prelude::*, sea_orm::DatabaseBackend};

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240126_000008_add_warehouse_to_products"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if !manager
            .has_column("products", Products::WarehouseId.to_string().as_str())
            .await?
        {
            let mut col = ColumnDef::new(Products::WarehouseId);
            col.uuid().null();
            manager
                .alter_table(
                    Table::alter()
                        .table(Products::Table)
                        .add_column(col)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_products_warehouse_id")
                        .table(Products::Table)
                        .col(Products::WarehouseId)
                        .to_owned(),
                )
                .await?;

            // SQLite cannot attach a constraint to an existing table.
            if manager.get_database_backend() == DatabaseBackend::Postgres {
                manager
                    .create_foreign_key(
                        ForeignKey::create()
                            .name("fk_products_warehouse")
                            .from(Products::Table, Products::WarehouseId)
                            .to(Warehouses::Table, Warehouses::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .to_owned(),
                    )
                    .await?;
            }
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager
            .has_column("products", Products::WarehouseId.to_string().as_str())
            .await?
        {
            if manager.get_database_backend() == DatabaseBackend::Postgres {
                manager
                    .drop_foreign_key(
                        ForeignKey::drop()
                            .name("fk_products_warehouse")
                            .table(Products::Table)
                            .to_owned(),
                    )
                    .await?;
            }

            manager
                .drop_index(
                    Index::drop()
                        .name("idx_products_warehouse_id")
                        .table(Products::Table)
                        .to_owned(),
                )
                .await?;

            manager
                .alter_table(
                    Table::alter()
                        .table(Products::Table)
                        .drop_column(Products::WarehouseId)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Products {
    Table,
    WarehouseId,
}

#[derive(DeriveIden)]
enum Warehouses {
    Table,
    Id,
}
