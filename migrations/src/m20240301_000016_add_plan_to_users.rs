use sea_orm_migration::{prelude::*, sea_orm::DatabaseBackend};

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240301_000016_add_plan_to_users"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if !manager
            .has_column("users", Users::PlanId.to_string().as_str())
            .await?
        {
            let mut col = ColumnDef::new(Users::PlanId);
            col.uuid().null();
            manager
                .alter_table(Table::alter().table(Users::Table).add_column(col).to_owned())
                .await?;

            if manager.get_database_backend() == DatabaseBackend::Postgres {
                manager
                    .create_foreign_key(
                        ForeignKey::create()
                            .name("fk_users_plan")
                            .from(Users::Table, Users::PlanId)
                            .to(Plans::Table, Plans::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .to_owned(),
                    )
                    .await?;
            }
        }

        if !manager
            .has_column("users", Users::PlanExpiresAt.to_string().as_str())
            .await?
        {
            let mut col = ColumnDef::new(Users::PlanExpiresAt);
            col.timestamp().null();
            manager
                .alter_table(Table::alter().table(Users::Table).add_column(col).to_owned())
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager
            .has_column("users", Users::PlanExpiresAt.to_string().as_str())
            .await?
        {
            manager
                .alter_table(
                    Table::alter()
                        .table(Users::Table)
                        .drop_column(Users::PlanExpiresAt)
                        .to_owned(),
                )
                .await?;
        }

        if manager
            .has_column("users", Users::PlanId.to_string().as_str())
            .await?
        {
            if manager.get_database_backend() == DatabaseBackend::Postgres {
                manager
                    .drop_foreign_key(
                        ForeignKey::drop()
                            .name("fk_users_plan")
                            .table(Users::Table)
                            .to_owned(),
                    )
                    .await?;
            }

            manager
                .alter_table(
                    Table::alter()
                        .table(Users::Table)
                        .drop_column(Users::PlanId)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    PlanId,
    PlanExpiresAt,
}

#[derive(DeriveIden)]
enum Plans {
    Table,
    Id,
}
