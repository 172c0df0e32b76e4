use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Dashboard: recent sales per tenant.
        manager
            .create_index(
                Index::create()
                    .name("idx_sales_user_date")
                    .table(Sales::Table)
                    .col(Sales::UserId)
                    .col((Sales::SaleDate, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        // Collection reports: payments per tenant over time.
        manager
            .create_index(
                Index::create()
                    .name("idx_payments_user_paid_at")
                    .table(Payments::Table)
                    .col(Payments::UserId)
                    .col((Payments::PaidAt, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        // Active catalogue listing per tenant.
        manager
            .create_index(
                Index::create()
                    .name("idx_products_user_active")
                    .table(Products::Table)
                    .col(Products::UserId)
                    .col(Products::IsActive)
                    .to_owned(),
            )
            .await?;

        // Customer search within a tenant.
        manager
            .create_index(
                Index::create()
                    .name("idx_customers_user_name")
                    .table(Customers::Table)
                    .col(Customers::UserId)
                    .col(Customers::Name)
                    .to_owned(),
            )
            .await?;

        // Session expiry sweeps.
        manager
            .create_index(
                Index::create()
                    .name("idx_user_sessions_expires_at")
                    .table(UserSessions::Table)
                    .col(UserSessions::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_user_sessions_expires_at")
                    .table(UserSessions::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_customers_user_name")
                    .table(Customers::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_products_user_active")
                    .table(Products::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_payments_user_paid_at")
                    .table(Payments::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_sales_user_date")
                    .table(Sales::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Sales {
    Table,
    UserId,
    SaleDate,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    UserId,
    PaidAt,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    UserId,
    IsActive,
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    UserId,
    Name,
}

#[derive(DeriveIden)]
enum UserSessions {
    Table,
    ExpiresAt,
}
