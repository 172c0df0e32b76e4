use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Quotes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Quotes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Quotes::UserId).uuid().not_null())
                    .col(ColumnDef::new(Quotes::CustomerId).uuid().null())
                    .col(ColumnDef::new(Quotes::QuoteNumber).string_len(50).not_null())
                    .col(ColumnDef::new(Quotes::QuoteDate).timestamp().not_null())
                    .col(ColumnDef::new(Quotes::ValidUntil).timestamp().null())
                    .col(ColumnDef::new(Quotes::Items).json().not_null())
                    .col(
                        ColumnDef::new(Quotes::Total)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Quotes::Status)
                            .string_len(50)
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(Quotes::Notes).text().null())
                    .col(ColumnDef::new(Quotes::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Quotes::UpdatedAt).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quotes_user")
                            .from(Quotes::Table, Quotes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quotes_customer")
                            .from(Quotes::Table, Quotes::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_quotes_user_id")
                    .table(Quotes::Table)
                    .col(Quotes::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Quotes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Quotes {
    Table,
    Id,
    UserId,
    CustomerId,
    QuoteNumber,
    QuoteDate,
    ValidUntil,
    Items,
    Total,
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
