use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240308_000017_add_invoice_fields_to_sales"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if !manager
            .has_column("sales", Sales::InvoiceNumber.to_string().as_str())
            .await?
        {
            let mut col = ColumnDef::new(Sales::InvoiceNumber);
            col.string_len(100).null();
            manager
                .alter_table(Table::alter().table(Sales::Table).add_column(col).to_owned())
                .await?;
        }

        if !manager
            .has_column("sales", Sales::InvoiceIssued.to_string().as_str())
            .await?
        {
            let mut col = ColumnDef::new(Sales::InvoiceIssued);
            col.boolean().not_null().default(false);
            manager
                .alter_table(Table::alter().table(Sales::Table).add_column(col).to_owned())
                .await?;
        }

        if !manager
            .has_column("sales", Sales::InvoiceIssuedAt.to_string().as_str())
            .await?
        {
            let mut col = ColumnDef::new(Sales::InvoiceIssuedAt);
            col.timestamp().null();
            manager
                .alter_table(Table::alter().table(Sales::Table).add_column(col).to_owned())
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager
            .has_column("sales", Sales::InvoiceIssuedAt.to_string().as_str())
            .await?
        {
            manager
                .alter_table(
                    Table::alter()
                        .table(Sales::Table)
                        .drop_column(Sales::InvoiceIssuedAt)
                        .to_owned(),
                )
                .await?;
        }

        if manager
            .has_column("sales", Sales::InvoiceIssued.to_string().as_str())
            .await?
        {
            manager
                .alter_table(
                    Table::alter()
                        .table(Sales::Table)
                        .drop_column(Sales::InvoiceIssued)
                        .to_owned(),
                )
                .await?;
        }

        if manager
            .has_column("sales", Sales::InvoiceNumber.to_string().as_str())
            .await?
        {
            manager
                .alter_table(
                    Table::alter()
                        .table(Sales::Table)
                        .drop_column(Sales::InvoiceNumber)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Sales {
    Table,
    InvoiceNumber,
    InvoiceIssued,
    InvoiceIssuedAt,
}
