use sea_orm_migration::prelude::*;

/// Marks every sale that already carries an invoice number as issued.
///
/// One-way: the pre-backfill flag values are not recorded anywhere, so
/// `down` cannot tell backfilled rows apart from rows flagged by the
/// application afterwards. Reverting is a deliberate no-op.
pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240315_000018_backfill_invoice_issued"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "UPDATE sales SET invoice_issued = TRUE WHERE invoice_number IS NOT NULL",
        )
        .await?;
        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        // Irreversible data backfill, see the struct docs.
        Ok(())
    }
}
