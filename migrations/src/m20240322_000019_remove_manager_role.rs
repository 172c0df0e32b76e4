use sea_orm_migration::prelude::*;

/// Collapses the retired `manager` role into `admin`.
///
/// One-way: once the rows are rewritten there is no record of which
/// accounts used to be managers, so `down` is a deliberate no-op.
pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240322_000019_remove_manager_role"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("UPDATE users SET role = 'admin' WHERE role = 'manager'")
            .await?;
        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        // Irreversible role rewrite, see the struct docs.
        Ok(())
    }
}
