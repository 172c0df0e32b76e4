use crate::{
    auth,
    config::AppConfig,
    db::DbPool,
    entities::user::{self, Entity as User},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Ensures exactly one super admin account exists for the configured email.
///
/// Safe to run on every boot: an existing account is updated in place with a
/// fresh password hash, and super admin accounts left over from a previous
/// email configuration are removed.
#[instrument(skip(db, password))]
pub async fn seed_super_admin(
    db: &DbPool,
    email: &str,
    password: &str,
) -> Result<user::Model, ServiceError> {
    let stale = User::delete_many()
        .filter(user::Column::Role.eq(user::ROLE_SUPER_ADMIN))
        .filter(user::Column::Email.ne(email))
        .exec(db)
        .await
        .map_err(|e| {
            ServiceError::db_error(format!("Failed to remove stale super admins: {}", e))
        })?;

    if stale.rows_affected > 0 {
        warn!(
            removed = stale.rows_affected,
            "Removed super admin accounts with outdated email"
        );
    }

    let password_hash = auth::hash_password(password)?;
    let now = Utc::now().naive_utc();

    let existing = User::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(|e| ServiceError::db_error(format!("Failed to look up super admin: {}", e)))?;

    let seeded = match existing {
        Some(found) => {
            let id = found.id;
            let mut model: user::ActiveModel = found.into();
            model.password_hash = Set(password_hash);
            model.role = Set(user::ROLE_SUPER_ADMIN.to_string());
            model.is_active = Set(true);
            model.updated_at = Set(Some(now));
            let updated = model.update(db).await.map_err(|e| {
                ServiceError::db_error(format!("Failed to update super admin: {}", e))
            })?;
            info!(user_id = %id, email = %email, "Super admin refreshed");
            updated
        }
        None => {
            let model = user::ActiveModel {
                id: Set(Uuid::new_v4()),
                email: Set(email.to_string()),
                password_hash: Set(password_hash),
                full_name: Set("Super Admin".to_string()),
                role: Set(user::ROLE_SUPER_ADMIN.to_string()),
                phone: Set(None),
                is_active: Set(true),
                plan_id: Set(None),
                plan_expires_at: Set(None),
                created_at: Set(now),
                updated_at: Set(None),
            };
            let created = model.insert(db).await.map_err(|e| {
                ServiceError::db_error(format!("Failed to create super admin: {}", e))
            })?;
            info!(user_id = %created.id, email = %email, "Super admin created");
            created
        }
    };

    Ok(seeded)
}

/// Seeds the super admin from configuration. Missing credentials are a
/// configuration error rather than a silent no-op.
pub async fn seed_super_admin_from_config(
    db: &DbPool,
    config: &AppConfig,
) -> Result<user::Model, ServiceError> {
    let email = config.super_admin_email.as_deref().ok_or_else(|| {
        ServiceError::Configuration("super_admin_email is not configured".to_string())
    })?;
    let password = config.super_admin_password.as_deref().ok_or_else(|| {
        ServiceError::Configuration("super_admin_password is not configured".to_string())
    })?;

    seed_super_admin(db, email, password).await
}
