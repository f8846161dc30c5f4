use uuid::Uuid;

use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;

/// Provision the admin account named in FIRST_ADMIN_USERNAME at boot, and
/// rotate its hash when FIRST_ADMIN_PASSWORD no longer matches the stored one.
pub(crate) async fn ensure_default_admin(state: &AppState) -> anyhow::Result<()> {
    let admin = state.settings().admin();
    if admin.first_admin_password.is_empty() {
        tracing::warn!("FIRST_ADMIN_PASSWORD not configured; skipping default admin creation");
        return Ok(());
    }

    let username = &admin.first_admin_username;
    let existing = repositories::admins::find_by_username(state.db(), username).await?;
    let now = primitive_now_utc();

    if let Some(existing) = existing {
        let verified =
            security::verify_password(&admin.first_admin_password, &existing.hashed_password)
                .unwrap_or(false);

        if verified {
            tracing::info!("Default admin already up to date");
            return Ok(());
        }

        let hashed_password = security::hash_password(&admin.first_admin_password)?;
        repositories::admins::update_password(state.db(), &existing.id, &hashed_password, now)
            .await?;
        tracing::info!("Updated default admin {username}");
        return Ok(());
    }

    let hashed_password = security::hash_password(&admin.first_admin_password)?;
    repositories::admins::create(
        state.db(),
        &Uuid::new_v4().to_string(),
        username,
        &hashed_password,
        now,
    )
    .await?;

    tracing::info!("Created default admin {username}");
    Ok(())
}
