use crate::{
    db::Filter,
    models::user::{User, UserRole},
    state::AppState,
    utils::password::hash_password,
};

/// Creates the configured bootstrap administrator when it does not exist yet.
///
/// Returns the created user, or `None` when nothing was configured or the account exists.
pub async fn ensure_admin(state: &AppState) -> anyhow::Result<Option<User>> {
    let (Some(email), Some(password)) = (
        state.config.admin_email.as_deref(),
        state.config.admin_password.as_deref(),
    ) else {
        return Ok(None);
    };

    create_admin(state, email, password, "Administrator").await
}

pub async fn create_admin(
    state: &AppState,
    email: &str,
    password: &str,
    name: &str,
) -> anyhow::Result<Option<User>> {
    let users = state.collection::<User>();
    let email = crate::models::user::normalize_email(email);
    if users
        .find_one(Filter::new().eq("email", email.as_str()))
        .await?
        .is_some()
    {
        tracing::debug!(%email, "Admin account already exists");
        return Ok(None);
    }

    let admin = User::new(&email, name.to_string(), hash_password(password)?, UserRole::Admin);
    users.insert(&admin).await?;
    tracing::info!(%email, "Created admin account");
    Ok(Some(admin))
}
