use crate::errors::AuthError;
use crate::repositories::{User, UserStore};
use tracing::instrument;

/// All registered users.
#[instrument(skip_all, name = "auth.users.list")]
pub async fn all_users(users: &dyn UserStore) -> Result<Vec<User>, AuthError> {
    let all = users.list_all().await?;
    tracing::info!(target: "auth.services.user", count = all.len(), "Listed users");
    Ok(all)
}
