mod cleanup;
mod history;
mod image;
mod init;
mod search;
mod serve;

pub use cleanup::cmd_cleanup;
pub use history::cmd_history;
pub use image::cmd_image;
pub use init::cmd_init;
pub use search::cmd_search;
pub use serve::cmd_serve;

use crate::db::{Store, User};

/// Opens the configured database and resolves `email` to a user.
async fn open_for_user(config: &crate::config::Config, email: &str) -> anyhow::Result<(Store, User)> {
    let store = Store::new(&config.general.database_url).await?;
    let user = store
        .get_user_by_email(email)
        .await?
        .ok_or_else(|| anyhow::anyhow!("No user registered with email: {email}"))?;
    Ok((store, user))
}
