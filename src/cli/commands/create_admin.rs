//! Create-admin command handler

use crate::config::Config;
use crate::db::{NewUser, Store};

pub async fn cmd_create_admin(
    config: &Config,
    username: &str,
    password: &str,
    name: Option<&str>,
) -> anyhow::Result<()> {
    let username = username.trim();
    if username.chars().count() < 3 {
        anyhow::bail!("Username must be at least 3 characters");
    }
    if password.chars().count() < config.security.min_password_length {
        anyhow::bail!(
            "Password must be at least {} characters",
            config.security.min_password_length
        );
    }

    let store = Store::new(&config.general.database_path).await?;
    if store.username_taken(username, None).await? {
        anyhow::bail!("Username '{username}' is already taken");
    }

    let user = store
        .create_user(
            NewUser {
                name: name.unwrap_or(username),
                username,
                password,
                is_admin: true,
            },
            &config.security,
        )
        .await?;

    println!("Created administrator '{}' (id {})", user.username, user.id);
    Ok(())
}
