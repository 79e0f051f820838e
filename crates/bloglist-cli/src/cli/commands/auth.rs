//! Auth command handlers.

use anyhow::Result;
use bloglist_core::config::Config;
use bloglist_core::session::{SessionStore, StoredSession};
use bloglist_core::storage::FileStorage;

use super::{open_app, prompt, report};

/// Shows only the start of a token.
fn mask_token(token: &str) -> String {
    let prefix: String = token.chars().take(8).collect();
    if prefix.len() < token.len() {
        format!("{prefix}...")
    } else {
        "***".to_string()
    }
}

pub async fn login(config: &Config, username: Option<String>, password: Option<String>) -> Result<()> {
    let username = match username {
        Some(username) => username,
        None => prompt("username: ")?,
    };
    if username.trim().is_empty() {
        anyhow::bail!("Username cannot be empty");
    }
    let password = match password {
        Some(password) => password,
        None => prompt("password: ")?,
    };

    let mut app = open_app(config)?;
    app.login_with(&username, &password).await;
    report(&app)?;

    println!(
        "  Session saved to: {}",
        app.sessions().storage().path().display()
    );
    Ok(())
}

pub async fn logout(config: &Config) -> Result<()> {
    let mut app = open_app(config)?;
    let stored = app.sessions().load();
    if stored == StoredSession::Missing {
        println!("Not logged in (no session found).");
        return Ok(());
    }

    app.logout().await;
    if stored == StoredSession::Corrupt {
        println!("Discarded unreadable session");
    } else {
        println!("Logged out");
    }
    println!(
        "  Session removed from: {}",
        app.sessions().storage().path().display()
    );
    Ok(())
}

pub fn whoami() -> Result<()> {
    let store = SessionStore::new(FileStorage::default_location());
    match store.load().into_session() {
        Some(session) => {
            println!(
                "{} logged in as {} (token: {})",
                session.display_name(),
                session.username,
                mask_token(&session.token)
            );
        }
        None => println!("Not logged in."),
    }
    Ok(())
}
