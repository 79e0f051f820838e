//! Blog command handlers.

use anyhow::Result;
use bloglist_core::config::Config;
use bloglist_core::models::PostUpdate;

use super::{confirm, open_app, report, require_login};
use crate::render;

pub async fn list(config: &Config) -> Result<()> {
    let mut app = open_app(config)?;
    if !app.start().await.fetched {
        anyhow::bail!("Failed to fetch blogs from {}", app.client().base_url());
    }

    match app.current_user() {
        Some(user) => println!("{} logged in", user.display_name()),
        None => println!("not logged in"),
    }
    if app.state.posts.is_empty() {
        println!("No blogs yet.");
    }
    for post in app.sorted_posts() {
        println!("{}", render::post_line(post));
    }
    Ok(())
}

pub async fn show(config: &Config, id: &str) -> Result<()> {
    let mut app = open_app(config)?;
    if !app.start().await.fetched {
        anyhow::bail!("Failed to fetch blogs from {}", app.client().base_url());
    }

    let post = app
        .state
        .posts
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("No blog with id {id}"))?;
    println!("{}", render::post_block(&app, post));
    Ok(())
}

pub async fn create(config: &Config, title: &str, url: &str) -> Result<()> {
    let mut app = open_app(config)?;
    app.start().await;
    require_login(&app)?;

    app.open_form();
    app.create_blog(title, url).await;
    report(&app)
}

pub async fn like(config: &Config, id: &str) -> Result<()> {
    let mut app = open_app(config)?;
    app.start().await;
    require_login(&app)?;

    app.like(id).await;
    report(&app)
}

pub async fn update(config: &Config, id: &str, changes: &PostUpdate) -> Result<()> {
    if changes.is_empty() {
        anyhow::bail!("Nothing to update: pass --title, --author, --url or --likes");
    }

    let mut app = open_app(config)?;
    app.start().await;
    app.update(id, changes).await;
    report(&app)
}

pub async fn remove(config: &Config, id: &str, yes: bool) -> Result<()> {
    let mut app = open_app(config)?;
    app.start().await;
    require_login(&app)?;

    if !yes {
        let question = app
            .remove_prompt(id)
            .unwrap_or_else(|| format!("Remove blog {id}?"));
        if !confirm(&question)? {
            println!("Removal cancelled.");
            return Ok(());
        }
    }

    app.remove(id).await;
    report(&app)
}
