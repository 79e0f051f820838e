//! Plain-text rendering of posts and app state.

use std::fmt::Write as _;

use bloglist_core::app::{App, PostControls, Severity};
use bloglist_core::models::Post;
use bloglist_core::storage::Storage;

/// Collapsed one-line view: title, owner and id.
pub fn post_line(post: &Post) -> String {
    format!("{} {} [{}]", post.title, post.owner_label(), post.id)
}

/// Expanded view lines below the title line.
pub fn post_details(post: &Post, controls: PostControls) -> Vec<String> {
    let mut lines = vec![
        post.url.clone(),
        format!("likes {}", post.likes()),
        post.owner_label().to_string(),
    ];

    let actions: Vec<&str> = [("like", controls.like), ("remove", controls.remove)]
        .into_iter()
        .filter_map(|(name, allowed)| allowed.then_some(name))
        .collect();
    if !actions.is_empty() {
        lines.push(format!("actions: {}", actions.join(", ")));
    }
    lines
}

/// Owner-gated expanded view for a full post.
pub fn post_block<S: Storage>(app: &App<S>, post: &Post) -> String {
    let mut out = post_line(post);
    for line in post_details(post, app.controls(post)) {
        out.push_str("\n    ");
        out.push_str(&line);
    }
    out
}

pub fn notification_line<S: Storage>(app: &App<S>) -> Option<String> {
    app.state
        .notification
        .current()
        .map(|(message, severity)| match severity {
            Severity::Success => format!("[ok] {message}"),
            Severity::Failure => format!("[error] {message}"),
        })
}

/// The whole shell screen: notification, user line, form, and list.
pub fn screen<S: Storage>(app: &App<S>) -> String {
    let mut out = String::new();

    if let Some(line) = notification_line(app) {
        let _ = writeln!(out, "{line}");
    }

    match app.current_user() {
        Some(user) => {
            let _ = writeln!(out, "blogs");
            let _ = writeln!(out, "{} logged in", user.display_name());
            if app.state.form_open {
                let form = &app.state.blog_form;
                let _ = writeln!(out, "create new");
                let _ = writeln!(out, "  title: {}", form.title);
                let _ = writeln!(out, "  author: {}", user.display_name());
                let _ = writeln!(out, "  url: {}", form.url);
                let _ = writeln!(out, "  (submit | cancel)");
            }
        }
        None => {
            let _ = writeln!(out, "not logged in (login <username> <password>)");
            if !app.state.posts.is_empty() {
                let _ = writeln!(out, "Available Blogs");
            }
        }
    }

    for (index, post) in app.sorted_posts().into_iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {}", index + 1, post_line(post));
        if app.state.posts.is_expanded(&post.id) {
            for line in post_details(post, app.controls(post)) {
                let _ = writeln!(out, "       {line}");
            }
        }
    }

    out
}
