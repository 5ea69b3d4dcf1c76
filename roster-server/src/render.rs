//! HTML rendering for the users page
//!
//! Plain string building; every interpolated value goes through
//! `escape_html`.

use chrono::{DateTime, Utc};

use crate::db::{User, UserWithPosts};

/// Shown in place of a missing display name
pub const UNKNOWN_NAME: &str = "Unknown";

/// Shown when the store has no users at all
pub const EMPTY_MESSAGE: &str = "No users found. Run `roster seed` to add sample data.";

const BLOCK_STYLE: &str =
    "border: 1px solid #ddd; padding: 1rem; margin-bottom: 1rem; border-radius: 4px;";

/// Render the full users page document.
pub fn render_users_page(users: &[UserWithPosts]) -> String {
    let mut body = String::new();
    body.push_str("<h1>Users from Database</h1>\n");

    if users.is_empty() {
        body.push_str(&format!("<p>{}</p>\n", escape_html(EMPTY_MESSAGE)));
    } else {
        body.push_str("<div>\n");
        for entry in users {
            render_user_block(&mut body, entry);
        }
        body.push_str("</div>\n");
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Users</title>\n</head>\n<body>\n<div style=\"padding: 2rem;\">\n{}</div>\n\
         </body>\n</html>\n",
        body
    )
}

fn render_user_block(out: &mut String, entry: &UserWithPosts) {
    let user = &entry.user;
    out.push_str(&format!(
        "<div id=\"user-{}\" style=\"{}\">\n",
        escape_html(&user.id),
        BLOCK_STYLE
    ));
    out.push_str(&format!("<h3>{}</h3>\n", escape_html(display_name(user))));
    out.push_str(&format!("<p>Email: {}</p>\n", escape_html(&user.email)));
    out.push_str(&format!("<p>Created: {}</p>\n", format_created(&user.created_at)));

    if !entry.posts.is_empty() {
        out.push_str("<div>\n<h4>Published Posts:</h4>\n<ul>\n");
        for post in &entry.posts {
            out.push_str(&format!(
                "<li id=\"post-{}\">{}</li>\n",
                escape_html(&post.id),
                escape_html(&post.title)
            ));
        }
        out.push_str("</ul>\n</div>\n");
    }

    out.push_str("</div>\n");
}

/// The user's name, or `Unknown` when absent or blank.
pub fn display_name(user: &User) -> &str {
    match user.name.as_deref() {
        Some(name) if !name.trim().is_empty() => name,
        _ => UNKNOWN_NAME,
    }
}

/// Month/day/year without padding, e.g. `3/7/2024`.
pub fn format_created(created_at: &DateTime<Utc>) -> String {
    created_at.format("%-m/%-d/%Y").to_string()
}

/// Escape the five HTML-significant characters.
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
