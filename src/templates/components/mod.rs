use maud::{html, Markup};

pub mod error;
pub mod run_status;

pub use error::html_error_response;
pub use run_status::run_status;

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

/// Renders an optional cell, a dash for unknown.
pub fn unknown_or<T: std::fmt::Display>(value: Option<T>) -> Markup {
    html! {
        @match value {
            Some(v) => { (v.to_string()) }
            None => { span class="muted" { "-" } }
        }
    }
}
