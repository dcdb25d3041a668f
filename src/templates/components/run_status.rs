use crate::db::crawl_runs::CrawlRun;
use maud::{html, Markup};

pub fn run_status(run: &CrawlRun) -> Markup {
    html! {
        @if run.is_running() {
            span class="running" { "Running..." }
        } @else if run.success {
            span class="ok" { "Done" }
        } @else {
            span class="bad" { "Failed" }
            @if let Some(err) = &run.error_message {
                br; span class="muted" { (err) }
            }
            @if let (Some(url), Some(page)) = (&run.failed_url, run.failed_page) {
                br; span class="muted" { "at page " (page) ": " (url) }
            }
        }
    }
}
