use crate::db::crawl_runs::CrawlRun;
use crate::templates::{card, components::run_status, desktop_layout};
use maud::{html, Markup};

pub struct HomeVm<'a> {
    pub site_domain: &'a str,
    pub runs: &'a [CrawlRun],
}

pub fn home_page(vm: &HomeVm<'_>) -> Markup {
    desktop_layout(
        "Home",
        html! {
            h1 { "Listing Crawls" }

            (card("Start a crawl", html! {
                form action="/crawl" method="post" style="display: flex; gap: 10px; align-items: center;" {
                    span class="muted" { "https://" (vm.site_domain) "/homes/" }
                    input type="text" name="region" placeholder="new-york-ny" required
                        pattern="[a-z0-9_-]+" style="padding: 8px;";
                    button type="submit" style="padding: 8px 16px;" { "Start Crawl" }
                }
            }))

            (card("Recent runs", html! {
                @if vm.runs.is_empty() {
                    p class="muted" { "No crawls yet." }
                } @else {
                    table {
                        thead {
                            tr {
                                th { "ID" }
                                th { "Region" }
                                th { "Started" }
                                th { "Status" }
                                th { "Pages" }
                                th { "Listings" }
                            }
                        }
                        tbody {
                            @for run in vm.runs {
                                tr {
                                    td { a href=(format!("/runs/{}", run.id)) { (run.id) } }
                                    td { (run.region) }
                                    td { (format_ts(run.started_at)) }
                                    td { (run_status(run)) }
                                    td { (run.pages_fetched.unwrap_or(0)) }
                                    td { (run.listings_seen.unwrap_or(0)) }
                                }
                            }
                        }
                    }
                }
            }))
        },
    )
}

pub fn format_ts(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| ts.to_string())
}
