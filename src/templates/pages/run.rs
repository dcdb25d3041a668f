use crate::db::crawl_runs::CrawlRun;
use crate::scraper::ListingRecord;
use crate::templates::components::{run_status, unknown_or};
use crate::templates::pages::home::format_ts;
use crate::templates::{card, desktop_layout};
use maud::{html, Markup};
use url::Url;

/// Scraped detail URLs only become links when they are plain http(s).
fn is_web_link(raw: &str) -> bool {
    Url::parse(raw).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

pub fn run_page(run: &CrawlRun, listings: &[ListingRecord]) -> Markup {
    desktop_layout(
        &format!("Run {}", run.id),
        html! {
            h1 { "Run " (run.id) ": " (run.region) }

            (card("Summary", html! {
                p { "Start URL: " code { (run.start_url) } }
                p { "Started: " (format_ts(run.started_at)) }
                @if let Some(done) = run.finished_at {
                    p { "Finished: " (format_ts(done)) }
                }
                p { "Status: " (run_status(run)) }
                p {
                    a href=(format!("/runs/{}/listings.xlsx", run.id)) { "Download XLSX" }
                    " · "
                    a href=(format!("/runs/{}/listings.json", run.id)) { "Download JSON" }
                }
            }))

            (card(&format!("Listings ({})", listings.len()), html! {
                div style="overflow-x: auto;" {
                    table {
                        thead {
                            tr {
                                @for field in ListingRecord::FIELDS {
                                    th { (field) }
                                }
                            }
                        }
                        tbody {
                            @for l in listings {
                                tr {
                                    td { (unknown_or(l.home_type.as_deref())) }
                                    td { (unknown_or(l.posted)) }
                                    td {
                                        @match l.home_url.as_deref() {
                                            Some(url) => {
                                                @if is_web_link(url) {
                                                    a href=(url) { "link" }
                                                } @else {
                                                    (url)
                                                }
                                            }
                                            None => { (unknown_or(None::<&str>)) }
                                        }
                                    }
                                    td { (unknown_or(l.home_status.as_deref())) }
                                    td { (unknown_or(l.home_price.as_ref())) }
                                    td { (unknown_or(l.home_address.as_deref())) }
                                    td { (unknown_or(l.home_zipcode.as_deref())) }
                                    td { (unknown_or(l.num_beds)) }
                                    td { (unknown_or(l.num_baths)) }
                                    td { (unknown_or(l.home_area)) }
                                }
                            }
                        }
                    }
                }
            }))
        },
    )
}
