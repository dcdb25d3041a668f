use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · home_scrape" }
                style { (maud::PreEscaped(BASE_CSS)) }
            }
            body {
              header class="topbar" {
                  svg
                      xmlns="http://www.w3.org/2000/svg"
                      width="24"
                      height="24"
                      viewBox="0 0 24 24"
                      fill="none"
                      stroke="#524ed2"
                      stroke-width="2"
                      stroke-linecap="round"
                      stroke-linejoin="round"
                  {
                      path stroke="none" d="M0 0h24v24H0z" fill="none" {}
                      path d="M5 12l-2 0l9 -9l9 9l-2 0" {}
                      path d="M5 12v7a2 2 0 0 0 2 2h10a2 2 0 0 0 2 -2v-7" {}
                      path d="M9 21v-6a2 2 0 0 1 2 -2h2a2 2 0 0 1 2 2v6" {}
                  }
                  h3 { "Listing Crawls" }
                  nav {
                      a href="/" { "Home" }
                  }
              }
              main class="container" {
                (content)
              }
            }
        }
    }
}

const BASE_CSS: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #1f2937; }
.topbar { display: flex; align-items: center; gap: 12px; padding: 12px 24px; box-shadow: 0 1px 3px #0002; }
.container { max-width: 1100px; margin: 2rem auto; padding: 0 1rem; }
.card { border: 1px solid #e5e7eb; border-radius: 8px; padding: 1rem 1.25rem; margin-bottom: 2rem; }
table { width: 100%; border-collapse: collapse; font-size: 0.9em; }
th { padding: 8px; text-align: left; border-bottom: 2px solid #e5e7eb; }
td { padding: 8px; border-bottom: 1px solid #f3f4f6; }
.ok { color: green; } .bad { color: #dc2626; } .running { color: blue; }
.muted { color: #6b7280; font-size: 0.85em; }
"#;
