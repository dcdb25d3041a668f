pub mod download;
pub mod errors;
pub mod html;
pub mod json;
pub mod xlsx;

pub use errors::ResultResp;

// Normal HTML response
pub use html::{html_response, redirect};
pub use json::json_response;
pub use xlsx::xlsx_response;
