pub mod connection;
pub mod crawl_runs;
pub mod listings;

pub use connection::{init_db, Database};
