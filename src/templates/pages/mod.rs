pub mod home;
pub mod run;

pub use home::home_page;
pub use run::run_page;
