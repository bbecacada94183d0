use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "GERD Center";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DB_FILE_NAME: &str = "gerd_center.db";

/// Get the application data directory
/// ~/GERDCenter/ on all platforms (user-visible, single clinic workstation)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("GERDCenter")
}

/// Default location of the clinic database file
pub fn default_db_path() -> PathBuf {
    app_data_dir().join(DB_FILE_NAME)
}

/// Default tracing filter when RUST_LOG is not set
pub fn default_log_filter() -> String {
    format!("info,{}=debug", env!("CARGO_CRATE_NAME"))
}
