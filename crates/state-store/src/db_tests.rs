//! Tests for client database location resolution.
//!
//! These mutate process environment variables, so they run serially.

use serial_test::serial;

use crate::display_client_db_path;

#[test]
#[serial]
fn env_url_is_returned_verbatim() {
    unsafe {
        std::env::set_var("SB_CLIENT_DB_URL", "sqlite::memory:");
    }
    assert_eq!(display_client_db_path(), "sqlite::memory:");
    unsafe {
        std::env::remove_var("SB_CLIENT_DB_URL");
    }
}

#[test]
#[serial]
fn env_path_is_returned_verbatim() {
    unsafe {
        std::env::set_var("SB_CLIENT_DB_URL", "/tmp/custom/client.db");
    }
    assert_eq!(display_client_db_path(), "/tmp/custom/client.db");
    unsafe {
        std::env::remove_var("SB_CLIENT_DB_URL");
    }
}

#[test]
#[serial]
fn default_location_is_under_the_app_data_dir() {
    unsafe {
        std::env::remove_var("SB_CLIENT_DB_URL");
    }
    let path = std::path::PathBuf::from(display_client_db_path());
    assert!(path.ends_with("salonbooker/client.db"), "got: {}", path.display());
}
