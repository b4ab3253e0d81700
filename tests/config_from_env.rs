//! Reads configuration from the real process environment.
//!
//! This binary holds a single test so nothing else touches the environment
//! while it is modified.

use clarifier::config::{
    ClarifierConfig, ENV_DATABASE_URL, ENV_DB_MAX_CONNECTIONS, ENV_DEFAULT_PAGE_SIZE,
    ENV_MAX_PAGE_SIZE,
};
use eyre::ensure;

#[test]
fn process_environment_drives_configuration() -> eyre::Result<()> {
    let settings = [
        (ENV_DEFAULT_PAGE_SIZE, "5"),
        (ENV_MAX_PAGE_SIZE, "20"),
        (ENV_DATABASE_URL, "postgres://localhost/cards"),
        (ENV_DB_MAX_CONNECTIONS, "3"),
    ];
    for (key, value) in settings {
        // SAFETY: this test binary runs one test, so no other thread reads or
        // writes the environment while env::set_var(key, value) executes.
        unsafe {
            std::env::set_var(key, value);
        }
    }

    let loaded = ClarifierConfig::from_env();

    // SAFETY: a malformed value must be rejected; still single-threaded.
    unsafe {
        std::env::set_var(ENV_MAX_PAGE_SIZE, "lots");
    }
    let malformed = ClarifierConfig::from_env();

    for (key, _) in settings {
        // SAFETY: single-threaded as above while env::remove_var(key) executes.
        unsafe {
            std::env::remove_var(key);
        }
    }
    let defaults = ClarifierConfig::from_env()?;

    let config = loaded?;
    ensure!(config.listing.default_page_size == 5);
    ensure!(config.listing.max_page_size == 20);
    let Some(database) = config.database else {
        eyre::bail!("database URL should be picked up");
    };
    ensure!(database.database_url == "postgres://localhost/cards");
    ensure!(database.max_connections == 3);

    ensure!(malformed.is_err());
    ensure!(defaults == ClarifierConfig::default());
    Ok(())
}
