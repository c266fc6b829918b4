//! Process-wide store handle
//!
//! Kept in its own test binary: `global()` reads `MARKKK_DB_PATH` once per
//! process, so no other test may touch the environment first.

use markkk_store::config::ENV_DB_PATH;
use markkk_store::{DocumentStore, StoreConfig};

#[tokio::test]
async fn test_global_is_one_handle_configured_from_env() {
    std::env::set_var(ENV_DB_PATH, ":memory:");

    let first = DocumentStore::global();
    let second = DocumentStore::global();
    assert!(std::ptr::eq(first, second));
    assert!(!first.is_open());

    let saved = first.save_document("shared", Some("g")).await.unwrap();
    assert_eq!(second.schema_version().await.unwrap(), 2);
    assert_eq!(second.get_document(&saved.id).await.unwrap(), Some(saved));
    assert!(first.is_open());

    assert_eq!(StoreConfig::from_env(), StoreConfig::in_memory());
}
