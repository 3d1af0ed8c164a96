//! CLI command tests
//!
//! End-to-end runs of the command layer against a JSON-file datastore in a
//! temporary directory.

use tempfile::TempDir;

use tabvault_core::{Config, Datastore, Filter, JsonFileStore};

use crate::commands;

fn test_config(dir: &TempDir) -> Config {
    Config {
        data_dir: dir.path().join("store"),
        dir: dir.path().join("backups"),
        ..Config::default()
    }
}

#[tokio::test]
async fn test_insert_query_and_tables() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    commands::cmd_insert(&config, "user", r#"{"id": 1, "name": "alice"}"#)
        .await
        .unwrap();
    commands::cmd_insert(&config, "user", r#"{"id": 2, "name": "bob"}"#)
        .await
        .unwrap();

    commands::cmd_tables(&config).await.unwrap();
    commands::cmd_query(&config, "user", Some(r#"{"id": 2}"#))
        .await
        .unwrap();

    let store = JsonFileStore::new(&config.data_dir).unwrap();
    assert_eq!(store.stats().await.unwrap()["user"], 2);
}

#[tokio::test]
async fn test_insert_rejects_non_object() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    let result = commands::cmd_insert(&config, "user", "[1, 2, 3]").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_update_and_remove() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    commands::cmd_insert(&config, "user", r#"{"id": 1, "name": "alice"}"#)
        .await
        .unwrap();
    commands::cmd_update(&config, "user", r#"{"id": 1}"#, r#"{"name": "alicia"}"#)
        .await
        .unwrap();

    let store = JsonFileStore::new(&config.data_dir).unwrap();
    let rows = store.get("user", &Filter::new()).await.unwrap();
    assert_eq!(rows[0]["name"].as_str(), Some("alicia"));

    commands::cmd_remove(&config, "user", Some(r#"{"id": 1}"#))
        .await
        .unwrap();
    assert!(store.get("user", &Filter::new()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_drop_requires_target() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    assert!(commands::cmd_drop(&config, None, false).await.is_err());
    assert!(commands::cmd_drop(&config, Some("user"), true).await.is_err());
}

#[tokio::test]
async fn test_backup_restore_cycle() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    commands::cmd_insert(&config, "user", r#"{"id": 1, "name": "alice"}"#)
        .await
        .unwrap();
    commands::cmd_insert(&config, "channel", r#"{"id": 7, "name": "general"}"#)
        .await
        .unwrap();

    commands::cmd_backup(&config, &[]).await.unwrap();
    commands::cmd_list(&config).await.unwrap();

    commands::cmd_drop(&config, None, true).await.unwrap();
    commands::cmd_restore(&config, 1, &[]).await.unwrap();

    let store = JsonFileStore::new(&config.data_dir).unwrap();
    let stats = store.stats().await.unwrap();
    assert_eq!(stats["user"], 1);
    assert_eq!(stats["channel"], 1);
}

#[tokio::test]
async fn test_backup_carries_on_past_missing_special_table() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        tables: vec!["ghost".to_string()],
        ..test_config(&dir)
    };

    commands::cmd_insert(&config, "user", r#"{"id": 1, "name": "alice"}"#)
        .await
        .unwrap();
    commands::cmd_backup(&config, &[]).await.unwrap();

    // the run logged the failed special table and still wrote user's file
    let names: Vec<String> = std::fs::read_dir(dir.path().join("backups"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 1);
    assert!(names[0].ends_with("_user.json"));
}

#[tokio::test]
async fn test_restore_invalid_index_fails() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    commands::cmd_insert(&config, "user", r#"{"id": 1}"#).await.unwrap();
    commands::cmd_backup(&config, &[]).await.unwrap();

    assert!(commands::cmd_restore(&config, 0, &[]).await.is_err());
    assert!(commands::cmd_restore(&config, 9, &[]).await.is_err());
}

#[tokio::test]
async fn test_prune_with_retention_disabled() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    // keep_backups defaults to 0; prune is a no-op, not an error
    commands::cmd_prune(&config, None).await.unwrap();
    commands::cmd_prune(&config, Some(0)).await.unwrap();
}
