use super::*;
use rf_core::RelationName;
use tempfile::TempDir;

#[tokio::test]
async fn test_stage_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let store = LocalStore::new(dir.path().join("work"));
    let loc = StorageLocation::Stage(4);

    store
        .write_lines(&loc, &["Person\t{\"Person.id\":1}".to_string()])
        .await
        .unwrap();

    assert!(dir.path().join("work").join("tmp4.tmp").exists());
    assert_eq!(
        store.read_lines(&loc).await.unwrap(),
        vec!["Person\t{\"Person.id\":1}"]
    );
}

#[tokio::test]
async fn test_reads_dataset_skipping_blank_lines() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("Person.json"),
        "{\"id\": 1}\n\n{\"id\": 2}\n",
    )
    .unwrap();

    let store = LocalStore::new(dir.path());
    let loc = StorageLocation::Dataset(RelationName::try_new("Person").unwrap());
    assert_eq!(store.read_lines(&loc).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let store = LocalStore::new(dir.path());
    let err = store
        .read_lines(&StorageLocation::Stage(1))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    assert!(!store.exists(&StorageLocation::Stage(1)).await.unwrap());
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = LocalStore::new(dir.path());
    let loc = StorageLocation::Stage(2);
    store.write_lines(&loc, &[]).await.unwrap();
    assert!(store.exists(&loc).await.unwrap());
    store.remove(&loc).await.unwrap();
    store.remove(&loc).await.unwrap();
    assert!(!store.exists(&loc).await.unwrap());
}
