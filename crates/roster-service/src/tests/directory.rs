use std::{
  collections::HashSet,
  sync::{Arc, atomic::Ordering},
  time::Duration,
};

use roster_core::{
  codec::decode_records,
  storage::{MemoryStore, SESSION_KEY, USERS_KEY},
  user::{NewUser, UserPatch, seed_records},
};

use super::FlakyStore;
use crate::{DirectoryError, UserDirectory};

fn directory(storage: &Arc<MemoryStore>) -> UserDirectory<MemoryStore> {
  UserDirectory::new(storage.clone(), Duration::ZERO)
}

fn stored(storage: &MemoryStore) -> Vec<roster_core::user::UserRecord> {
  decode_records(&storage.get(USERS_KEY).expect("users key")).unwrap()
}

// ─── Seeding ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn first_list_returns_seeds_and_persists_them() {
  let storage = Arc::new(MemoryStore::new());
  let users = directory(&storage).list().await.unwrap();

  assert_eq!(users, seed_records());
  assert_eq!(stored(&storage), seed_records());
}

#[tokio::test]
async fn list_includes_created_records_in_insertion_order() {
  let storage = Arc::new(MemoryStore::new());
  let dir = directory(&storage);
  dir.list().await.unwrap();

  let ann = dir.create(NewUser::new("Ann", "ann@x.com")).await.unwrap();
  let bob = dir.create(NewUser::new("Bob", "bob@x.com")).await.unwrap();

  let ids: Vec<String> = dir.list().await.unwrap().into_iter().map(|r| r.id).collect();
  assert_eq!(ids, ["1", "2", "3", ann.id.as_str(), bob.id.as_str()]);
}

#[tokio::test]
async fn malformed_collection_is_reseeded() {
  let storage = Arc::new(MemoryStore::with_entries([(USERS_KEY, "[{\"id\":")]));
  let users = directory(&storage).list().await.unwrap();

  assert_eq!(users, seed_records());
  assert_eq!(stored(&storage), seed_records());
}

#[tokio::test]
async fn collection_with_repeated_ids_is_reseeded() {
  let mut dup = seed_records();
  dup.push(dup[1].clone());
  let raw = serde_json::to_string(&dup).unwrap();
  let storage = Arc::new(MemoryStore::with_entries([(USERS_KEY, raw)]));

  assert_eq!(directory(&storage).list().await.unwrap(), seed_records());
}

#[tokio::test]
async fn empty_collection_is_not_reseeded() {
  let storage = Arc::new(MemoryStore::with_entries([(USERS_KEY, "[]")]));
  assert!(directory(&storage).list().await.unwrap().is_empty());
}

#[tokio::test]
async fn directory_never_touches_the_session_key() {
  let storage = Arc::new(MemoryStore::new());
  let dir = directory(&storage);
  dir.create(NewUser::new("Ann", "ann@x.com")).await.unwrap();
  assert!(!storage.contains_key(SESSION_KEY));
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_appends_with_equal_timestamps() {
  let storage = Arc::new(MemoryStore::new());
  let dir = directory(&storage);

  let created = dir.create(NewUser::new("Ann", "ann@x.com")).await.unwrap();
  let users = dir.list().await.unwrap();
  let last = users.last().unwrap();

  assert_eq!(last, &created);
  assert_eq!(last.name, "Ann");
  assert_eq!(last.email, "ann@x.com");
  assert_eq!(last.created_at, last.updated_at);
}

#[tokio::test]
async fn created_ids_are_all_distinct() {
  let dir = directory(&Arc::new(MemoryStore::new()));
  let mut ids = HashSet::new();
  for i in 0..50 {
    let record = dir
      .create(NewUser::new(format!("User {i}"), format!("u{i}@x.com")))
      .await
      .unwrap();
    assert!(ids.insert(record.id), "duplicate id on create #{i}");
  }
  assert!(ids.iter().all(|id| !["1", "2", "3"].contains(&id.as_str())));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_are_all_kept() {
  let dir = Arc::new(directory(&Arc::new(MemoryStore::new())));

  let tasks: Vec<_> = (0..20)
    .map(|i| {
      let dir = dir.clone();
      tokio::spawn(async move {
        dir
          .create(NewUser::new(format!("User {i}"), format!("u{i}@x.com")))
          .await
      })
    })
    .collect();

  for task in tasks {
    task.await.unwrap().unwrap();
  }

  assert_eq!(dir.list().await.unwrap().len(), 3 + 20);
}

#[tokio::test(start_paused = true)]
async fn create_waits_for_latency_before_committing() {
  let storage = Arc::new(MemoryStore::new());
  let dir = Arc::new(UserDirectory::new(storage.clone(), Duration::from_millis(500)));

  let pending = tokio::spawn({
    let dir = dir.clone();
    async move { dir.create(NewUser::new("Ann", "ann@x.com")).await }
  });

  tokio::time::sleep(Duration::from_millis(100)).await;
  assert!(!storage.contains_key(USERS_KEY));

  pending.await.unwrap().unwrap();
  assert_eq!(stored(&storage).len(), 4);
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_changes_only_supplied_fields() {
  let dir = directory(&Arc::new(MemoryStore::new()));
  let ann = dir.create(NewUser::new("Ann", "ann@x.com")).await.unwrap();

  let updated = dir.update(&ann.id, UserPatch::name("Annie")).await.unwrap();

  assert_eq!(updated.name, "Annie");
  assert_eq!(updated.id, ann.id);
  assert_eq!(updated.email, ann.email);
  assert_eq!(updated.created_at, ann.created_at);
  assert!(updated.updated_at > ann.updated_at);

  let listed = dir.get(&ann.id).await.unwrap().unwrap();
  assert_eq!(listed, updated);
}

#[tokio::test]
async fn update_seed_record_email() {
  let dir = directory(&Arc::new(MemoryStore::new()));
  let updated = dir
    .update("2", UserPatch::email("jane.smith@example.com"))
    .await
    .unwrap();

  assert_eq!(updated.name, "Jane Smith");
  assert_eq!(updated.email, "jane.smith@example.com");
  assert_eq!(updated.created_at, seed_records()[1].created_at);
}

#[tokio::test]
async fn update_keeps_position() {
  let dir = directory(&Arc::new(MemoryStore::new()));
  dir.update("1", UserPatch::name("Johnny")).await.unwrap();

  let names: Vec<String> = dir.list().await.unwrap().into_iter().map(|r| r.name).collect();
  assert_eq!(names, ["Johnny", "Jane Smith", "Bob Johnson"]);
}

#[tokio::test]
async fn update_missing_id_is_not_found_and_changes_nothing() {
  let storage = Arc::new(MemoryStore::new());
  let dir = directory(&storage);
  let before = dir.list().await.unwrap();

  let err = dir.update("nope", UserPatch::name("X")).await.unwrap_err();
  assert!(matches!(err, DirectoryError::UserNotFound(ref id) if id == "nope"));
  assert_eq!(dir.list().await.unwrap(), before);
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_exactly_one() {
  let dir = directory(&Arc::new(MemoryStore::new()));
  let ann = dir.create(NewUser::new("Ann", "ann@x.com")).await.unwrap();
  let before = dir.list().await.unwrap();

  dir.delete(&ann.id).await.unwrap();

  let after = dir.list().await.unwrap();
  assert_eq!(after.len(), before.len() - 1);
  assert!(after.iter().all(|r| r.id != ann.id));
  assert!(dir.get(&ann.id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_missing_id_is_not_found_and_changes_nothing() {
  let dir = directory(&Arc::new(MemoryStore::new()));
  let before = dir.list().await.unwrap();

  let err = dir.delete("nope").await.unwrap_err();
  assert!(matches!(err, DirectoryError::UserNotFound(_)));
  assert_eq!(dir.list().await.unwrap(), before);
}

#[tokio::test]
async fn delete_twice_fails_the_second_time() {
  let dir = directory(&Arc::new(MemoryStore::new()));
  dir.delete("3").await.unwrap();
  assert!(matches!(
    dir.delete("3").await,
    Err(DirectoryError::UserNotFound(_))
  ));
}

// ─── Storage faults ──────────────────────────────────────────────────────────

#[tokio::test]
async fn read_fault_surfaces_as_storage_error() {
  let storage = Arc::new(FlakyStore::default());
  storage.fail_reads.store(true, Ordering::SeqCst);
  let dir = UserDirectory::new(storage, Duration::ZERO);

  assert!(matches!(dir.list().await, Err(DirectoryError::Storage(_))));
}

#[tokio::test]
async fn write_fault_leaves_collection_unchanged() {
  let raw = serde_json::to_string(&seed_records()).unwrap();
  let storage = Arc::new(FlakyStore::with_entries([(USERS_KEY, raw)]));
  let dir = UserDirectory::new(storage.clone(), Duration::ZERO);

  storage.fail_writes.store(true, Ordering::SeqCst);
  let err = dir.create(NewUser::new("Ann", "ann@x.com")).await.unwrap_err();
  assert!(matches!(err, DirectoryError::Storage(_)));

  storage.fail_writes.store(false, Ordering::SeqCst);
  assert_eq!(dir.list().await.unwrap(), seed_records());
}
