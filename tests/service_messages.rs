#![allow(clippy::unwrap_used, clippy::panic, clippy::missing_panics_doc, missing_debug_implementations, unreachable_pub)]

use bulletin_server::error::AppError;

mod common;

#[tokio::test]
async fn create_accepts_content_up_to_280_bytes() {
    let store = common::InMemoryMessageStore::new();
    let service = common::message_service(store);

    let short = service.create_message("hello").await.unwrap();
    let exact = service.create_message(&"x".repeat(280)).await.unwrap();

    assert_eq!(short.content, "hello");
    assert_eq!(exact.content.len(), 280);
}

#[tokio::test]
async fn create_assigns_unique_ascending_ids() {
    let store = common::InMemoryMessageStore::new();
    let service = common::message_service(store);

    let first = service.create_message("one").await.unwrap();
    let second = service.create_message("two").await.unwrap();
    let third = service.create_message("three").await.unwrap();

    assert!(first.id < second.id);
    assert!(second.id < third.id);
}

#[tokio::test]
async fn create_rejects_empty_content_without_persisting() {
    let store = common::InMemoryMessageStore::new();
    let service = common::message_service(std::sync::Arc::clone(&store));

    let err = service.create_message("").await.unwrap_err();

    assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("empty")));
    assert_eq!(store.row_count(), 0);
}

#[tokio::test]
async fn create_rejects_content_over_280_bytes_without_persisting() {
    let store = common::InMemoryMessageStore::new();
    let service = common::message_service(std::sync::Arc::clone(&store));

    let err = service.create_message(&"x".repeat(281)).await.unwrap_err();

    assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("280")));
    assert_eq!(store.row_count(), 0);
}

#[tokio::test]
async fn content_length_is_counted_in_bytes() {
    let store = common::InMemoryMessageStore::new();
    let service = common::message_service(store);

    // 140 two-byte characters: 280 bytes, fine.
    assert!(service.create_message(&"é".repeat(140)).await.is_ok());
    // 141 two-byte characters: 282 bytes, rejected.
    assert!(matches!(service.create_message(&"é".repeat(141)).await, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn created_message_round_trips_through_get() {
    let store = common::InMemoryMessageStore::new();
    let service = common::message_service(store);

    let created = service.create_message("round trip").await.unwrap();
    let fetched = service.get_message_by_id(created.id).await.unwrap();

    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.content, "round trip");
    assert_eq!(fetched.created_at, created.created_at);
}

#[tokio::test]
async fn get_all_orders_by_id_descending_and_respects_limit() {
    let store = common::InMemoryMessageStore::new();
    let service = common::message_service(store);

    for i in 0..10 {
        service.create_message(&format!("message {i}")).await.unwrap();
    }

    let messages = service.get_all_messages(Some(4)).await.unwrap();

    assert_eq!(messages.len(), 4);
    assert!(messages.windows(2).all(|pair| pair[0].id > pair[1].id));
}

#[tokio::test]
async fn get_all_defaults_to_100_for_missing_or_non_positive_limits() {
    let store = common::InMemoryMessageStore::new();
    let service = common::message_service(store);

    for i in 0..120 {
        service.create_message(&format!("message {i}")).await.unwrap();
    }

    assert_eq!(service.get_all_messages(None).await.unwrap().len(), 100);
    assert_eq!(service.get_all_messages(Some(0)).await.unwrap().len(), 100);
    assert_eq!(service.get_all_messages(Some(-5)).await.unwrap().len(), 100);
}

#[tokio::test]
async fn update_replaces_content_and_preserves_created_at() {
    let store = common::InMemoryMessageStore::new();
    let service = common::message_service(std::sync::Arc::clone(&store));

    let created = service.create_message("hello").await.unwrap();
    let before = store.get_raw(created.id).unwrap();

    let updated = service.update_message(created.id, "world").await.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.content, "world");
    assert_eq!(updated.created_at, created.created_at);

    let after = store.get_raw(created.id).unwrap();
    assert!(after.updated_at >= before.updated_at);
    assert_eq!(after.content, "world");
}

#[tokio::test]
async fn update_validates_before_touching_storage() {
    let store = common::InMemoryMessageStore::new();
    let service = common::message_service(std::sync::Arc::clone(&store));

    let created = service.create_message("hello").await.unwrap();

    let err = service.update_message(created.id, "").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // The stored row is untouched.
    assert_eq!(store.get_raw(created.id).unwrap().content, "hello");
}

#[tokio::test]
async fn update_of_missing_message_is_not_found() {
    let store = common::InMemoryMessageStore::new();
    let service = common::message_service(store);

    let err = service.update_message(42, "anything").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn deleted_message_disappears_from_reads_but_not_storage() {
    let store = common::InMemoryMessageStore::new();
    let service = common::message_service(std::sync::Arc::clone(&store));

    let created = service.create_message("doomed").await.unwrap();
    let survivor = service.create_message("survivor").await.unwrap();

    service.delete_message(created.id).await.unwrap();

    assert!(matches!(service.get_message_by_id(created.id).await, Err(AppError::NotFound)));

    let remaining = service.get_all_messages(None).await.unwrap();
    assert!(remaining.iter().all(|m| m.id != created.id));
    assert!(remaining.iter().any(|m| m.id == survivor.id));

    // Soft delete: the row is still physically present.
    assert_eq!(store.row_count(), 2);
    assert!(store.get_raw(created.id).unwrap().deleted_at.is_some());
}

#[tokio::test]
async fn delete_of_absent_id_is_a_no_op_success() {
    let store = common::InMemoryMessageStore::new();
    let service = common::message_service(store);

    assert!(service.delete_message(999).await.is_ok());
}

#[tokio::test]
async fn storage_failures_propagate_as_database_errors() {
    let store = common::InMemoryMessageStore::new();
    let service = common::message_service(std::sync::Arc::clone(&store));

    store.fail_all(true);

    assert!(matches!(service.create_message("hello").await, Err(AppError::Database(_))));
    assert!(matches!(service.get_all_messages(None).await, Err(AppError::Database(_))));
    assert!(matches!(service.delete_message(1).await, Err(AppError::Database(_))));
}
