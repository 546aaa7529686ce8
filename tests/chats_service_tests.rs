//! Chat service tests

mod common;

use common::{sample_scenario, sample_stakeholder, sample_user, setup_test_db};
use scenario_store::core::error::ServiceError;
use scenario_store::core::services::ChatsService;
use scenario_store::infrastructure::entities::{ChatHistory, ChatMessage, Stakeholder};
use scenario_store::infrastructure::repositories::{Filter, Repository};
use sqlx::SqlitePool;

fn chats_service(pool: &SqlitePool) -> ChatsService {
    let histories = Repository::<ChatHistory>::new(pool.clone());
    ChatsService::new(histories.clone(), histories.sibling())
}

async fn stakeholder(pool: &SqlitePool) -> Stakeholder {
    let user = sample_user(pool).await;
    let scenario = sample_scenario(pool, &user).await;
    sample_stakeholder(pool, &scenario).await
}

#[tokio::test]
async fn test_history_is_created_on_demand() {
    let pool = setup_test_db().await;
    let stakeholder = stakeholder(&pool).await;
    let service = chats_service(&pool);

    assert!(
        service
            .get_history_for_stakeholder(stakeholder.id, false)
            .await
            .unwrap()
            .is_none()
    );

    let created = service
        .get_history_for_stakeholder(stakeholder.id, true)
        .await
        .unwrap()
        .unwrap();
    let found = service
        .get_history_for_stakeholder(stakeholder.id, true)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(created.id, found.id);
    assert_eq!(created.stakeholder_id, stakeholder.id);
}

#[tokio::test]
async fn test_messages_come_back_in_send_order() {
    let pool = setup_test_db().await;
    let stakeholder = stakeholder(&pool).await;
    let service = chats_service(&pool);
    let history = service
        .get_history_for_stakeholder(stakeholder.id, true)
        .await
        .unwrap()
        .unwrap();

    service.append_message(history.id, "User", "Hi").await.unwrap();
    service.append_message(history.id, "Stakeholder", "Hello").await.unwrap();
    let last = service.append_message(history.id, "User", "Bye").await.unwrap();

    let texts: Vec<String> = service
        .list_messages(history.id)
        .await
        .unwrap()
        .into_iter()
        .map(|message| message.message)
        .collect();
    assert_eq!(texts, vec!["Hi", "Hello", "Bye"]);
    assert_eq!(service.get_last_message(history.id).await.unwrap(), Some(last));
}

#[tokio::test]
async fn test_append_to_missing_history_fails() {
    let pool = setup_test_db().await;
    let service = chats_service(&pool);

    let error = service.append_message(42, "User", "Hi").await.unwrap_err();

    assert!(matches!(error, ServiceError::NotFound { id: 42, .. }));
    assert!(error.to_string().contains("not found"));
}

#[tokio::test]
async fn test_clear_history_soft_deletes_messages() {
    let pool = setup_test_db().await;
    let stakeholder = stakeholder(&pool).await;
    let service = chats_service(&pool);
    let history = service
        .get_history_for_stakeholder(stakeholder.id, true)
        .await
        .unwrap()
        .unwrap();
    service.append_message(history.id, "User", "One").await.unwrap();
    service.append_message(history.id, "User", "Two").await.unwrap();

    assert_eq!(service.clear_history(history.id).await.unwrap(), 2);

    assert!(service.list_messages(history.id).await.unwrap().is_empty());
    assert!(service.get_last_message(history.id).await.unwrap().is_none());
    let rows = Repository::<ChatMessage>::new(pool)
        .deleted(Filter::new())
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn test_delete_history_cascades_to_messages() {
    let pool = setup_test_db().await;
    let stakeholder = stakeholder(&pool).await;
    let service = chats_service(&pool);
    let history = service
        .get_history_for_stakeholder(stakeholder.id, true)
        .await
        .unwrap()
        .unwrap();
    let message = service.append_message(history.id, "User", "Hi").await.unwrap();

    let deleted = service.delete_history(history.id).await.unwrap().unwrap();
    assert!(deleted.deleted_at.is_some());
    assert!(service.delete_history(history.id).await.unwrap().is_none());
    assert!(
        service
            .get_history_for_stakeholder(stakeholder.id, false)
            .await
            .unwrap()
            .is_none()
    );

    // the history comes back alone; messages are restored one by one
    service.restore_history(history.id).await.unwrap().unwrap();
    assert!(service.list_messages(history.id).await.unwrap().is_empty());
    service.restore_message(message.id).await.unwrap().unwrap();
    assert_eq!(service.list_messages(history.id).await.unwrap(), vec![
        ChatMessage {
            deleted_at: None,
            ..message
        }
    ]);
}
