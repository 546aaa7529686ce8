//! Database reset tests

mod common;

use common::{sample_class, sample_scenario, sample_stakeholder, sample_user, setup_test_db};
use scenario_store::core::services::debug::WIPE_ORDER;
use scenario_store::core::services::{
    ChatsService, ClassesService, DebugService, FeedbackService, ScenariosService,
};
use scenario_store::infrastructure::entities::{
    Category, ChatHistory, Class, FeedbackReference, NewCategory, NewRequirement, NewSeniorDevTemplate,
    Requirement, Scenario, SeniorDevTemplate, User,
};
use scenario_store::infrastructure::repositories::{Filter, Repository};
use sqlx::SqlitePool;

/// One row in every table, with every foreign key pointing at something.
async fn populate(pool: &SqlitePool) {
    let user = sample_user(pool).await;
    let class = sample_class(pool).await;
    let classes_repo = Repository::<Class>::new(pool.clone());
    let classes = ClassesService::new(
        classes_repo.clone(),
        Some(classes_repo.sibling()),
        Some(classes_repo.sibling()),
    );
    classes.add_student(class.id, user.id).await.unwrap();
    classes.add_teacher(class.id, user.id).await.unwrap();

    let scenario = sample_scenario(pool, &user).await;
    let category = Repository::<Category>::new(pool.clone())
        .create(NewCategory {
            name: "Web".to_owned(),
        })
        .await
        .unwrap();
    let scenarios_repo = Repository::<Scenario>::new(pool.clone());
    let scenarios = ScenariosService::new(
        scenarios_repo.clone(),
        scenarios_repo.sibling(),
        scenarios_repo.sibling(),
        scenarios_repo.sibling(),
        scenarios_repo.sibling(),
        scenarios_repo.sibling(),
    );
    scenarios.set_categories(scenario.id, &[category.id]).await.unwrap();
    Repository::<SeniorDevTemplate>::new(pool.clone())
        .create(NewSeniorDevTemplate {
            name: "Sam".to_owned(),
            role: "Lead".to_owned(),
            desc: None,
            prompt: "P".to_owned(),
        })
        .await
        .unwrap();
    let requirement = Repository::<Requirement>::new(pool.clone())
        .create(NewRequirement {
            scenario_id: scenario.id,
            kind: "functional".to_owned(),
            requirement: "R".to_owned(),
        })
        .await
        .unwrap();

    let stakeholder = sample_stakeholder(pool, &scenario).await;
    let histories = Repository::<ChatHistory>::new(pool.clone());
    let chats = ChatsService::new(histories.clone(), histories.sibling());
    let history = chats
        .get_history_for_stakeholder(stakeholder.id, true)
        .await
        .unwrap()
        .unwrap();
    let message = chats.append_message(history.id, "User", "Hi").await.unwrap();

    let feedback_repo = Repository::<FeedbackReference>::new(pool.clone());
    let feedback = FeedbackService::new(
        feedback_repo.clone(),
        Some(feedback_repo.sibling()),
        Some(feedback_repo.sibling()),
        Some(feedback_repo.sibling()),
    );
    feedback
        .add_feedback_to_requirement(requirement.id, "ok", None)
        .await
        .unwrap();
    feedback
        .add_feedback_to_message(message.id, "ok", None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_database_state_reports_every_table() {
    let pool = setup_test_db().await;
    populate(&pool).await;
    Repository::<User>::new(pool.clone())
        .delete(1)
        .await
        .unwrap();
    let service = DebugService::new(pool);

    let state = service.database_state().await.unwrap();

    let mut tables = WIPE_ORDER.to_vec();
    tables.sort();
    assert_eq!(state.keys().copied().collect::<Vec<_>>(), tables);
    // the soft-deleted user is still counted
    assert_eq!(state["users"], 1);
    assert_eq!(state["feedback_reference"], 2);
    assert!(state.values().all(|count| *count >= 1));
}

#[tokio::test]
async fn test_clear_database_removes_everything() {
    let pool = setup_test_db().await;
    populate(&pool).await;
    let service = DebugService::new(pool.clone());

    let removed = service.clear_database().await.unwrap();

    assert_eq!(removed["feedback_reference"], 2);
    assert_eq!(removed["users"], 1);
    let state = service.database_state().await.unwrap();
    assert!(state.values().all(|count| *count == 0));
    assert!(
        Repository::<User>::new(pool)
            .all(Filter::new())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_clear_empty_database() {
    let pool = setup_test_db().await;
    let service = DebugService::new(pool);

    let removed = service.clear_database().await.unwrap();

    assert_eq!(removed.len(), WIPE_ORDER.len());
    assert!(removed.values().all(|count| *count == 0));
}

#[tokio::test]
async fn test_database_usable_after_clear() {
    let pool = setup_test_db().await;
    populate(&pool).await;
    DebugService::new(pool.clone()).clear_database().await.unwrap();

    populate(&pool).await;

    let state = DebugService::new(pool).database_state().await.unwrap();
    assert_eq!(state["scenarios"], 1);
}

#[test]
fn test_wipe_order_lists_each_table_once() {
    let mut tables = WIPE_ORDER.to_vec();
    tables.sort();
    tables.dedup();
    assert_eq!(tables.len(), 13);
    assert_eq!(WIPE_ORDER.first(), Some(&"feedback_reference"));
    assert_eq!(WIPE_ORDER.last(), Some(&"users"));
}
