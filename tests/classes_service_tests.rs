//! Class membership tests
//!
//! Enrolment and teaching links are idempotent and survive a remove/add cycle.

mod common;

use common::{make_user_data, sample_class, sample_user, setup_test_db};
use scenario_store::core::error::ServiceError;
use scenario_store::core::services::{ClassesService, UsersService};
use scenario_store::infrastructure::entities::{Class, ClassPatch, ClassTeacher, StudentOfClass, User};
use scenario_store::infrastructure::repositories::{Filter, Repository};
use sqlx::SqlitePool;

fn classes_service(pool: &SqlitePool) -> ClassesService {
    let classes = Repository::<Class>::new(pool.clone());
    ClassesService::new(
        classes.clone(),
        Some(classes.sibling()),
        Some(classes.sibling()),
    )
}

#[tokio::test]
async fn test_add_student_twice_returns_same_link() {
    let pool = setup_test_db().await;
    let user = sample_user(&pool).await;
    let class = sample_class(&pool).await;
    let service = classes_service(&pool);

    let first = service.add_student(class.id, user.id).await.unwrap();
    let second = service.add_student(class.id, user.id).await.unwrap();

    assert_eq!(first.id, second.id);
    let links = Repository::<StudentOfClass>::new(pool)
        .all(Filter::new())
        .await
        .unwrap();
    assert_eq!(links.len(), 1);
}

#[tokio::test]
async fn test_readding_student_restores_deleted_link() {
    let pool = setup_test_db().await;
    let user = sample_user(&pool).await;
    let class = sample_class(&pool).await;
    let service = classes_service(&pool);

    let original = service.add_student(class.id, user.id).await.unwrap();
    let removed = service.remove_student(class.id, user.id).await.unwrap();
    assert!(removed.unwrap().deleted_at.is_some());
    assert!(service.list_students(class.id).await.unwrap().is_empty());

    let restored = service.add_student(class.id, user.id).await.unwrap();

    assert_eq!(restored.id, original.id);
    assert_eq!(restored.created_at, original.created_at);
    assert!(restored.deleted_at.is_none());
    let links = Repository::<StudentOfClass>::new(pool)
        .all(Filter::new())
        .await
        .unwrap();
    assert_eq!(links.len(), 1);
}

#[tokio::test]
async fn test_remove_student_without_link_returns_none() {
    let pool = setup_test_db().await;
    let user = sample_user(&pool).await;
    let class = sample_class(&pool).await;
    let service = classes_service(&pool);

    assert!(service.remove_student(class.id, user.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_students_only_of_that_class() {
    let pool = setup_test_db().await;
    let alice = sample_user(&pool).await;
    let bob = Repository::<User>::new(pool.clone())
        .create(make_user_data("bob"))
        .await
        .unwrap();
    let class = sample_class(&pool).await;
    let other = sample_class(&pool).await;
    let service = classes_service(&pool);

    service.add_student(class.id, alice.id).await.unwrap();
    service.add_student(class.id, bob.id).await.unwrap();
    service.add_student(other.id, bob.id).await.unwrap();

    let members: Vec<i64> = service
        .list_students(class.id)
        .await
        .unwrap()
        .iter()
        .map(|link| link.user_id)
        .collect();
    assert_eq!(members, vec![alice.id, bob.id]);
}

#[tokio::test]
async fn test_teacher_links_are_idempotent() {
    let pool = setup_test_db().await;
    let teacher = sample_user(&pool).await;
    let class = sample_class(&pool).await;
    let service = classes_service(&pool);

    let first = service.add_teacher(class.id, teacher.id).await.unwrap();
    service.remove_teacher(class.id, teacher.id).await.unwrap();
    let again = service.add_teacher(class.id, teacher.id).await.unwrap();
    let once_more = service.add_teacher(class.id, teacher.id).await.unwrap();

    assert_eq!(first.id, again.id);
    assert_eq!(again.id, once_more.id);
    let teachers = service.list_teachers(class.id).await.unwrap();
    assert_eq!(teachers.len(), 1);
    assert_eq!(teachers[0].teacher_id, teacher.id);
    let rows = Repository::<ClassTeacher>::new(pool)
        .all(Filter::new())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_missing_link_repository_is_reported() {
    let pool = setup_test_db().await;
    let user = sample_user(&pool).await;
    let class = sample_class(&pool).await;
    let service = ClassesService::new(Repository::<Class>::new(pool), None, None);

    let result = service.add_student(class.id, user.id).await;
    assert!(matches!(
        result,
        Err(ServiceError::MissingRepository("students_of_class"))
    ));

    let result = service.list_teachers(class.id).await;
    assert!(matches!(
        result,
        Err(ServiceError::MissingRepository("class_teacher"))
    ));
}

#[tokio::test]
async fn test_class_crud() {
    let pool = setup_test_db().await;
    let class = sample_class(&pool).await;
    let service = classes_service(&pool);

    let renamed = service
        .update_class(
            class.id,
            ClassPatch {
                name: Some("Renamed".to_owned()),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.name, "Renamed");

    service.delete_class(class.id).await.unwrap();
    assert!(service.get_class(class.id).await.unwrap().is_none());
    assert!(service.list_classes(Filter::new()).await.unwrap().is_empty());

    service.restore_class(class.id).await.unwrap();
    assert_eq!(service.get_class(class.id).await.unwrap().unwrap().name, "Renamed");
}

#[tokio::test]
async fn test_user_class_lookups() {
    let pool = setup_test_db().await;
    let user = sample_user(&pool).await;
    let class = sample_class(&pool).await;
    let classes = classes_service(&pool);
    let users = Repository::<User>::new(pool.clone());
    let users_service = UsersService::new(
        users.clone(),
        Some(users.sibling()),
        Some(users.sibling()),
    );

    classes.add_student(class.id, user.id).await.unwrap();
    classes.add_teacher(class.id, user.id).await.unwrap();

    let enrolled = users_service.get_classes_user_is_in(user.id).await.unwrap();
    let taught = users_service.get_classes_taught_by_user(user.id).await.unwrap();
    assert_eq!(enrolled.len(), 1);
    assert_eq!(enrolled[0].class_id, class.id);
    assert_eq!(taught.len(), 1);
    assert_eq!(taught[0].class_id, class.id);

    classes.remove_student(class.id, user.id).await.unwrap();
    assert!(users_service.get_classes_user_is_in(user.id).await.unwrap().is_empty());
}
