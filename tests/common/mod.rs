//! Shared fixtures for the integration tests

#![allow(dead_code)]

use scenario_store::infrastructure::database::DatabaseConnection;
use scenario_store::infrastructure::entities::{
    Class, NewClass, NewScenario, NewStakeholder, NewUser, Scenario, Stakeholder, User,
};
use scenario_store::infrastructure::repositories::Repository;
use sqlx::SqlitePool;

/// Fresh in-memory database with migrations applied
pub async fn setup_test_db() -> SqlitePool {
    DatabaseConnection::in_memory()
        .await
        .expect("in-memory database should open")
        .pool()
        .clone()
}

pub fn make_user_data(username: &str) -> NewUser {
    NewUser {
        fname: "Test".to_owned(),
        lname: "User".to_owned(),
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        password_hash: "hashed".to_owned(),
        ..Default::default()
    }
}

pub async fn sample_user(pool: &SqlitePool) -> User {
    Repository::<User>::new(pool.clone())
        .create(make_user_data("testuser"))
        .await
        .unwrap()
}

pub async fn sample_class(pool: &SqlitePool) -> Class {
    Repository::<Class>::new(pool.clone())
        .create(NewClass {
            name: "Test Class".to_owned(),
        })
        .await
        .unwrap()
}

pub async fn sample_scenario(pool: &SqlitePool, owner: &User) -> Scenario {
    Repository::<Scenario>::new(pool.clone())
        .create(NewScenario {
            owner_id: owner.id,
            title: "Test Scenario".to_owned(),
            short_desc: Some("Short".to_owned()),
            long_desc: Some("Long".to_owned()),
        })
        .await
        .unwrap()
}

pub async fn sample_stakeholder(pool: &SqlitePool, scenario: &Scenario) -> Stakeholder {
    Repository::<Stakeholder>::new(pool.clone())
        .create(NewStakeholder {
            scenario_id: scenario.id,
            name: "S".to_owned(),
            role: "R".to_owned(),
            prompt: "P".to_owned(),
            ..Default::default()
        })
        .await
        .unwrap()
}
