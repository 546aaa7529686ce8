//! Development-only schema inspection and reset.

use crate::core::error::ServiceError;
use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::entities::{
    Category, ChatHistory, ChatMessage, Class, ClassTeacher, FeedbackReference, Requirement,
    Scenario, ScenarioCategory, SeniorDevTemplate, Stakeholder, StudentOfClass, User,
};
use crate::infrastructure::repositories::Repository;
use crate::infrastructure::traits::Record;
use di::{Ref, inject, injectable};
use log::{info, warn};
use sqlx::SqlitePool;
use std::collections::BTreeMap;

/// Hard-delete order: every table appears after all tables referencing it.
pub const WIPE_ORDER: [&str; 13] = [
    FeedbackReference::TABLE,
    ChatMessage::TABLE,
    ChatHistory::TABLE,
    Requirement::TABLE,
    Stakeholder::TABLE,
    ScenarioCategory::TABLE,
    Category::TABLE,
    SeniorDevTemplate::TABLE,
    Scenario::TABLE,
    StudentOfClass::TABLE,
    ClassTeacher::TABLE,
    Class::TABLE,
    User::TABLE,
];

pub struct DebugService {
    pool: SqlitePool,
}

#[injectable]
impl DebugService {
    #[inject]
    pub fn create(connection: Ref<DatabaseConnection>) -> DebugService {
        DebugService {
            pool: connection.pool().clone(),
        }
    }
}

impl DebugService {
    pub fn new(pool: SqlitePool) -> DebugService {
        DebugService { pool }
    }

    /// Raw row count of every table, soft-deleted rows included.
    pub async fn database_state(&self) -> Result<BTreeMap<&'static str, i64>, ServiceError> {
        let mut state = BTreeMap::new();
        self.count::<FeedbackReference>(&mut state).await?;
        self.count::<ChatMessage>(&mut state).await?;
        self.count::<ChatHistory>(&mut state).await?;
        self.count::<Requirement>(&mut state).await?;
        self.count::<Stakeholder>(&mut state).await?;
        self.count::<ScenarioCategory>(&mut state).await?;
        self.count::<Category>(&mut state).await?;
        self.count::<SeniorDevTemplate>(&mut state).await?;
        self.count::<Scenario>(&mut state).await?;
        self.count::<StudentOfClass>(&mut state).await?;
        self.count::<ClassTeacher>(&mut state).await?;
        self.count::<Class>(&mut state).await?;
        self.count::<User>(&mut state).await?;
        Ok(state)
    }

    async fn count<E: Record>(
        &self,
        state: &mut BTreeMap<&'static str, i64>,
    ) -> Result<(), ServiceError> {
        let count = Repository::<E>::new(self.pool.clone()).count_all().await?;
        state.insert(E::TABLE, count);
        Ok(())
    }

    /// Physically deletes every row of every table in one transaction.
    ///
    /// Irreversible. Returns how many rows were removed per table.
    pub async fn clear_database(&self) -> Result<BTreeMap<&'static str, u64>, ServiceError> {
        warn!("hard-deleting every row of the database");
        let mut tx = self.pool.begin().await?;

        let mut removed = BTreeMap::new();
        for table in WIPE_ORDER {
            let result = sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await?;
            removed.insert(table, result.rows_affected());
        }

        tx.commit().await?;
        info!("database cleared");
        Ok(removed)
    }
}
