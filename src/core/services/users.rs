//! User accounts, their class memberships and subscriptions.

use crate::core::error::{ServiceError, required};
use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::entities::{
    ClassTeacher, NewUser, Scenario, StudentOfClass, User, UserPatch,
};
use crate::infrastructure::repositories::{Filter, Repository};
use chrono::{DateTime, TimeDelta, Utc};
use di::{Ref, inject, injectable};
use log::info;

pub struct UsersService {
    users: Repository<User>,
    scenarios: Repository<Scenario>,
    students_of_class: Option<Repository<StudentOfClass>>,
    class_teacher: Option<Repository<ClassTeacher>>,
}

#[injectable]
impl UsersService {
    #[inject]
    pub fn create(connection: Ref<DatabaseConnection>) -> UsersService {
        let users = Repository::<User>::new(connection.pool().clone());
        UsersService {
            scenarios: users.sibling(),
            students_of_class: Some(users.sibling()),
            class_teacher: Some(users.sibling()),
            users,
        }
    }
}

impl UsersService {
    pub fn new(
        users: Repository<User>,
        students_of_class: Option<Repository<StudentOfClass>>,
        class_teacher: Option<Repository<ClassTeacher>>,
    ) -> UsersService {
        UsersService {
            scenarios: users.sibling(),
            users,
            students_of_class,
            class_teacher,
        }
    }

    pub async fn create_user(&self, new: NewUser) -> Result<User, ServiceError> {
        Ok(self.users.create(new).await?)
    }

    pub async fn get_user(&self, user_id: i64) -> Result<Option<User>, ServiceError> {
        Ok(self.users.get(user_id).await?)
    }

    pub async fn list_users(&self, filter: Filter) -> Result<Vec<User>, ServiceError> {
        Ok(self.users.list(filter).await?)
    }

    pub async fn update_user(
        &self,
        user_id: i64,
        patch: UserPatch,
    ) -> Result<Option<User>, ServiceError> {
        Ok(self.users.update(user_id, patch).await?)
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<Option<User>, ServiceError> {
        Ok(self.users.delete(user_id).await?)
    }

    pub async fn restore_user(&self, user_id: i64) -> Result<Option<User>, ServiceError> {
        Ok(self.users.restore(user_id).await?)
    }

    /// Active scenarios owned by the user, or `None` if the user is not active.
    pub async fn get_scenarios_owned_by_user(
        &self,
        user_id: i64,
    ) -> Result<Option<Vec<Scenario>>, ServiceError> {
        if self.users.get(user_id).await?.is_none() {
            return Ok(None);
        }
        let scenarios = self
            .scenarios
            .list(Filter::new().eq("owner_id", user_id))
            .await?;
        Ok(Some(scenarios))
    }

    /// Active enrolment links of the user.
    pub async fn get_classes_user_is_in(
        &self,
        user_id: i64,
    ) -> Result<Vec<StudentOfClass>, ServiceError> {
        let students = required(&self.students_of_class, "students_of_class")?;
        Ok(students.list(Filter::new().eq("user_id", user_id)).await?)
    }

    /// Active teaching links of the user.
    pub async fn get_classes_taught_by_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<ClassTeacher>, ServiceError> {
        let teachers = required(&self.class_teacher, "class_teacher")?;
        Ok(teachers.list(Filter::new().eq("teacher_id", user_id)).await?)
    }

    pub async fn is_subscription_active(&self, user_id: i64) -> Result<bool, ServiceError> {
        Ok(self
            .get_subscription_expiry(user_id)
            .await?
            .is_some_and(|expires_at| expires_at > Utc::now()))
    }

    pub async fn get_subscription_expiry(
        &self,
        user_id: i64,
    ) -> Result<Option<DateTime<Utc>>, ServiceError> {
        Ok(self
            .users
            .get(user_id)
            .await?
            .and_then(|user| user.subscription_expires_at))
    }

    /// Extends the subscription by `days`.
    ///
    /// An expired or unset subscription restarts from now; an active one is
    /// extended from its current expiry. Fails with
    /// [`ServiceError::InvalidDuration`] when the new expiry is not representable.
    pub async fn renew_subscription(
        &self,
        user_id: i64,
        days: i64,
    ) -> Result<Option<User>, ServiceError> {
        let Some(user) = self.users.get(user_id).await? else {
            return Ok(None);
        };

        let now = Utc::now();
        let base = match user.subscription_expires_at {
            Some(expires_at) => expires_at.max(now),
            None => now,
        };
        let expires_at = TimeDelta::try_days(days)
            .and_then(|extension| base.checked_add_signed(extension))
            .ok_or(ServiceError::InvalidDuration(days))?;
        info!("renewing subscription of user {user_id} until {expires_at}");

        self.set_expiry(user_id, expires_at).await
    }

    /// Ends the subscription immediately.
    pub async fn expire_subscription(&self, user_id: i64) -> Result<Option<User>, ServiceError> {
        self.set_expiry(user_id, Utc::now()).await
    }

    async fn set_expiry(
        &self,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<User>, ServiceError> {
        let patch = UserPatch {
            subscription_expires_at: Some(Some(expires_at)),
            ..Default::default()
        };
        Ok(self.users.update(user_id, patch).await?)
    }
}
