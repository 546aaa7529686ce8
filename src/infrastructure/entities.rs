//! Database entities

use crate::infrastructure::traits::{Changeset, Membership, Record, SqlValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

type Values = Vec<(&'static str, SqlValue)>;

fn set<T: Into<SqlValue>>(values: &mut Values, column: &'static str, value: Option<T>) {
    if let Some(value) = value {
        values.push((column, value.into()));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum MarkingStatus {
    #[default]
    Draft,
    Submitted,
    Marked,
    Returned,
}

impl MarkingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkingStatus::Draft => "draft",
            MarkingStatus::Submitted => "submitted",
            MarkingStatus::Marked => "marked",
            MarkingStatus::Returned => "returned",
        }
    }
}

impl Display for MarkingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown marking status `{0}`")]
pub struct UnknownMarkingStatus(pub String);

impl FromStr for MarkingStatus {
    type Err = UnknownMarkingStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(MarkingStatus::Draft),
            "submitted" => Ok(MarkingStatus::Submitted),
            "marked" => Ok(MarkingStatus::Marked),
            "returned" => Ok(MarkingStatus::Returned),
            other => Err(UnknownMarkingStatus(other.to_owned())),
        }
    }
}

impl From<MarkingStatus> for SqlValue {
    fn from(status: MarkingStatus) -> Self {
        SqlValue::Text(status.as_str().to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub fname: String,
    pub lname: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub subscription_expires_at: Option<DateTime<Utc>>,
    pub subscription_tier: Option<String>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub fname: String,
    pub lname: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub subscription_expires_at: Option<DateTime<Utc>>,
    pub subscription_tier: Option<String>,
}

impl Changeset for NewUser {
    fn into_values(self) -> Values {
        vec![
            ("fname", self.fname.into()),
            ("lname", self.lname.into()),
            ("username", self.username.into()),
            ("email", self.email.into()),
            ("password_hash", self.password_hash.into()),
            ("subscription_expires_at", self.subscription_expires_at.into()),
            ("subscription_tier", self.subscription_tier.into()),
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub fname: Option<String>,
    pub lname: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub subscription_expires_at: Option<Option<DateTime<Utc>>>,
    pub subscription_tier: Option<Option<String>>,
}

impl Changeset for UserPatch {
    fn into_values(self) -> Values {
        let mut values = Values::new();
        set(&mut values, "fname", self.fname);
        set(&mut values, "lname", self.lname);
        set(&mut values, "username", self.username);
        set(&mut values, "email", self.email);
        set(&mut values, "password_hash", self.password_hash);
        set(&mut values, "subscription_expires_at", self.subscription_expires_at);
        set(&mut values, "subscription_tier", self.subscription_tier);
        values
    }
}

impl Record for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "fname",
        "lname",
        "username",
        "email",
        "password_hash",
        "subscription_expires_at",
        "subscription_tier",
        "created_at",
        "deleted_at",
    ];
    type New = NewUser;
    type Patch = UserPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Class {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewClass {
    pub name: String,
}

impl Changeset for NewClass {
    fn into_values(self) -> Values {
        vec![("name", self.name.into())]
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClassPatch {
    pub name: Option<String>,
}

impl Changeset for ClassPatch {
    fn into_values(self) -> Values {
        let mut values = Values::new();
        set(&mut values, "name", self.name);
        values
    }
}

impl Record for Class {
    const TABLE: &'static str = "class";
    const COLUMNS: &'static [&'static str] = &["id", "name", "created_at", "deleted_at"];
    type New = NewClass;
    type Patch = ClassPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ClassTeacher {
    pub id: i64,
    pub teacher_id: i64,
    pub class_id: i64,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewClassTeacher {
    pub teacher_id: i64,
    pub class_id: i64,
}

impl Changeset for NewClassTeacher {
    fn into_values(self) -> Values {
        vec![
            ("teacher_id", self.teacher_id.into()),
            ("class_id", self.class_id.into()),
        ]
    }
}

/// Links are only ever created, soft-deleted or restored.
#[derive(Debug, Clone, Default)]
pub struct LinkPatch;

impl Changeset for LinkPatch {
    fn into_values(self) -> Values {
        Values::new()
    }
}

impl Record for ClassTeacher {
    const TABLE: &'static str = "class_teacher";
    const COLUMNS: &'static [&'static str] =
        &["id", "teacher_id", "class_id", "created_at", "deleted_at"];
    type New = NewClassTeacher;
    type Patch = LinkPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

impl Membership for ClassTeacher {
    const PARENT: &'static str = "class_id";
    const MEMBER: &'static str = "teacher_id";

    fn link(class_id: i64, teacher_id: i64) -> NewClassTeacher {
        NewClassTeacher {
            teacher_id,
            class_id,
        }
    }

    fn parent_id(&self) -> i64 {
        self.class_id
    }

    fn member_id(&self) -> i64 {
        self.teacher_id
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct StudentOfClass {
    pub id: i64,
    pub user_id: i64,
    pub class_id: i64,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewStudentOfClass {
    pub user_id: i64,
    pub class_id: i64,
}

impl Changeset for NewStudentOfClass {
    fn into_values(self) -> Values {
        vec![
            ("user_id", self.user_id.into()),
            ("class_id", self.class_id.into()),
        ]
    }
}

impl Record for StudentOfClass {
    const TABLE: &'static str = "students_of_class";
    const COLUMNS: &'static [&'static str] =
        &["id", "user_id", "class_id", "created_at", "deleted_at"];
    type New = NewStudentOfClass;
    type Patch = LinkPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

impl Membership for StudentOfClass {
    const PARENT: &'static str = "class_id";
    const MEMBER: &'static str = "user_id";

    fn link(class_id: i64, user_id: i64) -> NewStudentOfClass {
        NewStudentOfClass { user_id, class_id }
    }

    fn parent_id(&self) -> i64 {
        self.class_id
    }

    fn member_id(&self) -> i64 {
        self.user_id
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct SeniorDevTemplate {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub desc: Option<String>,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewSeniorDevTemplate {
    pub name: String,
    pub role: String,
    pub desc: Option<String>,
    pub prompt: String,
}

impl Changeset for NewSeniorDevTemplate {
    fn into_values(self) -> Values {
        vec![
            ("name", self.name.into()),
            ("role", self.role.into()),
            ("desc", self.desc.into()),
            ("prompt", self.prompt.into()),
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct SeniorDevTemplatePatch {
    pub name: Option<String>,
    pub role: Option<String>,
    pub desc: Option<Option<String>>,
    pub prompt: Option<String>,
}

impl Changeset for SeniorDevTemplatePatch {
    fn into_values(self) -> Values {
        let mut values = Values::new();
        set(&mut values, "name", self.name);
        set(&mut values, "role", self.role);
        set(&mut values, "desc", self.desc);
        set(&mut values, "prompt", self.prompt);
        values
    }
}

impl Record for SeniorDevTemplate {
    const TABLE: &'static str = "senior_dev_templates";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "role",
        "desc",
        "prompt",
        "created_at",
        "deleted_at",
    ];
    type New = NewSeniorDevTemplate;
    type Patch = SeniorDevTemplatePatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Scenario {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub short_desc: Option<String>,
    pub long_desc: Option<String>,
    pub marking_status: MarkingStatus,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// New scenarios always start as [`MarkingStatus::Draft`].
#[derive(Debug, Clone, Default)]
pub struct NewScenario {
    pub owner_id: i64,
    pub title: String,
    pub short_desc: Option<String>,
    pub long_desc: Option<String>,
}

impl Changeset for NewScenario {
    fn into_values(self) -> Values {
        vec![
            ("owner_id", self.owner_id.into()),
            ("title", self.title.into()),
            ("short_desc", self.short_desc.into()),
            ("long_desc", self.long_desc.into()),
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScenarioPatch {
    pub title: Option<String>,
    pub short_desc: Option<Option<String>>,
    pub long_desc: Option<Option<String>>,
    pub marking_status: Option<MarkingStatus>,
}

impl Changeset for ScenarioPatch {
    fn into_values(self) -> Values {
        let mut values = Values::new();
        set(&mut values, "title", self.title);
        set(&mut values, "short_desc", self.short_desc);
        set(&mut values, "long_desc", self.long_desc);
        set(&mut values, "marking_status", self.marking_status);
        values
    }
}

impl Record for Scenario {
    const TABLE: &'static str = "scenarios";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "owner_id",
        "title",
        "short_desc",
        "long_desc",
        "marking_status",
        "created_at",
        "deleted_at",
    ];
    type New = NewScenario;
    type Patch = ScenarioPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub name: String,
}

impl Changeset for NewCategory {
    fn into_values(self) -> Values {
        vec![("name", self.name.into())]
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
}

impl Changeset for CategoryPatch {
    fn into_values(self) -> Values {
        let mut values = Values::new();
        set(&mut values, "name", self.name);
        values
    }
}

impl Record for Category {
    const TABLE: &'static str = "categories";
    const COLUMNS: &'static [&'static str] = &["id", "name", "created_at", "deleted_at"];
    type New = NewCategory;
    type Patch = CategoryPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ScenarioCategory {
    pub id: i64,
    pub scenario_id: i64,
    pub category_id: i64,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewScenarioCategory {
    pub scenario_id: i64,
    pub category_id: i64,
}

impl Changeset for NewScenarioCategory {
    fn into_values(self) -> Values {
        vec![
            ("scenario_id", self.scenario_id.into()),
            ("category_id", self.category_id.into()),
        ]
    }
}

impl Record for ScenarioCategory {
    const TABLE: &'static str = "scenario_categories";
    const COLUMNS: &'static [&'static str] =
        &["id", "scenario_id", "category_id", "created_at", "deleted_at"];
    type New = NewScenarioCategory;
    type Patch = LinkPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

impl Membership for ScenarioCategory {
    const PARENT: &'static str = "scenario_id";
    const MEMBER: &'static str = "category_id";

    fn link(scenario_id: i64, category_id: i64) -> NewScenarioCategory {
        NewScenarioCategory {
            scenario_id,
            category_id,
        }
    }

    fn parent_id(&self) -> i64 {
        self.scenario_id
    }

    fn member_id(&self) -> i64 {
        self.category_id
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Stakeholder {
    pub id: i64,
    pub scenario_id: i64,
    pub name: String,
    pub role: String,
    pub desc: Option<String>,
    pub prompt: String,
    pub is_senior_dev: bool,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewStakeholder {
    pub scenario_id: i64,
    pub name: String,
    pub role: String,
    pub desc: Option<String>,
    pub prompt: String,
    pub is_senior_dev: bool,
}

impl Changeset for NewStakeholder {
    fn into_values(self) -> Values {
        vec![
            ("scenario_id", self.scenario_id.into()),
            ("name", self.name.into()),
            ("role", self.role.into()),
            ("desc", self.desc.into()),
            ("prompt", self.prompt.into()),
            ("is_senior_dev", self.is_senior_dev.into()),
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct StakeholderPatch {
    pub name: Option<String>,
    pub role: Option<String>,
    pub desc: Option<Option<String>>,
    pub prompt: Option<String>,
    pub is_senior_dev: Option<bool>,
}

impl Changeset for StakeholderPatch {
    fn into_values(self) -> Values {
        let mut values = Values::new();
        set(&mut values, "name", self.name);
        set(&mut values, "role", self.role);
        set(&mut values, "desc", self.desc);
        set(&mut values, "prompt", self.prompt);
        set(&mut values, "is_senior_dev", self.is_senior_dev);
        values
    }
}

impl Record for Stakeholder {
    const TABLE: &'static str = "stakeholder";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "scenario_id",
        "name",
        "role",
        "desc",
        "prompt",
        "is_senior_dev",
        "created_at",
        "deleted_at",
    ];
    type New = NewStakeholder;
    type Patch = StakeholderPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ChatHistory {
    pub id: i64,
    pub stakeholder_id: i64,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewChatHistory {
    pub stakeholder_id: i64,
}

impl Changeset for NewChatHistory {
    fn into_values(self) -> Values {
        vec![("stakeholder_id", self.stakeholder_id.into())]
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChatHistoryPatch {
    pub stakeholder_id: Option<i64>,
}

impl Changeset for ChatHistoryPatch {
    fn into_values(self) -> Values {
        let mut values = Values::new();
        set(&mut values, "stakeholder_id", self.stakeholder_id);
        values
    }
}

impl Record for ChatHistory {
    const TABLE: &'static str = "chat_history";
    const COLUMNS: &'static [&'static str] =
        &["id", "stakeholder_id", "created_at", "deleted_at"];
    type New = NewChatHistory;
    type Patch = ChatHistoryPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ChatMessage {
    pub id: i64,
    pub chat_history_id: i64,
    pub sent_at: DateTime<Utc>,
    pub sent_by: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// `sent_at` is stamped when the message is written, never by the caller.
#[derive(Debug, Clone, Default)]
pub struct NewChatMessage {
    pub chat_history_id: i64,
    pub sent_by: String,
    pub message: String,
}

impl Changeset for NewChatMessage {
    fn into_values(self) -> Values {
        vec![
            ("chat_history_id", self.chat_history_id.into()),
            ("sent_at", Utc::now().into()),
            ("sent_by", self.sent_by.into()),
            ("message", self.message.into()),
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChatMessagePatch {
    pub sent_by: Option<String>,
    pub message: Option<String>,
}

impl Changeset for ChatMessagePatch {
    fn into_values(self) -> Values {
        let mut values = Values::new();
        set(&mut values, "sent_by", self.sent_by);
        set(&mut values, "message", self.message);
        values
    }
}

impl Record for ChatMessage {
    const TABLE: &'static str = "chat_message";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "chat_history_id",
        "sent_at",
        "sent_by",
        "message",
        "created_at",
        "deleted_at",
    ];
    type New = NewChatMessage;
    type Patch = ChatMessagePatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Requirement {
    pub id: i64,
    pub scenario_id: i64,
    /// e.g. "functional" or "non-functional"
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub requirement: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewRequirement {
    pub scenario_id: i64,
    pub kind: String,
    pub requirement: String,
}

impl Changeset for NewRequirement {
    fn into_values(self) -> Values {
        vec![
            ("scenario_id", self.scenario_id.into()),
            ("type", self.kind.into()),
            ("requirement", self.requirement.into()),
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequirementPatch {
    pub kind: Option<String>,
    pub requirement: Option<String>,
}

impl Changeset for RequirementPatch {
    fn into_values(self) -> Values {
        let mut values = Values::new();
        set(&mut values, "type", self.kind);
        set(&mut values, "requirement", self.requirement);
        values
    }
}

impl Record for Requirement {
    const TABLE: &'static str = "requirements";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "scenario_id",
        "type",
        "requirement",
        "created_at",
        "deleted_at",
    ];
    type New = NewRequirement;
    type Patch = RequirementPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct FeedbackReference {
    pub id: i64,
    pub feedback: String,
    pub scenario_id: i64,
    pub requirement_id: Option<i64>,
    pub chat_message_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// What a feedback row is attached to, besides its scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTarget {
    General,
    Requirement(i64),
    ChatMessage(i64),
}

impl FeedbackReference {
    pub fn target(&self) -> FeedbackTarget {
        match (self.requirement_id, self.chat_message_id) {
            (Some(requirement_id), _) => FeedbackTarget::Requirement(requirement_id),
            (None, Some(message_id)) => FeedbackTarget::ChatMessage(message_id),
            (None, None) => FeedbackTarget::General,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewFeedbackReference {
    pub feedback: String,
    pub scenario_id: i64,
    pub requirement_id: Option<i64>,
    pub chat_message_id: Option<i64>,
}

impl Changeset for NewFeedbackReference {
    fn into_values(self) -> Values {
        vec![
            ("feedback", self.feedback.into()),
            ("scenario_id", self.scenario_id.into()),
            ("requirement_id", self.requirement_id.into()),
            ("chat_message_id", self.chat_message_id.into()),
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeedbackReferencePatch {
    pub feedback: Option<String>,
}

impl Changeset for FeedbackReferencePatch {
    fn into_values(self) -> Values {
        let mut values = Values::new();
        set(&mut values, "feedback", self.feedback);
        values
    }
}

impl Record for FeedbackReference {
    const TABLE: &'static str = "feedback_reference";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "feedback",
        "scenario_id",
        "requirement_id",
        "chat_message_id",
        "created_at",
        "deleted_at",
    ];
    type New = NewFeedbackReference;
    type Patch = FeedbackReferencePatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marking_status_parses_lowercase_names() {
        assert_eq!("submitted".parse::<MarkingStatus>().unwrap(), MarkingStatus::Submitted);
        assert_eq!("draft".parse::<MarkingStatus>().unwrap(), MarkingStatus::default());
        assert!("Marked".parse::<MarkingStatus>().is_err());
    }

    #[test]
    fn test_patch_only_writes_supplied_fields() {
        let values = UserPatch {
            fname: Some("Ada".to_owned()),
            subscription_tier: Some(None),
            ..Default::default()
        }
        .into_values();

        assert_eq!(
            values,
            vec![
                ("fname", SqlValue::Text("Ada".to_owned())),
                ("subscription_tier", SqlValue::Null),
            ]
        );
    }

    #[test]
    fn test_feedback_target_prefers_requirement() {
        let feedback = FeedbackReference {
            id: 1,
            feedback: "ok".to_owned(),
            scenario_id: 1,
            requirement_id: Some(4),
            chat_message_id: Some(9),
            created_at: Utc::now(),
            deleted_at: None,
        };
        assert_eq!(feedback.target(), FeedbackTarget::Requirement(4));
    }
}
