//! Marker feedback on scenarios, requirements and chat messages.

use crate::core::error::{ServiceError, required};
use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::entities::{
    ChatHistory, ChatMessage, FeedbackReference, FeedbackReferencePatch, FeedbackTarget,
    MarkingStatus, NewFeedbackReference, Requirement, Scenario, ScenarioPatch, Stakeholder,
};
use crate::infrastructure::repositories::{Filter, Repository};
use di::{Ref, inject, injectable};
use log::warn;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coverage {
    pub total_requirements: usize,
    pub requirements_with_feedback: usize,
    pub coverage_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkingSummary {
    pub scenario_id: i64,
    pub total_feedback: usize,
    pub requirement_feedback: usize,
    pub message_feedback: usize,
    pub general_feedback: usize,
    /// Absent when the service has no requirements repository.
    pub coverage: Option<Coverage>,
}

pub struct FeedbackService {
    feedback: Repository<FeedbackReference>,
    requirements: Option<Repository<Requirement>>,
    messages: Option<Repository<ChatMessage>>,
    scenarios: Option<Repository<Scenario>>,
}

#[injectable]
impl FeedbackService {
    #[inject]
    pub fn create(connection: Ref<DatabaseConnection>) -> FeedbackService {
        let feedback = Repository::<FeedbackReference>::new(connection.pool().clone());
        FeedbackService {
            requirements: Some(feedback.sibling()),
            messages: Some(feedback.sibling()),
            scenarios: Some(feedback.sibling()),
            feedback,
        }
    }
}

impl FeedbackService {
    pub fn new(
        feedback: Repository<FeedbackReference>,
        requirements: Option<Repository<Requirement>>,
        messages: Option<Repository<ChatMessage>>,
        scenarios: Option<Repository<Scenario>>,
    ) -> FeedbackService {
        FeedbackService {
            feedback,
            requirements,
            messages,
            scenarios,
        }
    }

    /// Feedback on the scenario as a whole.
    pub async fn add_general_feedback(
        &self,
        scenario_id: i64,
        text: impl Into<String>,
    ) -> Result<FeedbackReference, ServiceError> {
        if let Some(scenarios) = &self.scenarios {
            if scenarios.get(scenario_id).await?.is_none() {
                return Err(ServiceError::not_found("scenario", scenario_id));
            }
        }

        Ok(self
            .feedback
            .create(NewFeedbackReference {
                feedback: text.into(),
                scenario_id,
                ..Default::default()
            })
            .await?)
    }

    /// Feedback on a requirement.
    ///
    /// The scenario is taken from the requirement when it can be looked up,
    /// from `scenario_id` otherwise.
    pub async fn add_feedback_to_requirement(
        &self,
        requirement_id: i64,
        text: impl Into<String>,
        scenario_id: Option<i64>,
    ) -> Result<FeedbackReference, ServiceError> {
        let owner = match &self.requirements {
            Some(requirements) => requirements
                .get(requirement_id)
                .await?
                .map(|requirement| requirement.scenario_id),
            None => None,
        };
        let scenario_id = owner
            .or(scenario_id)
            .ok_or_else(|| ServiceError::UnresolvedScenario(format!("requirement {requirement_id}")))?;

        Ok(self
            .feedback
            .create(NewFeedbackReference {
                feedback: text.into(),
                scenario_id,
                requirement_id: Some(requirement_id),
                chat_message_id: None,
            })
            .await?)
    }

    /// Feedback on a chat message.
    ///
    /// The scenario is found through message → history → stakeholder when the
    /// chain can be walked, from `scenario_id` otherwise.
    pub async fn add_feedback_to_message(
        &self,
        message_id: i64,
        text: impl Into<String>,
        scenario_id: Option<i64>,
    ) -> Result<FeedbackReference, ServiceError> {
        let owner = match &self.messages {
            Some(messages) => self.scenario_of_message(messages, message_id).await?,
            None => None,
        };
        let scenario_id = owner
            .or(scenario_id)
            .ok_or_else(|| ServiceError::UnresolvedScenario(format!("chat message {message_id}")))?;

        Ok(self
            .feedback
            .create(NewFeedbackReference {
                feedback: text.into(),
                scenario_id,
                requirement_id: None,
                chat_message_id: Some(message_id),
            })
            .await?)
    }

    async fn scenario_of_message(
        &self,
        messages: &Repository<ChatMessage>,
        message_id: i64,
    ) -> Result<Option<i64>, ServiceError> {
        let Some(message) = messages.get(message_id).await? else {
            return Ok(None);
        };
        let Some(history) = messages
            .sibling::<ChatHistory>()
            .get(message.chat_history_id)
            .await?
        else {
            return Ok(None);
        };
        let stakeholder = messages
            .sibling::<Stakeholder>()
            .get(history.stakeholder_id)
            .await?;
        Ok(stakeholder.map(|stakeholder| stakeholder.scenario_id))
    }

    pub async fn get_feedback(
        &self,
        feedback_id: i64,
    ) -> Result<Option<FeedbackReference>, ServiceError> {
        Ok(self.feedback.get(feedback_id).await?)
    }

    pub async fn list_feedback_for_scenario(
        &self,
        scenario_id: i64,
    ) -> Result<Vec<FeedbackReference>, ServiceError> {
        Ok(self
            .feedback
            .list(Filter::new().eq("scenario_id", scenario_id))
            .await?)
    }

    pub async fn update_feedback(
        &self,
        feedback_id: i64,
        text: impl Into<String>,
    ) -> Result<Option<FeedbackReference>, ServiceError> {
        let patch = FeedbackReferencePatch {
            feedback: Some(text.into()),
        };
        Ok(self.feedback.update(feedback_id, patch).await?)
    }

    pub async fn delete_feedback(
        &self,
        feedback_id: i64,
    ) -> Result<Option<FeedbackReference>, ServiceError> {
        Ok(self.feedback.delete(feedback_id).await?)
    }

    pub async fn restore_feedback(
        &self,
        feedback_id: i64,
    ) -> Result<Option<FeedbackReference>, ServiceError> {
        Ok(self.feedback.restore(feedback_id).await?)
    }

    /// Counts the scenario's active feedback by target and, when requirements
    /// are available, how many of its active requirements received any.
    pub async fn compute_marking_summary(
        &self,
        scenario_id: i64,
    ) -> Result<MarkingSummary, ServiceError> {
        let feedback = self.list_feedback_for_scenario(scenario_id).await?;

        let mut summary = MarkingSummary {
            scenario_id,
            total_feedback: feedback.len(),
            requirement_feedback: 0,
            message_feedback: 0,
            general_feedback: 0,
            coverage: None,
        };
        let mut reviewed = BTreeSet::new();
        for item in &feedback {
            match item.target() {
                FeedbackTarget::Requirement(requirement_id) => {
                    summary.requirement_feedback += 1;
                    reviewed.insert(requirement_id);
                }
                FeedbackTarget::ChatMessage(_) => summary.message_feedback += 1,
                FeedbackTarget::General => summary.general_feedback += 1,
            }
        }

        if let Some(requirements) = &self.requirements {
            let requirements = requirements
                .list(Filter::new().eq("scenario_id", scenario_id))
                .await?;
            let covered = requirements
                .iter()
                .filter(|requirement| reviewed.contains(&requirement.id))
                .count();
            let coverage_ratio = if requirements.is_empty() {
                0.0
            } else {
                covered as f64 / requirements.len() as f64
            };
            summary.coverage = Some(Coverage {
                total_requirements: requirements.len(),
                requirements_with_feedback: covered,
                coverage_ratio,
            });
        } else {
            warn!("no requirements repository, skipping coverage for scenario {scenario_id}");
        }

        Ok(summary)
    }

    pub async fn set_marking_status(
        &self,
        scenario_id: i64,
        status: MarkingStatus,
    ) -> Result<Option<Scenario>, ServiceError> {
        let scenarios = required(&self.scenarios, "scenarios")?;
        let patch = ScenarioPatch {
            marking_status: Some(status),
            ..Default::default()
        };
        Ok(scenarios.update(scenario_id, patch).await?)
    }

    /// Like [`FeedbackService::set_marking_status`], taking the status by name.
    pub async fn set_marking_status_named(
        &self,
        scenario_id: i64,
        status: &str,
    ) -> Result<Option<Scenario>, ServiceError> {
        let status = status.parse::<MarkingStatus>()?;
        self.set_marking_status(scenario_id, status).await
    }
}
