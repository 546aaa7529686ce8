//! Scenarios with their requirements, stakeholders, categories and templates.

use crate::core::error::ServiceError;
use crate::core::services::membership::{ensure_link, links_of};
use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::entities::{
    Category, MarkingStatus, NewCategory, NewRequirement, NewScenario, NewSeniorDevTemplate,
    NewStakeholder, Requirement, RequirementPatch, Scenario, ScenarioCategory, ScenarioPatch,
    SeniorDevTemplate, Stakeholder, StakeholderPatch,
};
use crate::infrastructure::repositories::{Filter, Repository};
use di::{Ref, inject, injectable};
use log::info;
use serde::Serialize;
use std::collections::BTreeSet;

/// A scenario together with everything shown in its overview.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioSummary {
    pub scenario: Scenario,
    pub categories: Vec<Category>,
    pub stakeholders: Vec<Stakeholder>,
    pub senior_dev: Option<Stakeholder>,
}

pub struct ScenariosService {
    scenarios: Repository<Scenario>,
    requirements: Repository<Requirement>,
    stakeholders: Repository<Stakeholder>,
    categories: Repository<Category>,
    scenario_categories: Repository<ScenarioCategory>,
    templates: Repository<SeniorDevTemplate>,
}

#[injectable]
impl ScenariosService {
    #[inject]
    pub fn create(connection: Ref<DatabaseConnection>) -> ScenariosService {
        let scenarios = Repository::<Scenario>::new(connection.pool().clone());
        ScenariosService {
            requirements: scenarios.sibling(),
            stakeholders: scenarios.sibling(),
            categories: scenarios.sibling(),
            scenario_categories: scenarios.sibling(),
            templates: scenarios.sibling(),
            scenarios,
        }
    }
}

impl ScenariosService {
    pub fn new(
        scenarios: Repository<Scenario>,
        requirements: Repository<Requirement>,
        stakeholders: Repository<Stakeholder>,
        categories: Repository<Category>,
        scenario_categories: Repository<ScenarioCategory>,
        templates: Repository<SeniorDevTemplate>,
    ) -> ScenariosService {
        ScenariosService {
            scenarios,
            requirements,
            stakeholders,
            categories,
            scenario_categories,
            templates,
        }
    }

    pub async fn create_scenario(&self, new: NewScenario) -> Result<Scenario, ServiceError> {
        Ok(self.scenarios.create(new).await?)
    }

    /// Creates a scenario seeded with a senior developer stakeholder copied from a template.
    pub async fn create_scenario_from_template(
        &self,
        new: NewScenario,
        template_id: i64,
    ) -> Result<(Scenario, Stakeholder), ServiceError> {
        let template = self
            .templates
            .get(template_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("senior dev template", template_id))?;

        let scenario = self.scenarios.create(new).await?;
        let senior_dev = self
            .stakeholders
            .create(NewStakeholder {
                scenario_id: scenario.id,
                name: template.name,
                role: template.role,
                desc: template.desc,
                prompt: template.prompt,
                is_senior_dev: true,
            })
            .await?;

        Ok((scenario, senior_dev))
    }

    pub async fn get_scenario(&self, scenario_id: i64) -> Result<Option<Scenario>, ServiceError> {
        Ok(self.scenarios.get(scenario_id).await?)
    }

    pub async fn list_scenarios(&self, filter: Filter) -> Result<Vec<Scenario>, ServiceError> {
        Ok(self.scenarios.list(filter).await?)
    }

    pub async fn update_scenario(
        &self,
        scenario_id: i64,
        patch: ScenarioPatch,
    ) -> Result<Option<Scenario>, ServiceError> {
        Ok(self.scenarios.update(scenario_id, patch).await?)
    }

    pub async fn set_marking_status(
        &self,
        scenario_id: i64,
        status: MarkingStatus,
    ) -> Result<Option<Scenario>, ServiceError> {
        let patch = ScenarioPatch {
            marking_status: Some(status),
            ..Default::default()
        };
        Ok(self.scenarios.update(scenario_id, patch).await?)
    }

    pub async fn delete_scenario(&self, scenario_id: i64) -> Result<Option<Scenario>, ServiceError> {
        Ok(self.scenarios.delete(scenario_id).await?)
    }

    pub async fn restore_scenario(
        &self,
        scenario_id: i64,
    ) -> Result<Option<Scenario>, ServiceError> {
        Ok(self.scenarios.restore(scenario_id).await?)
    }

    pub async fn summarize_scenario(
        &self,
        scenario_id: i64,
    ) -> Result<Option<ScenarioSummary>, ServiceError> {
        let Some(scenario) = self.scenarios.get(scenario_id).await? else {
            return Ok(None);
        };

        let categories = self.list_scenario_categories(scenario_id).await?;
        let (senior_devs, stakeholders): (Vec<_>, Vec<_>) = self
            .list_stakeholders(scenario_id)
            .await?
            .into_iter()
            .partition(|stakeholder| stakeholder.is_senior_dev);

        Ok(Some(ScenarioSummary {
            scenario,
            categories,
            stakeholders,
            senior_dev: senior_devs.into_iter().next(),
        }))
    }

    pub async fn add_requirement(&self, new: NewRequirement) -> Result<Requirement, ServiceError> {
        Ok(self.requirements.create(new).await?)
    }

    pub async fn get_requirement(
        &self,
        requirement_id: i64,
    ) -> Result<Option<Requirement>, ServiceError> {
        Ok(self.requirements.get(requirement_id).await?)
    }

    pub async fn list_requirements(
        &self,
        scenario_id: i64,
    ) -> Result<Vec<Requirement>, ServiceError> {
        Ok(self
            .requirements
            .list(Filter::new().eq("scenario_id", scenario_id))
            .await?)
    }

    pub async fn update_requirement(
        &self,
        requirement_id: i64,
        patch: RequirementPatch,
    ) -> Result<Option<Requirement>, ServiceError> {
        Ok(self.requirements.update(requirement_id, patch).await?)
    }

    pub async fn delete_requirement(
        &self,
        requirement_id: i64,
    ) -> Result<Option<Requirement>, ServiceError> {
        Ok(self.requirements.delete(requirement_id).await?)
    }

    /// Soft-deletes every active requirement of the scenario, one row at a time.
    ///
    /// Returns how many rows this call deleted. Safe to re-run after a partial failure.
    pub async fn clear_requirements(&self, scenario_id: i64) -> Result<usize, ServiceError> {
        let mut cleared = 0;
        for requirement in self.list_requirements(scenario_id).await? {
            if self.requirements.delete(requirement.id).await?.is_some() {
                cleared += 1;
            }
        }
        info!("cleared {cleared} requirements of scenario {scenario_id}");
        Ok(cleared)
    }

    pub async fn add_stakeholder(&self, new: NewStakeholder) -> Result<Stakeholder, ServiceError> {
        Ok(self.stakeholders.create(new).await?)
    }

    pub async fn list_stakeholders(
        &self,
        scenario_id: i64,
    ) -> Result<Vec<Stakeholder>, ServiceError> {
        Ok(self
            .stakeholders
            .list(Filter::new().eq("scenario_id", scenario_id))
            .await?)
    }

    pub async fn update_stakeholder(
        &self,
        stakeholder_id: i64,
        patch: StakeholderPatch,
    ) -> Result<Option<Stakeholder>, ServiceError> {
        Ok(self.stakeholders.update(stakeholder_id, patch).await?)
    }

    pub async fn delete_stakeholder(
        &self,
        stakeholder_id: i64,
    ) -> Result<Option<Stakeholder>, ServiceError> {
        Ok(self.stakeholders.delete(stakeholder_id).await?)
    }

    pub async fn get_senior_dev(
        &self,
        scenario_id: i64,
    ) -> Result<Option<Stakeholder>, ServiceError> {
        let filter = Filter::new()
            .eq("scenario_id", scenario_id)
            .eq("is_senior_dev", true);
        Ok(self.stakeholders.list(filter).await?.into_iter().next())
    }

    pub async fn create_category(&self, new: NewCategory) -> Result<Category, ServiceError> {
        Ok(self.categories.create(new).await?)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
        Ok(self.categories.list(Filter::new()).await?)
    }

    /// Active categories linked to the scenario.
    pub async fn list_scenario_categories(
        &self,
        scenario_id: i64,
    ) -> Result<Vec<Category>, ServiceError> {
        let mut categories = Vec::new();
        for link in links_of(&self.scenario_categories, scenario_id).await? {
            if let Some(category) = self.categories.get(link.category_id).await? {
                categories.push(category);
            }
        }
        Ok(categories)
    }

    /// Makes the scenario's active category links exactly `category_ids`.
    ///
    /// Missing links are restored if a soft-deleted one exists for the pair,
    /// created otherwise; links no longer wanted are soft-deleted. Every newly
    /// linked category must exist and be active; ids being unlinked are not
    /// checked. Returns the active links afterwards.
    pub async fn set_categories(
        &self,
        scenario_id: i64,
        category_ids: &[i64],
    ) -> Result<Vec<ScenarioCategory>, ServiceError> {
        if self.scenarios.get(scenario_id).await?.is_none() {
            return Err(ServiceError::not_found("scenario", scenario_id));
        }

        let desired: BTreeSet<i64> = category_ids.iter().copied().collect();
        let active = links_of(&self.scenario_categories, scenario_id).await?;
        let linked: BTreeSet<i64> = active.iter().map(|link| link.category_id).collect();

        let to_link: Vec<i64> = desired.difference(&linked).copied().collect();
        for category_id in &to_link {
            if self.categories.get(*category_id).await?.is_none() {
                return Err(ServiceError::not_found("category", *category_id));
            }
        }

        for category_id in to_link {
            ensure_link(&self.scenario_categories, scenario_id, category_id).await?;
        }
        for link in active {
            if !desired.contains(&link.category_id) {
                self.scenario_categories.delete(link.id).await?;
            }
        }

        Ok(links_of(&self.scenario_categories, scenario_id).await?)
    }

    pub async fn create_template(
        &self,
        new: NewSeniorDevTemplate,
    ) -> Result<SeniorDevTemplate, ServiceError> {
        Ok(self.templates.create(new).await?)
    }

    pub async fn list_templates(&self) -> Result<Vec<SeniorDevTemplate>, ServiceError> {
        Ok(self.templates.list(Filter::new()).await?)
    }
}
