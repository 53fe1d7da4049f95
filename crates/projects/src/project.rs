use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use werkbank_core::{CustomerId, DomainError, DomainResult, Entity, ProjectId};

/// Project status as shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[serde(rename = "planung")]
    Planning,
    #[serde(rename = "aktiv")]
    Active,
    #[serde(rename = "pausiert")]
    Paused,
    #[serde(rename = "abgeschlossen")]
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub customer_id: CustomerId,
    pub status: ProjectStatus,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Planned net budget.
    #[serde(default)]
    pub budget: Option<Decimal>,
}

impl Project {
    /// A new project in status `planung`.
    pub fn plan(
        id: ProjectId,
        name: impl Into<String>,
        customer_id: CustomerId,
    ) -> DomainResult<Self> {
        let project = Self {
            id,
            name: name.into(),
            customer_id,
            status: ProjectStatus::Planning,
            start_date: None,
            end_date: None,
            budget: None,
        };
        project.validate()?;
        Ok(project)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(DomainError::validation("end_date must not be before start_date"));
            }
        }
        if matches!(self.budget, Some(b) if b < Decimal::ZERO) {
            return Err(DomainError::validation("budget must not be negative"));
        }
        Ok(())
    }
}

impl Entity for Project {
    type Id = ProjectId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
