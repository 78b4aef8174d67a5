//! Project entity and the draft validated before it is sent to the collaborator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::EntityId;
use crate::serde_util::lenient_date;

/// Project record as stored in the `projects` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub manager_id: Option<EntityId>,
}

impl Project {
    /// Days left until the end date, never negative.
    pub fn remaining_days(&self, today: NaiveDate) -> i64 {
        self.end_date
            .map(|end| (end - today).num_days().max(0))
            .unwrap_or(0)
    }
}

/// User-entered project fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ProjectDraft {
    /// Check required fields and date order. The first failing rule wins.
    pub fn validate(&self) -> DomainResult<(NaiveDate, NaiveDate)> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Project name is required"));
        }
        if self.description.trim().is_empty() {
            return Err(DomainError::validation("Project description is required"));
        }
        let start = self
            .start_date
            .ok_or_else(|| DomainError::validation("Start date is required"))?;
        let end = self
            .end_date
            .ok_or_else(|| DomainError::validation("End date is required"))?;
        if start >= end {
            return Err(DomainError::validation(
                "Start date must be before the end date",
            ));
        }
        Ok((start, end))
    }

    /// Validate and attach the managing user.
    pub fn into_new_project(self, manager_id: EntityId) -> DomainResult<NewProject> {
        let (start_date, end_date) = self.validate()?;
        Ok(NewProject {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            start_date,
            end_date,
            image_url: self.image_url.filter(|url| !url.trim().is_empty()),
            manager_id,
        })
    }
}

/// Validated payload for POST/PUT on `projects`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub manager_id: EntityId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn draft() -> ProjectDraft {
        ProjectDraft {
            name: "Portal".to_string(),
            description: "Nuevo portal".to_string(),
            start_date: Some(date("2024-01-01")),
            end_date: Some(date("2024-03-01")),
            image_url: Some("  ".to_string()),
        }
    }

    #[test]
    fn valid_draft_becomes_new_project() {
        let project = draft().into_new_project(EntityId::from("9")).unwrap();
        assert_eq!(project.manager_id.as_str(), "9");
        assert_eq!(project.image_url, None);

        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["startDate"], "2024-01-01");
        assert_eq!(json["managerId"], "9");
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut d = draft();
        d.end_date = Some(date("2023-12-31"));
        assert!(matches!(d.validate(), Err(DomainError::Validation(_))));

        d.end_date = d.start_date;
        assert!(d.validate().is_err());
    }

    #[test]
    fn missing_fields_are_rejected_in_order() {
        let mut d = draft();
        d.name = " ".to_string();
        d.start_date = None;
        assert_eq!(
            d.validate(),
            Err(DomainError::validation("Project name is required"))
        );
    }

    #[test]
    fn remaining_days_never_negative() {
        let project: Project = serde_json::from_str(
            r#"{"id":1,"name":"P","endDate":"2024-01-10","managerId":2}"#,
        )
        .unwrap();
        assert_eq!(project.remaining_days(date("2024-01-01")), 9);
        assert_eq!(project.remaining_days(date("2024-02-01")), 0);
    }
}
