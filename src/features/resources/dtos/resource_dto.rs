use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::resources::models::{
    NewResource, Resource, ResourceChanges, ResourceFilters, ResourceStatus,
};
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::validation::{FieldViolation, Schema, ValidationFailure, PAYLOAD_FIELD};

fn trim(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

/// `<Field> <message>` for every supplied field that is blank after trimming.
fn blank_fields(fields: [(&str, &Option<String>); 3], message: &str) -> Vec<FieldViolation> {
    fields
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_some_and(str::is_empty))
        .map(|(field, _)| {
            let mut label = field.to_string();
            label[..1].make_ascii_uppercase();
            FieldViolation::new(field, "empty", format!("{} {}", label, message))
        })
        .collect()
}

// Create request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateResourceDto {
    #[validate(
        required(message = "Name is required"),
        length(max = 255, message = "Name must be less than 255 characters")
    )]
    #[schema(min_length = 1, max_length = 255)]
    pub name: Option<String>,

    #[validate(
        required(message = "Description is required"),
        length(max = 1000, message = "Description must be less than 1000 characters")
    )]
    #[schema(min_length = 1, max_length = 1000)]
    pub description: Option<String>,

    #[validate(
        required(message = "Category is required"),
        length(max = 100, message = "Category must be less than 100 characters")
    )]
    #[schema(min_length = 1, max_length = 100)]
    pub category: Option<String>,

    /// Defaults to `active`
    pub status: Option<ResourceStatus>,
}

impl Schema for CreateResourceDto {
    const FIELDS: &'static [&'static str] = &["name", "description", "category", "status"];

    fn extra_violations(&self) -> Vec<FieldViolation> {
        blank_fields(
            [
                ("name", &self.name),
                ("description", &self.description),
                ("category", &self.category),
            ],
            "is required",
        )
    }
}

impl CreateResourceDto {
    /// Strip surrounding whitespace before length rules apply.
    pub fn trimmed(self) -> Self {
        Self {
            name: trim(self.name),
            description: trim(self.description),
            category: trim(self.category),
            status: self.status,
        }
    }

    /// Only meaningful after validation passed.
    pub fn into_new_resource(self) -> NewResource {
        NewResource {
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
        }
    }
}

// Update request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateResourceDto {
    #[validate(length(max = 255, message = "Name must be less than 255 characters"))]
    #[schema(min_length = 1, max_length = 255)]
    pub name: Option<String>,

    #[validate(length(max = 1000, message = "Description must be less than 1000 characters"))]
    #[schema(min_length = 1, max_length = 1000)]
    pub description: Option<String>,

    #[validate(length(max = 100, message = "Category must be less than 100 characters"))]
    #[schema(min_length = 1, max_length = 100)]
    pub category: Option<String>,

    pub status: Option<ResourceStatus>,
}

impl Schema for UpdateResourceDto {
    const FIELDS: &'static [&'static str] = &["name", "description", "category", "status"];

    fn extra_violations(&self) -> Vec<FieldViolation> {
        if self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.status.is_none()
        {
            return vec![FieldViolation::new(
                PAYLOAD_FIELD,
                "min_fields",
                "At least one field must be provided for update",
            )];
        }

        blank_fields(
            [
                ("name", &self.name),
                ("description", &self.description),
                ("category", &self.category),
            ],
            "cannot be empty",
        )
    }
}

impl UpdateResourceDto {
    pub fn trimmed(self) -> Self {
        Self {
            name: trim(self.name),
            description: trim(self.description),
            category: trim(self.category),
            status: self.status,
        }
    }

    pub fn into_changes(self) -> ResourceChanges {
        ResourceChanges {
            name: self.name,
            description: self.description,
            category: self.category,
            status: self.status,
        }
    }
}

// Query params for listing resources
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResourceQueryParams {
    /// Exact category match (empty = any)
    #[validate(length(max = 100, message = "Category must be at most 100 characters"))]
    pub category: Option<String>,

    /// `active` or `inactive` (empty = any)
    pub status: Option<String>,

    /// Case-insensitive substring of name or description
    #[validate(length(max = 255, message = "Search must be at most 255 characters"))]
    pub search: Option<String>,

    /// Page size (default: 20, max: 100)
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    #[param(minimum = 1, maximum = 100)]
    pub limit: Option<i64>,

    /// Rows to skip (default: 0)
    #[validate(range(min = 0, message = "Offset must be greater than or equal to 0"))]
    #[param(minimum = 0)]
    pub offset: Option<i64>,
}

impl Schema for ResourceQueryParams {
    const FIELDS: &'static [&'static str] = &["category", "status", "search", "limit", "offset"];

    fn extra_violations(&self) -> Vec<FieldViolation> {
        match self.status.as_deref() {
            None | Some("") => Vec::new(),
            Some(value) if ResourceStatus::parse(value).is_some() => Vec::new(),
            Some(_) => vec![FieldViolation::new(
                "status",
                "one_of",
                "Status must be one of: active, inactive",
            )],
        }
    }
}

impl ResourceQueryParams {
    /// Apply defaults. Empty strings mean "no filter".
    pub fn into_filters(self) -> ResourceFilters {
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

        ResourceFilters {
            category: non_empty(self.category),
            status: self.status.as_deref().and_then(ResourceStatus::parse),
            search: non_empty(self.search),
            limit: Some(self.limit.unwrap_or(DEFAULT_PAGE_SIZE)),
            offset: Some(self.offset.unwrap_or(0)),
        }
    }
}

/// Path id of a resource
#[derive(Debug, Clone, Copy, Validate)]
pub struct ResourceIdParam {
    #[validate(range(min = 1, message = "Invalid resource ID"))]
    pub id: i64,
}

impl Schema for ResourceIdParam {
    const FIELDS: &'static [&'static str] = &["id"];
}

impl ResourceIdParam {
    /// Accepts plain ASCII digits only: no sign, whitespace or decimal point.
    pub fn parse(raw: &str) -> Result<i64, ValidationFailure> {
        let invalid =
            || ValidationFailure::single(FieldViolation::new("id", "integer", "Invalid resource ID"));

        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let id = raw.parse::<i64>().map_err(|_| invalid())?;
        let param = Self { id };
        crate::shared::validation::check(&param)?;
        Ok(param.id)
    }
}

// Response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResponseDto {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub status: ResourceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Resource> for ResourceResponseDto {
    fn from(r: Resource) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            category: r.category,
            status: r.status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::validation::check;
    use serde_json::json;

    fn create_dto(value: serde_json::Value) -> CreateResourceDto {
        serde_json::from_value::<CreateResourceDto>(value)
            .expect("valid json shape")
            .trimmed()
    }

    #[test]
    fn test_create_defaults_status_to_active() {
        let dto = create_dto(json!({
            "name": "Pen",
            "description": "Blue ink",
            "category": "office"
        }));
        assert!(check(&dto).is_ok());

        let input = dto.into_new_resource();
        assert_eq!(input.status, ResourceStatus::Active);
        assert_eq!(input.name, "Pen");
    }

    #[test]
    fn test_create_reports_first_missing_field() {
        let dto = create_dto(json!({ "category": "office" }));
        let failure = check(&dto).unwrap_err();

        assert_eq!(failure.message(), "Name is required");
        assert_eq!(failure.violations().len(), 2);
        assert_eq!(failure.violations()[1].field, "description");
    }

    #[test]
    fn test_create_trims_before_length_check() {
        let dto = create_dto(json!({
            "name": "   ",
            "description": "  padded  ",
            "category": "office"
        }));
        let failure = check(&dto).unwrap_err();
        assert_eq!(failure.first().field, "name");
        assert_eq!(failure.first().rule, "empty");
        assert_eq!(failure.message(), "Name is required");

        let dto = create_dto(json!({
            "name": " Pen ",
            "description": "  padded  ",
            "category": "office"
        }));
        let input = dto.into_new_resource();
        assert_eq!(input.name, "Pen");
        assert_eq!(input.description, "padded");
    }

    #[test]
    fn test_create_rejects_overlong_name() {
        let dto = create_dto(json!({
            "name": "x".repeat(256),
            "description": "d",
            "category": "c"
        }));
        assert_eq!(
            check(&dto).unwrap_err().message(),
            "Name must be less than 255 characters"
        );

        let dto = create_dto(json!({
            "name": "x".repeat(255),
            "description": "d".repeat(1000),
            "category": "c".repeat(100)
        }));
        assert!(check(&dto).is_ok());
    }

    #[test]
    fn test_create_rejects_unknown_fields_and_status() {
        let with_id = serde_json::from_value::<CreateResourceDto>(json!({
            "id": 7,
            "name": "n",
            "description": "d",
            "category": "c"
        }));
        assert!(with_id.is_err());

        let bad_status = serde_json::from_value::<CreateResourceDto>(json!({
            "name": "n",
            "description": "d",
            "category": "c",
            "status": "archived"
        }));
        assert!(bad_status.is_err());
    }

    #[test]
    fn test_update_requires_a_field() {
        let dto = UpdateResourceDto::default();
        let failure = check(&dto).unwrap_err();
        assert_eq!(failure.first().field, PAYLOAD_FIELD);
        assert_eq!(
            failure.message(),
            "At least one field must be provided for update"
        );

        let dto = UpdateResourceDto {
            status: Some(ResourceStatus::Inactive),
            ..Default::default()
        };
        assert!(check(&dto).is_ok());
        assert_eq!(
            dto.into_changes().status,
            Some(ResourceStatus::Inactive)
        );
    }

    #[test]
    fn test_update_rejects_blank_name() {
        let dto = UpdateResourceDto {
            name: Some("  ".to_string()),
            ..Default::default()
        }
        .trimmed();
        assert_eq!(check(&dto).unwrap_err().message(), "Name cannot be empty");

        let dto = UpdateResourceDto {
            category: Some("c".repeat(101)),
            ..Default::default()
        };
        assert_eq!(
            check(&dto).unwrap_err().message(),
            "Category must be less than 100 characters"
        );
    }

    #[test]
    fn test_query_defaults() {
        let params = ResourceQueryParams::default();
        assert!(check(&params).is_ok());

        let filters = params.into_filters();
        assert_eq!(filters.limit, Some(DEFAULT_PAGE_SIZE));
        assert_eq!(filters.offset, Some(0));
        assert_eq!(filters.category, None);
    }

    #[test]
    fn test_query_empty_strings_mean_no_filter() {
        let params = ResourceQueryParams {
            category: Some(String::new()),
            status: Some(String::new()),
            search: Some(String::new()),
            ..Default::default()
        };
        assert!(check(&params).is_ok());

        let filters = params.into_filters();
        assert_eq!(filters.category, None);
        assert_eq!(filters.status, None);
        assert_eq!(filters.search, None);
    }

    #[test]
    fn test_query_rejects_out_of_range_window() {
        let params = ResourceQueryParams {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(
            check(&params).unwrap_err().message(),
            "Limit must be between 1 and 100"
        );

        let params = ResourceQueryParams {
            limit: Some(101),
            offset: Some(-1),
            ..Default::default()
        };
        let failure = check(&params).unwrap_err();
        assert_eq!(failure.violations()[0].field, "limit");
        assert_eq!(failure.violations()[1].field, "offset");
    }

    #[test]
    fn test_query_status_allow_list() {
        let params = ResourceQueryParams {
            status: Some("deleted".to_string()),
            ..Default::default()
        };
        assert_eq!(
            check(&params).unwrap_err().message(),
            "Status must be one of: active, inactive"
        );

        let params = ResourceQueryParams {
            status: Some("inactive".to_string()),
            ..Default::default()
        };
        assert_eq!(
            params.into_filters().status,
            Some(ResourceStatus::Inactive)
        );
    }

    #[test]
    fn test_resource_id_param() {
        assert_eq!(ResourceIdParam::parse("12").unwrap(), 12);
        assert_eq!(ResourceIdParam::parse("007").unwrap(), 7);
        for raw in ["0", "-3", "abc", "1.5", "", "+1", " 1", "1 ", "9223372036854775808"] {
            assert_eq!(
                ResourceIdParam::parse(raw).unwrap_err().message(),
                "Invalid resource ID",
                "input {:?}",
                raw
            );
        }
    }
}
