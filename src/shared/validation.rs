use serde::Serialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

/// Field name used for rules that apply to the payload as a whole.
pub const PAYLOAD_FIELD: &str = "body";

/// One violated rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub rule: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(
        field: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            message: message.into(),
        }
    }
}

/// Non-empty list of violations, ordered by field declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    violations: Vec<FieldViolation>,
}

impl ValidationFailure {
    pub fn single(violation: FieldViolation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    pub fn first(&self) -> &FieldViolation {
        &self.violations[0]
    }

    pub fn message(&self) -> &str {
        &self.first().message
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<FieldViolation> {
        self.violations
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ValidationFailure {}

/// A request payload with declarative rules.
///
/// `validator` derive handles per-field rules; `extra_violations` covers
/// rules it cannot express (allow-lists with an empty escape hatch,
/// "at least one field").
pub trait Schema: Validate {
    /// Field names in declaration order. Violations are reported in this order.
    const FIELDS: &'static [&'static str];

    fn extra_violations(&self) -> Vec<FieldViolation> {
        Vec::new()
    }
}

/// Run every rule of `value`'s schema.
pub fn check<T: Schema>(value: &T) -> Result<(), ValidationFailure> {
    let mut violations = match value.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => flatten(&errors),
    };
    violations.extend(value.extra_violations());

    if violations.is_empty() {
        return Ok(());
    }

    // Stable sort keeps the per-field rule order intact.
    violations.sort_by_key(|v| field_rank(T::FIELDS, &v.field));
    Err(ValidationFailure { violations })
}

fn field_rank(fields: &[&str], field: &str) -> usize {
    fields
        .iter()
        .position(|f| *f == field)
        .unwrap_or(fields.len())
}

fn flatten(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        let field = field.to_string();
        for error in field_errors.iter() {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} is invalid", field));
            violations.push(FieldViolation::new(
                field.clone(),
                error.code.to_string(),
                message,
            ));
        }
    }
    // HashMap iteration order is arbitrary; fix it before ranking by field.
    violations.sort_by(|a, b| a.field.cmp(&b.field));
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Alpha is required"))]
        alpha: String,
        #[validate(range(min = 1, max = 10, message = "Beta must be between 1 and 10"))]
        beta: i64,
        zeta: Option<String>,
    }

    impl Schema for Sample {
        const FIELDS: &'static [&'static str] = &["zeta", "beta", "alpha"];

        fn extra_violations(&self) -> Vec<FieldViolation> {
            match &self.zeta {
                Some(z) if z == "bad" => vec![FieldViolation::new("zeta", "allowed", "Zeta is bad")],
                _ => Vec::new(),
            }
        }
    }

    #[test]
    fn test_check_passes_valid_value() {
        let sample = Sample {
            alpha: "a".to_string(),
            beta: 3,
            zeta: None,
        };
        assert!(check(&sample).is_ok());
    }

    #[test]
    fn test_violations_follow_declared_field_order() {
        let sample = Sample {
            alpha: String::new(),
            beta: 11,
            zeta: Some("bad".to_string()),
        };

        let failure = check(&sample).unwrap_err();
        let fields: Vec<&str> = failure
            .violations()
            .iter()
            .map(|v| v.field.as_str())
            .collect();

        assert_eq!(fields, vec!["zeta", "beta", "alpha"]);
        assert_eq!(failure.message(), "Zeta is bad");
        assert_eq!(failure.violations()[1].rule, "range");
        assert_eq!(failure.violations()[2].rule, "length");
    }

    #[test]
    fn test_unknown_fields_rank_last() {
        assert_eq!(field_rank(&["a", "b"], "b"), 1);
        assert_eq!(field_rank(&["a", "b"], PAYLOAD_FIELD), 2);
    }
}
