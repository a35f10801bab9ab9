pub mod movie;
pub mod user;

pub use movie::{Movie, MovieCreate, MovieUpdate};
pub use user::{NewUser, User};

use crate::error::{ApiError, FieldViolation};
use validator::{ValidationErrors, ValidationErrorsKind};

/// Flatten `validator` output into the API's 422 shape.
///
/// Every violated constraint becomes its own entry; struct-level rules
/// (such as the title/overview check) appear under the `__all__` field.
pub fn validation_error(errors: ValidationErrors) -> ApiError {
    let mut violations = Vec::new();

    for (field, kind) in errors.errors() {
        if let ValidationErrorsKind::Field(field_errors) = kind {
            for err in field_errors {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("constraint '{}' violated", err.code));
                violations.push(FieldViolation {
                    field: field.to_string(),
                    constraint: err.code.to_string(),
                    value: err.params.get("value").cloned(),
                    message,
                });
            }
        }
    }

    ApiError::validation("Invalid request payload", violations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn valid_create() -> MovieCreate {
        MovieCreate {
            title: "Interstellar".to_string(),
            overview: "A team travels through a wormhole in search of a new home.".to_string(),
            year: 2014,
            rating: 8.6,
            category: "Sci-Fi Epic".to_string(),
        }
    }

    #[test]
    fn all_violations_are_reported_not_just_the_first() {
        let payload = MovieCreate {
            title: "x".to_string(),
            overview: "too short".to_string(),
            year: 1800,
            rating: 11.0,
            category: "abc".to_string(),
        };
        let errors = payload.validate().expect_err("payload must be rejected");
        let api_error = validation_error(errors);
        match api_error {
            ApiError::Validation { violations, .. } => {
                let fields: Vec<&str> =
                    violations.iter().map(|v| v.field.as_str()).collect();
                assert!(fields.contains(&"title"));
                assert!(fields.contains(&"overview"));
                assert!(fields.contains(&"year"));
                assert!(fields.contains(&"rating"));
                assert!(fields.contains(&"category"));
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn cross_field_rule_runs_only_after_field_checks_pass() {
        let mut payload = valid_create();
        payload.overview = payload.title.clone();
        // title == overview, but overview is now too short as well; the
        // per-field failure must win and the schema rule stays silent.
        let errors = payload.validate().expect_err("must fail");
        assert!(errors.errors().contains_key("overview"));
        assert!(!errors.errors().contains_key("__all__"));
    }

    #[test]
    fn identical_title_and_overview_is_rejected() {
        let mut payload = valid_create();
        payload.title = "A long enough sentence here".to_string();
        payload.overview = "A long enough sentence here".to_string();
        let errors = payload.validate().expect_err("must fail");
        assert!(errors.errors().contains_key("__all__"));
    }
}
