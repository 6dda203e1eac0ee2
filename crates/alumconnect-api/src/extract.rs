//! Request extractors
//!
//! `ValidatedJson` deserializes a JSON body and runs its `Validate` rules,
//! turning failures into the field-level error envelope.

use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::error::{AppError, FieldError};

pub struct ValidatedJson<T>(pub T);

fn push_errors(out: &mut Vec<FieldError>, field: &str, errors: &ValidationErrorsKind) {
    match errors {
        ValidationErrorsKind::Field(errs) => {
            for err in errs {
                out.push(FieldError {
                    field: field.to_string(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field)),
                    code: err.code.to_string(),
                });
            }
        }
        ValidationErrorsKind::Struct(nested) => {
            for (inner, kind) in nested.errors() {
                push_errors(out, inner, kind);
            }
        }
        ValidationErrorsKind::List(items) => {
            for nested in items.values() {
                for (inner, kind) in nested.errors() {
                    push_errors(out, inner, kind);
                }
            }
        }
    }
}

fn field_errors(errors: ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    for (field, kind) in errors.errors() {
        push_errors(&mut out, field, kind);
    }
    out
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        value.validate().map_err(|e| AppError::Validation(field_errors(e)))?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Validate)]
    struct Sample {
        #[validate(email(message = "Must be a valid email"))]
        email: String,
        #[validate(length(min = 8, message = "Must be at least 8 characters"))]
        password: String,
    }

    #[test]
    fn test_field_errors_carry_field_and_message() {
        let sample = Sample {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };

        let errors = field_errors(sample.validate().unwrap_err());
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.field == "email" && e.message == "Must be a valid email"));
        assert!(errors
            .iter()
            .any(|e| e.field == "password" && e.message == "Must be at least 8 characters"));
    }

    #[test]
    fn test_valid_input_produces_no_errors() {
        let sample = Sample {
            email: "a@x.com".to_string(),
            password: "long enough".to_string(),
        };
        assert!(sample.validate().is_ok());
    }
}
