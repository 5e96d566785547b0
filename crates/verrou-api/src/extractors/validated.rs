//! JSON body extractor that runs `validator` rules.

use axum::Json;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use verrou_core::error::AppError;

use crate::error::ApiError;

/// A JSON body that deserialized and passed its validation rules.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::payload_too_large(rejection.body_text())
            } else {
                AppError::validation(rejection.body_text())
            }
        })?;
        value.validate().map_err(validation_error)?;
        Ok(Self(value))
    }
}

/// Collapse `validator` output into a Validation error with per-field messages.
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let details: serde_json::Map<String, serde_json::Value> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages: Vec<String> = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), serde_json::Value::from(messages))
        })
        .collect();

    AppError::validation("Validation failed").with_details(serde_json::Value::Object(details))
}

#[cfg(test)]
mod tests {
    use super::*;
    use verrou_core::error::ErrorKind;

    #[derive(Debug, serde::Deserialize, Validate)]
    struct Sample {
        #[validate(email(message = "Invalid email"))]
        email: String,
        #[validate(length(min = 3))]
        name: String,
    }

    #[test]
    fn field_messages_end_up_in_details() {
        let sample = Sample {
            email: "nope".into(),
            name: "x".into(),
        };
        let err = validation_error(sample.validate().unwrap_err());
        assert_eq!(err.kind, ErrorKind::Validation);

        let details = err.details.unwrap();
        assert_eq!(details["email"][0], "Invalid email");
        assert_eq!(details["name"][0], "length");
    }
}
