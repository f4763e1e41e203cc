use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::utils::errors::AppError;

/// Flattens `validator` errors into one readable line, field names first so
/// clients can match messages back to DTO fields.
fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(msg) => msg.to_string(),
                None => format!("{field}: failed {} check", error.code),
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

/// Maps axum's JSON rejection onto the API's error body. Serde does not
/// expose structured deserialization errors through the rejection, so the
/// missing-field case is recovered from the rejection text.
fn map_rejection(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::bad_request(anyhow!(
            "Request body must be sent with Content-Type: application/json"
        ));
    }

    let body_text = rejection.body_text();

    if let Some(rest) = body_text.split("missing field `").nth(1) {
        let field = rest.split('`').next().unwrap_or("unknown");
        return AppError::bad_request(anyhow!("{field} is required"));
    }

    if body_text.contains("invalid type") {
        return AppError::bad_request(anyhow!("A field in the request body has the wrong type"));
    }

    AppError::bad_request(anyhow!("Request body is not valid JSON"))
}

/// Json extractor that also runs the DTO's `validator` rules: malformed
/// bodies map to 400, rule failures to 422 with the offending messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(map_rejection)?;

        value.validate().map_err(|errors| {
            AppError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                anyhow!("{}", format_errors(&errors)),
            )
        })?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Dto {
        #[validate(email(message = "A valid email is required"))]
        email: String,
        #[validate(range(min = 1, max = 52))]
        week: i32,
    }

    #[test]
    fn format_errors_uses_declared_messages() {
        let dto = Dto {
            email: "not-an-email".to_string(),
            week: 10,
        };
        let errors = dto.validate().unwrap_err();
        assert_eq!(format_errors(&errors), "A valid email is required");
    }

    #[test]
    fn format_errors_falls_back_to_field_and_code() {
        let dto = Dto {
            email: "student@example.com".to_string(),
            week: 0,
        };
        let errors = dto.validate().unwrap_err();
        assert_eq!(format_errors(&errors), "week: failed range check");
    }

    #[test]
    fn format_errors_joins_multiple_failures() {
        let dto = Dto {
            email: "nope".to_string(),
            week: 99,
        };
        let errors = dto.validate().unwrap_err();
        let message = format_errors(&errors);
        assert!(message.contains("A valid email is required"));
        assert!(message.contains("week: failed range check"));
        assert!(message.contains("; "));
    }
}
