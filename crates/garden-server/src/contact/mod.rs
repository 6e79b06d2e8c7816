//! Contact form endpoint

mod relay;
mod validation;

pub use relay::{EmailRelay, HttpEmailRelay, RelayError, relay_payload};
pub use validation::{ContactForm, MIN_MESSAGE_CHARS, Submission, ValidationError};

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::AppState;
use crate::error::AppError;

pub const SUCCESS_MESSAGE: &str = "Thanks! Your message has been sent.";

/// Validate, then hand off to the relay.
///
/// 422 with the validation message, 502 when the relay fails.
pub async fn handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ContactForm>,
) -> Result<impl IntoResponse, AppError> {
    let submission = form.validate()?;

    if let Err(source) = state.relay.send(&submission).await {
        tracing::error!("Contact relay failed: {}", source);
        return Err(AppError::Relay {
            fallback: state.config.contact.fallback_email.clone(),
            source,
        });
    }

    tracing::info!(
        "Contact message relayed ({} characters)",
        submission.message.chars().count()
    );
    Ok((
        StatusCode::OK,
        Json(json!({ "ok": true, "message": SUCCESS_MESSAGE })),
    ))
}
