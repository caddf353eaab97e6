//! JSON body extractor with field-shaped rejections.
//!
//! Axum's own `Json` rejects with a plain-text body. `JsonBody<T>` keeps the
//! same status codes but answers in the API's `{message, errors}` shape, with
//! the parser's complaint under the `body` key:
//!
//! - malformed JSON → 400 Bad Request
//! - well-formed JSON of the wrong shape → 422 Unprocessable Entity
//! - missing `Content-Type: application/json` → 415 Unsupported Media Type
//!
//! User requests take any JSON type per field, so for them the 422 case only
//! covers bodies that are not an object.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roster_core::{ErrorResponse, FieldErrors};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Field name that body-level parse errors are reported under.
pub const BODY_FIELD: &str = "body";

/// JSON extractor whose rejection matches the API's error body.
///
/// Semantic validation stays in the service; this only parses.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T> std::ops::Deref for JsonBody<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection for [`JsonBody`].
#[derive(Debug)]
pub struct JsonBodyRejection(pub JsonRejection);

impl JsonBodyRejection {
    fn message(status: StatusCode) -> &'static str {
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            ErrorResponse::VALIDATION_MESSAGE
        } else {
            "Invalid request body"
        }
    }
}

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        let status = self.0.status();
        debug!(status = status.as_u16(), "Rejected request body: {}", self.0.body_text());

        let body = ErrorResponse {
            message: Self::message(status).to_string(),
            errors: Some(FieldErrors::single(BODY_FIELD, self.0.body_text())),
        };
        (status, Json(body)).into_response()
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(JsonBodyRejection)?;

        Ok(JsonBody(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header::CONTENT_TYPE};
    use http_body_util::BodyExt;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        flag: Option<bool>,
    }

    async fn extract(content_type: Option<&str>, body: &str) -> Result<Probe, Response> {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();

        JsonBody::<Probe>::from_request(request, &())
            .await
            .map(|JsonBody(probe)| probe)
            .map_err(IntoResponse::into_response)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_valid_body() {
        let probe = extract(Some("application/json"), r#"{"flag":true}"#)
            .await
            .unwrap();
        assert_eq!(probe.flag, Some(true));
    }

    #[tokio::test]
    async fn test_null_option_field() {
        let probe = extract(Some("application/json"), r#"{"flag":null}"#)
            .await
            .unwrap();
        assert_eq!(probe.flag, None);
    }

    #[tokio::test]
    async fn test_syntax_error_is_bad_request() {
        let response = extract(Some("application/json"), "{not json").await.unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Invalid request body");
        assert!(json["errors"][BODY_FIELD][0].is_string());
    }

    #[tokio::test]
    async fn test_wrong_type_is_unprocessable() {
        let response = extract(Some("application/json"), r#"{"flag":"yes"}"#)
            .await
            .unwrap_err();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Validation error");
        assert!(json["errors"][BODY_FIELD][0].is_string());
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let response = extract(None, r#"{"flag":true}"#).await.unwrap_err();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
