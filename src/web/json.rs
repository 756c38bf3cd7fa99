use serde::Serialize;

use crate::{http::StatusCode, IntoResponse, Response};

const FALLBACK_BODY: &str = r#"{"error":"internal server error"}"#;

/// JSON response.
///
/// To serialize the specified type to JSON, `T` must implement
/// [`serde::Serialize`].
///
/// ```
/// use pathway::web::Json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Project {
///     name: String,
/// }
///
/// async fn index() -> Json<Project> {
///     Json(Project {
///         name: "roadmap".to_string(),
///     })
/// }
/// ```
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        json_response(StatusCode::OK, &self.0)
    }
}

/// Serializes `value` and only then decides the status line, so a failure
/// can still be reported as `500`.
pub(crate) fn json_response<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(data) => Response::builder()
            .status(status)
            .content_type("application/json")
            .body(data),
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize json response");
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .content_type("application/json")
                .body(FALLBACK_BODY)
        }
    }
}
