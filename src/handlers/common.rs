use crate::errors::ServiceError;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

/// JSON body extractor whose rejection goes through [`ServiceError`], so a
/// missing or unparsable body gets the same error format as every other
/// failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(ServiceError::MalformedBody(rejection.body_text())),
        }
    }
}

/// Path parameter extractor. A segment that does not deserialize into `T`
/// cannot name a stored row, so it is reported as not found.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathParam<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(PathParam(value)),
            Err(rejection) => Err(ServiceError::NotFound(format!(
                "No resource matches the path: {}",
                rejection.body_text()
            ))),
        }
    }
}

/// Validate request input
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ServiceError> {
    input.validate()?;
    Ok(())
}

/// Body returned by successful deletes
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({"status": "deleted"}))]
pub struct DeletedResponse {
    pub status: &'static str,
}

impl DeletedResponse {
    pub fn new() -> Self {
        Self { status: "deleted" }
    }
}

impl Default for DeletedResponse {
    fn default() -> Self {
        Self::new()
    }
}
