//! Query string extractor with automatic validation using the validator crate.

use super::validated_json::validation_error_response;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Query string extractor with automatic validation.
///
/// Deserializes query parameters into `T` and validates them with the
/// `validator` crate, rejecting the request with a structured 400 before any
/// handler code runs. Unknown enum values (e.g. a bad `sort_by`) are caught
/// at the deserialization step.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::get;
/// use axum_helpers::extractors::ValidatedQuery;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct SearchParams {
///     #[validate(length(min = 1))]
///     name: String,
/// }
///
/// async fn search(ValidatedQuery(params): ValidatedQuery<SearchParams>) -> String {
///     format!("Searching for: {}", params.name)
/// }
///
/// let app = Router::new().route("/products/search", get(search));
/// ```
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(data) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        data.validate()
            .map_err(|e| validation_error_response(&e))?;

        Ok(ValidatedQuery(data))
    }
}
