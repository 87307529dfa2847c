//! Request extractors whose rejections render as [`AppError`] JSON bodies.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// `Json<T>` that fails with `AppError::BadRequest`.
#[derive(Debug)]
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// JSON body where an empty body means `T::default()`. A non-empty body must
/// parse; it is never replaced by the default.
#[derive(Debug)]
pub struct JsonOrDefault<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrDefault<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }
        let Json(value) = Json::<T>::from_bytes(&bytes)?;
        Ok(Self(value))
    }
}

#[derive(Debug)]
pub struct AppQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

#[derive(Debug)]
pub struct AppPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for AppPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foods::repo_types::ListType;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize)]
    struct Body {
        #[serde(default)]
        list_type: ListType,
    }

    fn post(body: &'static str) -> Request {
        axum::http::Request::post("/")
            .header(axum::http::header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn empty_body_falls_back_to_default() {
        let JsonOrDefault(b) = JsonOrDefault::<Body>::from_request(post(""), &()).await.unwrap();
        assert_eq!(b.list_type, ListType::Favorites);
    }

    #[tokio::test]
    async fn invalid_body_is_rejected_not_defaulted() {
        let err = JsonOrDefault::<Body>::from_request(post(r#"{"list_type":"wishlist"}"#), &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn query_rejection_is_bad_request() {
        #[derive(Debug, Deserialize)]
        struct Q {
            #[allow(dead_code)]
            limit: i64,
        }
        let req = axum::http::Request::get("/?limit=abc").body(()).unwrap();
        let (mut parts, _) = req.into_parts();
        let err = AppQuery::<Q>::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
