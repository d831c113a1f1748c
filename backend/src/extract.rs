//! Request extractors whose rejections render as [`AppError`]
//!
//! Wrapping axum's `Json`, `Path` and `Query` keeps malformed bodies, ids and
//! query strings on the same `{"error": ...}` body as every other failure.

use std::{fmt, str::FromStr};

use axum::extract::{FromRequest, FromRequestParts};
use serde::{de, Deserialize, Deserializer};

use crate::error::AppError;

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Query string parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Treat `?key=` the same as an absent key
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::Uri};
    use uuid::Uuid;

    #[derive(Debug, Deserialize)]
    struct Filter {
        #[serde(default, deserialize_with = "empty_string_as_none")]
        id: Option<Uuid>,
    }

    fn parse(query: &str) -> Option<Filter> {
        let uri: Uri = format!("/?{}", query).parse().unwrap();
        Query::<Filter>::try_from_uri(&uri).ok().map(|Query(f)| f)
    }

    #[test]
    fn test_empty_value_is_none() {
        assert!(parse("id=").unwrap().id.is_none());
        assert!(parse("").unwrap().id.is_none());
    }

    #[test]
    fn test_value_is_parsed() {
        let id = Uuid::new_v4();
        assert_eq!(parse(&format!("id={}", id)).unwrap().id, Some(id));
    }

    #[test]
    fn test_bad_value_is_rejected() {
        assert!(parse("id=not-a-uuid").is_none());
    }
}
