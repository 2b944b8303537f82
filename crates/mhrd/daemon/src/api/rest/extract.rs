//! Request extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{request::Parts, Uri},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::convert::Infallible;

/// Query-string extractor that never rejects.
///
/// Every value is read as a string and a repeated key keeps its last value.
/// A query that still fails to deserialize yields `T::default()`.
#[derive(Debug, Clone, Default)]
pub struct LenientQuery<T>(pub T);

impl<T: DeserializeOwned + Default> LenientQuery<T> {
    pub fn from_uri(uri: &Uri) -> T {
        let pairs = match Query::<Vec<(String, String)>>::try_from_uri(uri) {
            Ok(Query(pairs)) => pairs,
            Err(e) => {
                tracing::debug!(error = %e, "Unparseable query string, ignoring");
                return T::default();
            }
        };

        let mut fields = Map::new();
        for (key, value) in pairs {
            fields.insert(key, Value::String(value));
        }

        serde_json::from_value(Value::Object(fields)).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Query parameters did not match, ignoring");
            T::default()
        })
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for LenientQuery<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(Self::from_uri(&parts.uri)))
    }
}
