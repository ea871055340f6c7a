//! Extractors that reject with the board's `{errorKind}` body instead of
//! axum's plain-text responses, plus lenient id fields for form-style clients.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use domain::BoardError;
use serde::{de::DeserializeOwned, de::Error as _, Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ApiError;

pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(BoardError::ValidationError(rejection.body_text()).into()),
        }
    }
}

pub struct PathParam<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(PathParam(value)),
            Err(rejection) => Err(BoardError::ValidationError(rejection.body_text()).into()),
        }
    }
}

/// Integers arrive as numbers from scripts and as strings from forms.
pub(crate) fn int_value(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `1`, `"1"`, `null` and `""` for an optional id field.
pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(v) => int_value(&v)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected an integer id, got {}", v))),
    }
}

/// A list of ids, or a single id as sent by a form with one box ticked.
pub fn id_list<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(single) => vec![single],
    };
    items
        .iter()
        .map(|v| {
            int_value(v).ok_or_else(|| D::Error::custom(format!("expected an integer id, got {}", v)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{id_list, opt_id};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize, Debug)]
    struct Form {
        #[serde(default, deserialize_with = "opt_id")]
        id: Option<i64>,
        #[serde(default, deserialize_with = "id_list")]
        ids: Vec<i64>,
    }

    fn parse(v: serde_json::Value) -> Result<Form, serde_json::Error> {
        serde_json::from_value(v)
    }

    #[test]
    fn ids_accept_numbers_and_strings() {
        let form = parse(json!({ "id": "7", "ids": ["5", 6, " 8 "] })).unwrap();
        assert_eq!(form.id, Some(7));
        assert_eq!(form.ids, vec![5, 6, 8]);

        let form = parse(json!({ "id": 3, "ids": "4" })).unwrap();
        assert_eq!(form.id, Some(3));
        assert_eq!(form.ids, vec![4]);
    }

    #[test]
    fn blank_ids_are_absent() {
        for v in [json!({}), json!({ "id": null, "ids": null }), json!({ "id": "" })] {
            let form = parse(v).unwrap();
            assert_eq!(form.id, None);
            assert!(form.ids.is_empty());
        }
    }

    #[test]
    fn garbage_ids_are_rejected() {
        assert!(parse(json!({ "id": "seven" })).is_err());
        assert!(parse(json!({ "id": 1.5 })).is_err());
        assert!(parse(json!({ "ids": [1, "x"] })).is_err());
        assert!(parse(json!({ "ids": [true] })).is_err());
    }
}
