//! Shape checks for a decoded review snapshot.
use serde_json::Value;
use thiserror::Error;

pub const HOMEWORKS_KEY: &str = "homeworks";
pub const CURRENT_DATE_KEY: &str = "current_date";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    #[error("API response is empty")]
    Missing,
    #[error("API response is not an object: got {0}")]
    NotAnObject(&'static str),
    #[error("API response has no `homeworks` key")]
    MissingKey,
    #[error("`homeworks` in API response is not a list: got {0}")]
    NotAList(&'static str),
}

/// Return the homework records of `snapshot`, unchanged and in server order.
///
/// An empty list is a valid answer meaning nothing changed since the cursor.
/// `homeworks: null` is a shape error, not an empty list.
pub fn check_response(snapshot: &Value) -> Result<&[Value], ResponseError> {
    let object = match snapshot {
        Value::Null => return Err(ResponseError::Missing),
        Value::Object(object) => object,
        other => return Err(ResponseError::NotAnObject(type_name(other))),
    };
    match object.get(HOMEWORKS_KEY) {
        None => Err(ResponseError::MissingKey),
        Some(Value::Array(records)) => Ok(records.as_slice()),
        Some(other) => Err(ResponseError::NotAList(type_name(other))),
    }
}

/// Server time reported alongside the records, used as the next cursor.
pub fn server_time(snapshot: &Value) -> Option<i64> {
    snapshot.get(CURRENT_DATE_KEY).and_then(Value::as_i64)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
