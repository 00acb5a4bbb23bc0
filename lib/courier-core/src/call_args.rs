//! Positional call arguments.
//!
//! Every argument of an intercepted call is captured as a [`serde_json::Value`],
//! so any `Serialize` type can fill any role: path parameter, header, query map
//! or body.

use std::num::FpCategory;

use serde_json::Value;

use crate::Result;

/// The positional arguments of one intercepted call.
pub type CallArgs = Vec<Value>;

/// Captures one call argument.
///
/// # Errors
///
/// Returns an error if the value cannot be represented as JSON
/// (e.g. a map with non-string keys).
///
/// # Example
///
/// ```
/// use courier_core::arg;
///
/// assert_eq!(arg(&42).expect("arg"), serde_json::json!(42));
/// assert_eq!(arg("token").expect("arg"), serde_json::json!("token"));
/// ```
pub fn arg<T: serde::Serialize + ?Sized>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(Into::into)
}

/// Builds a [`CallArgs`] from a list of serializable expressions.
///
/// Evaluates to `courier_core::Result<CallArgs>`.
///
/// ```
/// use courier_core::args;
///
/// let token = "secret";
/// let args = args![token, 42].expect("args");
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Result::<$crate::CallArgs>::Ok(::std::vec::Vec::new())
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::arg(&$value)),+]
            .into_iter()
            .collect::<$crate::Result<$crate::CallArgs>>()
    };
}

/// Renders an argument the way it appears in a URL path or a header value.
///
/// Strings are taken verbatim, arrays are rendered element-wise and joined
/// with commas, everything else is rendered as JSON text.
#[must_use]
pub fn to_param_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(to_param_string)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

/// Returns `false` for `null`, `false`, `0` and `""`.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n
            .as_f64()
            .is_some_and(|f| !matches!(f.classify(), FpCategory::Zero | FpCategory::Nan)),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
