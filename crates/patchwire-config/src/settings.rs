//! Conversion between parameter values and JSON settings.

use patchwire_core::{Module, ParamValue};
use serde_json::{Map, Number, Value};

/// JSON form of a parameter value. Non-finite numbers become `null`.
pub fn value_to_json(value: &ParamValue) -> Value {
    match value {
        ParamValue::Number(n) => Number::from_f64(*n).map_or(Value::Null, Value::Number),
        ParamValue::Flag(b) => Value::Bool(*b),
        ParamValue::Text(s) => Value::String(s.clone()),
        ParamValue::List(items) => Value::Array(items.iter().map(value_to_json).collect()),
    }
}

/// Parameter value for a JSON setting, or `None` for `null` and objects.
///
/// The conversion is purely structural; the module validates the result.
pub fn json_to_value(json: &Value) -> Option<ParamValue> {
    match json {
        Value::Number(n) => n.as_f64().map(ParamValue::Number),
        Value::Bool(b) => Some(ParamValue::Flag(*b)),
        Value::String(s) => Some(ParamValue::Text(s.clone())),
        Value::Array(items) => items
            .iter()
            .map(json_to_value)
            .collect::<Option<Vec<_>>>()
            .map(ParamValue::List),
        Value::Null | Value::Object(_) => None,
    }
}

/// Snapshot of a module's writable parameters.
pub fn capture_settings(module: &dyn Module) -> Map<String, Value> {
    let mut settings = Map::new();
    for index in 0..module.param_count() {
        let Some(info) = module.param_info(index) else {
            continue;
        };
        if !info.is_writable() {
            continue;
        }
        if let Some(value) = module.get_param(index) {
            settings.insert(info.name.to_string(), value_to_json(&value));
        }
    }
    settings
}
