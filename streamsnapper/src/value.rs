//! Tolerant field access over the extractor's raw JSON.
//!
//! Every getter takes a primary key followed by fallback keys. The first key
//! holding a non-null value is used; if that value cannot be converted the
//! field is treated as missing rather than failing the whole record.

use serde_json::Value;

fn lookup<'a>(obj: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(key))
        .find(|value| !value.is_null())
}

pub(crate) fn get_str(obj: &Value, keys: &[&str]) -> Option<String> {
    let text = match lookup(obj, keys)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None
    };

    if text.is_empty() { None } else { Some(text) }
}

pub(crate) fn get_f64(obj: &Value, keys: &[&str]) -> Option<f64> {
    let number = match lookup(obj, keys)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None
    };

    number.is_finite().then_some(number)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn get_u64(obj: &Value, keys: &[&str]) -> Option<u64> {
    match lookup(obj, keys)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None
    }
}

pub(crate) fn get_u32(obj: &Value, keys: &[&str]) -> Option<u32> {
    get_u64(obj, keys).and_then(|n| u32::try_from(n).ok())
}

pub(crate) fn get_i64(obj: &Value, keys: &[&str]) -> Option<i64> {
    match lookup(obj, keys)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None
    }
}

pub(crate) fn get_bool(obj: &Value, keys: &[&str]) -> Option<bool> {
    match lookup(obj, keys)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        _ => None
    }
}

pub(crate) fn get_str_list(obj: &Value, keys: &[&str]) -> Vec<String> {
    match lookup(obj, keys) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new()
    }
}

/// Stream URLs come back percent-encoded in some extractor paths.
pub(crate) fn get_url(obj: &Value, keys: &[&str]) -> Option<String> {
    let raw = get_str(obj, keys)?;
    let decoded = match urlencoding::decode(&raw) {
        Ok(decoded) => decoded.trim().to_string(),
        Err(_) => raw
    };

    if decoded.is_empty() { None } else { Some(decoded) }
}

/// Splits `avc1.640028` into `("avc1", Some("640028"))`. `"none"` means the
/// stream carries no track of that kind.
pub(crate) fn split_codec(raw: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(raw) = raw.map(str::trim).filter(|c| !c.is_empty() && *c != "none") else {
        return (None, None);
    };

    match raw.split_once('.') {
        Some((codec, variant)) => (Some(codec.to_string()), Some(variant.to_string())),
        None => (Some(raw.to_string()), None)
    }
}
