//! Typed accessors over JSON parameter maps.
//!
//! A `null` value is treated the same as an absent key throughout.

use std::collections::BTreeMap;

use glam::DVec3;
use serde_json::{Map, Value};

use crate::document::Rgb;
use crate::errors::SceneError;

pub(crate) type Params = Map<String, Value>;

pub(crate) fn get<'a>(params: &'a Params, key: &str) -> Option<&'a Value> {
    params.get(key).filter(|value| !value.is_null())
}

pub(crate) fn require<'a>(params: &'a Params, key: &str) -> Result<&'a Value, SceneError> {
    get(params, key).ok_or_else(|| SceneError::missing(key))
}

pub(crate) fn optional_str<'a>(
    params: &'a Params,
    key: &str,
) -> Result<Option<&'a str>, SceneError> {
    get(params, key)
        .map(|value| {
            value
                .as_str()
                .ok_or_else(|| SceneError::invalid(key, "expected a string"))
        })
        .transpose()
}

pub(crate) fn require_str<'a>(params: &'a Params, key: &str) -> Result<&'a str, SceneError> {
    optional_str(params, key)?.ok_or_else(|| SceneError::missing(key))
}

pub(crate) fn optional_bool(params: &Params, key: &str) -> Result<Option<bool>, SceneError> {
    get(params, key)
        .map(|value| {
            value
                .as_bool()
                .ok_or_else(|| SceneError::invalid(key, "expected a boolean"))
        })
        .transpose()
}

pub(crate) fn flag(params: &Params, key: &str) -> Result<bool, SceneError> {
    Ok(optional_bool(params, key)?.unwrap_or(false))
}

pub(crate) fn optional_number(params: &Params, key: &str) -> Result<Option<f64>, SceneError> {
    get(params, key).map(|value| number(value, key)).transpose()
}

pub(crate) fn require_number(params: &Params, key: &str) -> Result<f64, SceneError> {
    number(require(params, key)?, key)
}

pub(crate) fn require_positive(params: &Params, key: &str) -> Result<f64, SceneError> {
    let value = require_number(params, key)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(SceneError::invalid(key, "must be greater than zero"))
    }
}

fn number(value: &Value, key: &str) -> Result<f64, SceneError> {
    value
        .as_f64()
        .filter(|number| number.is_finite())
        .ok_or_else(|| SceneError::invalid(key, "expected a finite number"))
}

pub(crate) fn optional_count(params: &Params, key: &str) -> Result<Option<u64>, SceneError> {
    get(params, key)
        .map(|value| {
            value
                .as_u64()
                .ok_or_else(|| SceneError::invalid(key, "expected a non-negative integer"))
        })
        .transpose()
}

/// Reads an `[x, y, z]` triple.
pub(crate) fn vector(value: &Value, key: &str) -> Result<DVec3, SceneError> {
    match value.as_array().map(Vec::as_slice) {
        Some([x, y, z]) => Ok(DVec3::new(number(x, key)?, number(y, key)?, number(z, key)?)),
        _ => Err(SceneError::invalid(key, "expected [x, y, z]")),
    }
}

pub(crate) fn optional_vector(params: &Params, key: &str) -> Result<Option<DVec3>, SceneError> {
    get(params, key).map(|value| vector(value, key)).transpose()
}

pub(crate) fn require_vector(params: &Params, key: &str) -> Result<DVec3, SceneError> {
    vector(require(params, key)?, key)
}

/// Reads a list of `[x, y, z]` triples with at least `min` entries.
pub(crate) fn require_points(
    params: &Params,
    key: &str,
    min: usize,
) -> Result<Vec<DVec3>, SceneError> {
    let points = require(params, key)?
        .as_array()
        .ok_or_else(|| SceneError::invalid(key, "expected a list of [x, y, z] points"))?
        .iter()
        .map(|value| vector(value, key))
        .collect::<Result<Vec<_>, _>>()?;
    if points.len() < min {
        return Err(SceneError::invalid(
            key,
            format!("expected at least {min} points"),
        ));
    }
    Ok(points)
}

/// Reads an `[r, g, b]` colour with channels in `0..=255`.
pub(crate) fn color(value: &Value, key: &str) -> Result<Rgb, SceneError> {
    let channel = |value: &Value| {
        value
            .as_u64()
            .and_then(|channel| u8::try_from(channel).ok())
            .ok_or_else(|| SceneError::invalid(key, "colour channels must be integers in 0..=255"))
    };
    match value.as_array().map(Vec::as_slice) {
        Some([r, g, b]) => Ok(Rgb::new(channel(r)?, channel(g)?, channel(b)?)),
        _ => Err(SceneError::invalid(key, "expected [r, g, b]")),
    }
}

pub(crate) fn optional_color(params: &Params, key: &str) -> Result<Option<Rgb>, SceneError> {
    get(params, key).map(|value| color(value, key)).transpose()
}

/// Renders a scalar as the string stored in user attributes.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Reads a map of scalar user attributes.
pub(crate) fn optional_attributes(
    params: &Params,
    key: &str,
) -> Result<Option<BTreeMap<String, String>>, SceneError> {
    let Some(value) = get(params, key) else {
        return Ok(None);
    };
    let object = value
        .as_object()
        .ok_or_else(|| SceneError::invalid(key, "expected an object of strings"))?;
    object
        .iter()
        .map(|(name, value)| {
            scalar_text(value)
                .map(|text| (name.clone(), text))
                .ok_or_else(|| {
                    SceneError::invalid(key, format!("attribute '{name}' must be a scalar"))
                })
        })
        .collect::<Result<BTreeMap<_, _>, _>>()
        .map(Some)
}

pub(crate) fn optional_object<'a>(
    params: &'a Params,
    key: &str,
) -> Result<Option<&'a Params>, SceneError> {
    get(params, key)
        .map(|value| {
            value
                .as_object()
                .ok_or_else(|| SceneError::invalid(key, "expected an object"))
        })
        .transpose()
}

pub(crate) fn optional_list<'a>(
    params: &'a Params,
    key: &str,
) -> Result<Option<&'a [Value]>, SceneError> {
    get(params, key)
        .map(|value| {
            value
                .as_array()
                .map(Vec::as_slice)
                .ok_or_else(|| SceneError::invalid(key, "expected a list"))
        })
        .transpose()
}
