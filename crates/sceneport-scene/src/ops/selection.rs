//! Filter-based selection.

use serde_json::{Map, Value, json};

use crate::document::{Document, Rgb, SceneObject};
use crate::errors::SceneError;
use crate::params::{Params, color, flag, optional_object, optional_str, scalar_text};
use crate::views;

#[derive(Debug)]
enum Filter {
    Name(Vec<String>),
    Color(Vec<Rgb>),
    Attribute { key: String, values: Vec<String> },
}

impl Filter {
    fn parse(key: &str, value: &Value) -> Result<Self, SceneError> {
        match key {
            "name" => Ok(Self::Name(texts(key, value)?)),
            "color" => {
                let single = value
                    .as_array()
                    .and_then(|channels| channels.first())
                    .is_some_and(Value::is_number);
                let colors = if single {
                    vec![color(value, key)?]
                } else {
                    candidates(value)
                        .map(|candidate| color(candidate, key))
                        .collect::<Result<_, _>>()?
                };
                Ok(Self::Color(colors))
            }
            _ => Ok(Self::Attribute {
                key: key.to_owned(),
                values: texts(key, value)?,
            }),
        }
    }

    fn matches(&self, object: &SceneObject) -> bool {
        match self {
            Self::Name(names) => object
                .name
                .as_deref()
                .is_some_and(|name| names.iter().any(|candidate| candidate == name)),
            Self::Color(colors) => colors.contains(&object.color),
            Self::Attribute { key, values } => object
                .attributes
                .get(key)
                .is_some_and(|actual| values.iter().any(|candidate| candidate == actual)),
        }
    }
}

fn candidates(value: &Value) -> impl Iterator<Item = &Value> {
    match value {
        Value::Array(items) => items.iter(),
        other => std::slice::from_ref(other).iter(),
    }
}

fn texts(key: &str, value: &Value) -> Result<Vec<String>, SceneError> {
    candidates(value)
        .map(|candidate| {
            scalar_text(candidate)
                .ok_or_else(|| SceneError::invalid(key, "filter values must be scalars"))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combine {
    All,
    Any,
}

fn combine(params: &Params) -> Result<Combine, SceneError> {
    match optional_str(params, "filters_type")? {
        None | Some("and") => Ok(Combine::All),
        Some("or") => Ok(Combine::Any),
        Some(other) => Err(SceneError::invalid(
            "filters_type",
            format!("expected 'and' or 'or', got '{other}'"),
        )),
    }
}

/// Replaces the selection with the objects matching `filters`.
///
/// Each filter maps `name`, `color` or a user attribute key to the accepted
/// values. `filters_type` chooses whether every filter (`and`, the default)
/// or any filter (`or`) must match. No filters selects everything.
///
/// # Errors
///
/// Fails when a filter or `filters_type` is malformed.
pub fn select_objects(
    document: &mut Document,
    params: &Map<String, Value>,
) -> Result<Value, SceneError> {
    let no_filters = Map::new();
    let filters = optional_object(params, "filters")?
        .unwrap_or(&no_filters)
        .iter()
        .map(|(key, value)| Filter::parse(key, value))
        .collect::<Result<Vec<_>, _>>()?;
    let mode = combine(params)?;

    let mut count = 0_usize;
    for object in document.objects_mut() {
        let selected = filters.is_empty()
            || match mode {
                Combine::All => filters.iter().all(|filter| filter.matches(object)),
                Combine::Any => filters.iter().any(|filter| filter.matches(object)),
            };
        object.selected = selected;
        if selected {
            count = count.saturating_add(1);
        }
    }
    document.touch();
    Ok(json!({"count": count}))
}

/// Describes every selected object.
///
/// # Errors
///
/// Fails when `include_attributes` is not a boolean.
pub fn get_selected_objects_info(
    document: &mut Document,
    params: &Map<String, Value>,
) -> Result<Value, SceneError> {
    let include_attributes = flag(params, "include_attributes")?;
    let document = &*document;
    let selected: Vec<Value> = document
        .objects()
        .filter(|object| object.selected)
        .map(|object| views::object(document, object, include_attributes))
        .collect();
    Ok(json!({"selected_objects": selected}))
}
