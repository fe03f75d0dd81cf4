//! Layer management.

use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::document::{Document, Layer};
use crate::errors::SceneError;
use crate::params::{Params, optional_color, optional_str};
use crate::views;

/// Finds a layer by `guid` (preferred) or `name`.
fn find_layer(document: &Document, params: &Params) -> Result<Option<Uuid>, SceneError> {
    if let Some(guid) = optional_str(params, "guid")? {
        return Ok(Uuid::parse_str(guid)
            .ok()
            .filter(|id| document.layer(*id).is_some()));
    }
    Ok(optional_str(params, "name")?
        .and_then(|name| document.layer_by_name(name))
        .map(|layer| layer.id))
}

fn next_layer_name(document: &Document) -> String {
    (1_u32..)
        .map(|index| format!("Layer {index:02}"))
        .find(|candidate| document.layer_by_name(candidate).is_none())
        .unwrap_or_else(|| format!("Layer {}", Uuid::new_v4()))
}

/// Adds a layer, optionally nested under an existing parent.
///
/// # Errors
///
/// Fails for a duplicate name, an unknown parent or a malformed colour.
pub fn create_layer(
    document: &mut Document,
    params: &Map<String, Value>,
) -> Result<Value, SceneError> {
    let name = match optional_str(params, "name")?.filter(|name| !name.is_empty()) {
        Some(name) => name.to_owned(),
        None => next_layer_name(document),
    };
    let mut layer = Layer::new(name);
    if let Some(color) = optional_color(params, "color")? {
        layer.color = color;
    }
    if let Some(parent) = optional_str(params, "parent")? {
        let parent = document
            .layer_by_name(parent)
            .ok_or_else(|| SceneError::invalid("parent", format!("no layer named {parent}")))?;
        layer.parent = Some(parent.id);
    }

    let id = document.add_layer(layer)?;
    document.touch();
    Ok(document
        .layer(id)
        .map_or(Value::Null, |layer| views::layer(document, layer)))
}

/// Deletes a layer and the objects on it.
///
/// An unknown layer is reported in the result rather than as an error.
///
/// # Errors
///
/// Fails when the layer is current (which includes the last layer).
pub fn delete_layer(
    document: &mut Document,
    params: &Map<String, Value>,
) -> Result<Value, SceneError> {
    let removed = match find_layer(document, params)? {
        Some(id) => document.remove_layer(id)?,
        None => None,
    };
    let Some(layer) = removed else {
        return Ok(json!({"success": false, "message": "Layer not found"}));
    };
    document.touch();
    Ok(json!({
        "success": true,
        "message": format!("Layer {} deleted", layer.name),
    }))
}

/// Makes the named layer current when it exists, then reports the current
/// layer.
///
/// # Errors
///
/// Fails only for non-string identifiers.
pub fn get_or_set_current_layer(
    document: &mut Document,
    params: &Map<String, Value>,
) -> Result<Value, SceneError> {
    if let Some(id) = find_layer(document, params)?
        && id != document.current_layer_id()
        && document.set_current_layer(id)
    {
        document.touch();
    }
    Ok(views::current_layer(document))
}
