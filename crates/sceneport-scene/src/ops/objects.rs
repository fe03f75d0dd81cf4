//! Object creation, inspection, modification and deletion.

use std::str::FromStr;

use glam::DVec3;
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::document::{Document, ObjectKind};
use crate::errors::SceneError;
use crate::geometry::Geometry;
use crate::params::{
    Params, flag, get, optional_attributes, optional_bool, optional_color, optional_list,
    optional_object, optional_str, optional_vector, require_str,
};
use crate::{shapes, views};

/// Rotation, scale and translation requested for an object.
#[derive(Debug, Default)]
struct Placement {
    rotation: Option<DVec3>,
    scale: Option<DVec3>,
    translation: Option<DVec3>,
}

impl Placement {
    fn from_params(params: &Params) -> Result<Self, SceneError> {
        Ok(Self {
            rotation: optional_vector(params, "rotation")?,
            scale: optional_vector(params, "scale")?,
            translation: optional_vector(params, "translation")?,
        })
    }

    fn apply(&self, geometry: &mut Geometry) {
        if let Some(angles) = self.rotation {
            geometry.rotate(angles);
        }
        if let Some(factors) = self.scale {
            geometry.scale(factors);
        }
        if let Some(offset) = self.translation {
            geometry.translate(offset);
        }
    }
}

pub(crate) fn resolve(document: &Document, params: &Params) -> Result<Uuid, SceneError> {
    document.resolve(optional_str(params, "id")?, optional_str(params, "name")?)
}

fn object_view(document: &Document, id: Uuid) -> Result<Value, SceneError> {
    document
        .object(id)
        .map(|object| views::object(document, object, true))
        .ok_or_else(|| SceneError::ObjectNotFound { id: id.to_string() })
}

fn create(document: &mut Document, params: &Params) -> Result<Value, SceneError> {
    let type_name = require_str(params, "type")?;
    let kind = ObjectKind::from_str(type_name).map_err(|_| SceneError::UnsupportedObjectType {
        kind: type_name.to_owned(),
    })?;
    let no_shape = Map::new();
    let shape = optional_object(params, "params")?.unwrap_or(&no_shape);
    let mut geometry = shapes::build(kind, shape)?;
    let name = optional_str(params, "name")?
        .filter(|name| !name.is_empty())
        .map(str::to_owned);
    let color = optional_color(params, "color")?;
    let attributes = optional_attributes(params, "attributes")?;
    Placement::from_params(params)?.apply(&mut geometry);

    let bbox = geometry.bounding_box();
    let id = document.add_object(kind, name.clone(), geometry);
    let layer = document.current_layer_id();
    if let Some(object) = document.object_mut(id) {
        if let Some(color) = color {
            object.color = color;
        }
        if let Some(attributes) = attributes {
            object.attributes = attributes;
        }
    }

    Ok(json!({
        "id": id.to_string(),
        "name": name.unwrap_or_default(),
        "type": kind.to_string(),
        "layer": document.layer_name(layer),
        "world_bounding_box": bbox.to_json(),
    }))
}

fn modify(document: &mut Document, params: &Params) -> Result<Uuid, SceneError> {
    let id = resolve(document, params)?;
    let new_name = optional_str(params, "new_name")?.map(str::to_owned);
    let new_color = optional_color(params, "new_color")?;
    let visible = optional_bool(params, "visible")?;
    let attributes = optional_attributes(params, "attributes")?;
    let placement = Placement::from_params(params)?;

    let object = document
        .object_mut(id)
        .ok_or_else(|| SceneError::ObjectNotFound { id: id.to_string() })?;
    if let Some(name) = new_name {
        object.name = Some(name).filter(|name| !name.is_empty());
    }
    if let Some(color) = new_color {
        object.color = color;
    }
    if let Some(visible) = visible {
        object.visible = visible;
    }
    if let Some(attributes) = attributes {
        object.attributes.extend(attributes);
    }
    placement.apply(&mut object.geometry);
    Ok(id)
}

/// Creates one object from a type name, shape parameters and an optional
/// placement.
///
/// # Errors
///
/// Fails for unknown types and missing or invalid parameters.
pub fn create_object(
    document: &mut Document,
    params: &Map<String, Value>,
) -> Result<Value, SceneError> {
    let result = create(document, params)?;
    document.touch();
    Ok(result)
}

/// Creates several objects. A failing entry is reported in place and does
/// not abort the rest.
///
/// # Errors
///
/// Fails only when `objects` is missing or not a list.
pub fn create_objects(
    document: &mut Document,
    params: &Map<String, Value>,
) -> Result<Value, SceneError> {
    let entries = optional_list(params, "objects")?.ok_or_else(|| SceneError::missing("objects"))?;
    let mut results = Map::new();
    let mut created = false;
    for (index, entry) in entries.iter().enumerate() {
        let key = entry
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .map_or_else(|| format!("object_{index}"), str::to_owned);
        let outcome = entry
            .as_object()
            .ok_or_else(|| SceneError::invalid("objects", "each entry must be an object"))
            .and_then(|entry| create(document, entry));
        let value = match outcome {
            Ok(result) => {
                created = true;
                result
            }
            Err(error) => json!({"error": error.to_string()}),
        };
        results.insert(key, value);
    }
    if created {
        document.touch();
    }
    Ok(Value::Object(results))
}

/// Describes a single object resolved by `id` or `name`.
///
/// # Errors
///
/// Fails when the object cannot be resolved.
pub fn get_object_info(
    document: &mut Document,
    params: &Map<String, Value>,
) -> Result<Value, SceneError> {
    let id = resolve(document, params)?;
    object_view(document, id)
}

/// Deletes one object, or every object when `all` is set.
///
/// # Errors
///
/// Fails when the object cannot be resolved.
pub fn delete_object(
    document: &mut Document,
    params: &Map<String, Value>,
) -> Result<Value, SceneError> {
    if flag(params, "all")? {
        let count = document.clear_objects();
        document.touch();
        return Ok(json!({"deleted": true, "count": count}));
    }

    let id = resolve(document, params)?;
    let removed = document
        .remove_object(id)
        .ok_or_else(|| SceneError::ObjectNotFound { id: id.to_string() })?;
    document.touch();
    Ok(json!({
        "id": id.to_string(),
        "name": removed.name,
        "deleted": true,
    }))
}

/// Renames, recolours, shows or hides, re-attributes and transforms one
/// object.
///
/// # Errors
///
/// Fails when the object cannot be resolved or a parameter is invalid. The
/// object is untouched on failure.
pub fn modify_object(
    document: &mut Document,
    params: &Map<String, Value>,
) -> Result<Value, SceneError> {
    let id = modify(document, params)?;
    document.touch();
    object_view(document, id)
}

/// Applies a batch of modifications. With `all` and a single entry, that
/// entry is applied to every object.
///
/// # Errors
///
/// Fails when any entry fails; no entry is applied in that case.
pub fn modify_objects(
    document: &mut Document,
    params: &Map<String, Value>,
) -> Result<Value, SceneError> {
    let entries = optional_list(params, "objects")?.ok_or_else(|| SceneError::missing("objects"))?;
    let entries = entries
        .iter()
        .map(|entry| {
            entry
                .as_object()
                .ok_or_else(|| SceneError::invalid("objects", "each entry must be an object"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let all = flag(params, "all")?;
    let mut staged = document.clone();
    let mut modified = 0_usize;
    match entries.as_slice() {
        [template] if all => {
            let ids: Vec<Uuid> = staged.objects().map(|object| object.id).collect();
            for id in ids {
                let mut entry = (*template).clone();
                entry.insert("id".to_owned(), json!(id.to_string()));
                modify(&mut staged, &entry)?;
                modified = modified.saturating_add(1);
            }
        }
        entries => {
            for entry in entries.iter().filter(|entry| get(entry, "id").is_some()) {
                modify(&mut staged, entry)?;
                modified = modified.saturating_add(1);
            }
        }
    }

    if modified > 0 {
        staged.touch();
        *document = staged;
    }
    Ok(json!({"modified": modified}))
}
