//! JSON renderings of document parts returned to clients.

use serde_json::{Map, Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::document::{Document, Layer, Rgb, SceneObject};

/// Display name used for objects without a name.
pub(crate) const UNNAMED: &str = "(unnamed)";

pub(crate) fn color(color: Rgb) -> Value {
    json!({"r": color.r, "g": color.g, "b": color.b})
}

pub(crate) fn timestamp(moment: OffsetDateTime) -> Value {
    moment.format(&Rfc3339).map_or(Value::Null, Value::String)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Serializes an object. Attributes are optional because listings omit them.
pub(crate) fn object(document: &Document, object: &SceneObject, include_attributes: bool) -> Value {
    let bbox = object.geometry.bounding_box();
    let center = bbox.center();
    let mut view = Map::new();
    view.insert("id".to_owned(), json!(object.id.to_string()));
    view.insert(
        "name".to_owned(),
        json!(object.name.as_deref().unwrap_or(UNNAMED)),
    );
    view.insert("type".to_owned(), json!(object.kind.to_string()));
    view.insert("layer".to_owned(), json!(document.layer_name(object.layer)));
    view.insert("color".to_owned(), color(object.color));
    view.insert("visible".to_owned(), json!(object.visible));
    view.insert(
        "location".to_owned(),
        json!([round2(center.x), round2(center.y), round2(center.z)]),
    );
    view.insert("bounding_box".to_owned(), bbox.to_json());
    if include_attributes {
        view.insert("attributes".to_owned(), json!(object.attributes));
    }
    Value::Object(view)
}

pub(crate) fn layer(document: &Document, layer: &Layer) -> Value {
    let parent = layer
        .parent
        .and_then(|parent| document.layer(parent))
        .map(|parent| parent.name.clone());
    json!({
        "id": layer.id.to_string(),
        "name": layer.name,
        "color": color(layer.color),
        "visible": layer.visible,
        "locked": layer.locked,
        "parent": parent,
    })
}

pub(crate) fn current_layer(document: &Document) -> Value {
    document
        .layer(document.current_layer_id())
        .map_or(Value::Null, |current| layer(document, current))
}
