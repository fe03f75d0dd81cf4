use serde_json::{Map, Value, json};

use crate::document::Document;
use crate::errors::SceneError;
use crate::views;

/// Maximum number of objects and layers listed in a document summary.
const LISTING_LIMIT: usize = 30;

/// Summarizes the document: metadata plus the first objects and layers.
///
/// # Errors
///
/// Never fails; the signature matches the catalog.
pub fn get_document_info(
    document: &mut Document,
    _params: &Map<String, Value>,
) -> Result<Value, SceneError> {
    let document = &*document;
    let meta = document.meta();
    let objects: Vec<Value> = document
        .objects()
        .take(LISTING_LIMIT)
        .map(|object| views::object(document, object, false))
        .collect();
    let layers: Vec<Value> = document
        .layers()
        .take(LISTING_LIMIT)
        .map(|layer| views::layer(document, layer))
        .collect();

    Ok(json!({
        "meta_data": {
            "name": meta.name,
            "date_created": views::timestamp(meta.created),
            "date_modified": views::timestamp(meta.modified),
            "tolerance": meta.tolerance,
            "angle_tolerance": meta.angle_tolerance,
            "units": meta.units,
            "revision": document.revision(),
        },
        "object_count": document.object_count(),
        "objects": objects,
        "layer_count": document.layer_count(),
        "layers": layers,
    }))
}
