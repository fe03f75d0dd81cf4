//! The operation catalog.
//!
//! Every operation takes the document and the command's parameter map and
//! returns a JSON result. Operations that mutate the document bump its
//! revision exactly once.

mod document_info;
mod layers;
mod objects;
mod script;
mod selection;

use serde_json::{Map, Value};

use crate::document::Document;
use crate::errors::SceneError;

pub use document_info::get_document_info;
pub use layers::{create_layer, delete_layer, get_or_set_current_layer};
pub use objects::{
    create_object, create_objects, delete_object, get_object_info, modify_object, modify_objects,
};
pub use script::execute_script;
pub use selection::{get_selected_objects_info, select_objects};

/// Signature shared by every catalog operation.
pub type OperationFn = fn(&mut Document, &Map<String, Value>) -> Result<Value, SceneError>;

const CATALOG: &[(&str, OperationFn)] = &[
    ("get_document_info", get_document_info),
    ("create_object", create_object),
    ("create_objects", create_objects),
    ("get_object_info", get_object_info),
    ("get_selected_objects_info", get_selected_objects_info),
    ("delete_object", delete_object),
    ("modify_object", modify_object),
    ("modify_objects", modify_objects),
    ("select_objects", select_objects),
    ("execute_script", execute_script),
    ("create_layer", create_layer),
    ("delete_layer", delete_layer),
    ("get_or_set_current_layer", get_or_set_current_layer),
];

/// Every operation name paired with its implementation.
#[must_use]
pub fn catalog() -> &'static [(&'static str, OperationFn)] {
    CATALOG
}

/// Looks up a catalog operation by exact name.
#[must_use]
pub fn lookup(name: &str) -> Option<OperationFn> {
    CATALOG
        .iter()
        .find_map(|(candidate, operation)| (*candidate == name).then_some(*operation))
}
