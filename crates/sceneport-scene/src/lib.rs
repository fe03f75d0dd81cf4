//! In-memory 3D scene document and the operations clients run against it.
//!
//! The [`Document`] is plain data with no interior locking; whoever owns it
//! serializes access. [`catalog`] lists every operation by its wire name so a
//! server can register the whole set at once.

mod document;
mod errors;
mod geometry;
mod ops;
mod params;
mod shapes;
mod views;

pub use document::{
    DEFAULT_LAYER_NAME, Document, DocumentMeta, Layer, ObjectKind, Rgb, SceneObject,
};
pub use errors::SceneError;
pub use geometry::{BoundingBox, Geometry};
pub use ops::{
    OperationFn, catalog, create_layer, create_object, create_objects, delete_layer,
    delete_object, execute_script, get_document_info, get_object_info,
    get_or_set_current_layer, get_selected_objects_info, lookup, modify_object, modify_objects,
    select_objects,
};
