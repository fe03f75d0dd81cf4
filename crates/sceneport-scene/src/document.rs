//! The mutable scene document and its parts.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use strum::{Display, EnumString};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::errors::SceneError;
use crate::geometry::Geometry;

/// Name of the layer every document starts with.
pub const DEFAULT_LAYER_NAME: &str = "Default";

/// An 8-bit RGB colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Builds a colour from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Shapes `create_object` can build. Parsed case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ObjectKind {
    /// A single point.
    Point,
    /// A straight segment.
    Line,
    /// Connected straight segments.
    Polyline,
    /// A full circle in the XY plane.
    Circle,
    /// A circular arc in the XY plane.
    Arc,
    /// An axis-aligned ellipse in the XY plane.
    Ellipse,
    /// A control-point curve.
    Curve,
    /// An axis-aligned box.
    Box,
    /// A sphere.
    Sphere,
    /// A cone standing on the XY plane.
    Cone,
    /// A cylinder standing on the XY plane.
    Cylinder,
    /// A control-point surface.
    Surface,
}

/// Document-level metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMeta {
    /// Document name.
    pub name: String,
    /// Creation time.
    pub created: OffsetDateTime,
    /// Time of the last mutation.
    pub modified: OffsetDateTime,
    /// Absolute model tolerance.
    pub tolerance: f64,
    /// Angle tolerance in degrees.
    pub angle_tolerance: f64,
    /// Model unit system.
    pub units: String,
}

/// A named layer objects live on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    /// Stable identifier.
    pub id: Uuid,
    /// Unique display name.
    pub name: String,
    /// Display colour.
    pub color: Rgb,
    /// Whether objects on the layer are drawn.
    pub visible: bool,
    /// Whether objects on the layer can be edited interactively.
    pub locked: bool,
    /// Parent layer, if nested.
    pub parent: Option<Uuid>,
}

impl Layer {
    /// Creates a visible, unlocked top-level layer.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color: Rgb::default(),
            visible: true,
            locked: false,
            parent: None,
        }
    }
}

/// An object in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// Stable identifier.
    pub id: Uuid,
    /// Optional user-facing name. Names need not be unique.
    pub name: Option<String>,
    /// Shape the object was created as.
    pub kind: ObjectKind,
    /// Owning layer.
    pub layer: Uuid,
    /// Display colour.
    pub color: Rgb,
    /// Visibility flag.
    pub visible: bool,
    /// Selection flag.
    pub selected: bool,
    /// User string attributes.
    pub attributes: BTreeMap<String, String>,
    /// World-space geometry.
    pub geometry: Geometry,
}

/// The single mutable document operations run against.
///
/// Objects keep insertion order. The document always holds at least one
/// layer, and the current layer always exists.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    meta: DocumentMeta,
    revision: u64,
    objects: IndexMap<Uuid, SceneObject>,
    layers: IndexMap<Uuid, Layer>,
    current_layer: Uuid,
}

impl Default for Document {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl Document {
    /// Creates an empty document with a single default layer.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = OffsetDateTime::now_utc();
        let layer = Layer::new(DEFAULT_LAYER_NAME);
        let current_layer = layer.id;
        Self {
            meta: DocumentMeta {
                name: name.into(),
                created: now,
                modified: now,
                tolerance: 0.001,
                angle_tolerance: 1.0,
                units: "Millimeters".to_owned(),
            },
            revision: 0,
            objects: IndexMap::new(),
            layers: IndexMap::from([(layer.id, layer)]),
            current_layer,
        }
    }

    /// Document metadata.
    #[must_use]
    pub const fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    /// Number of committed mutations.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Records one mutation.
    pub fn touch(&mut self) {
        self.revision = self.revision.saturating_add(1);
        self.meta.modified = OffsetDateTime::now_utc();
    }

    pub(crate) const fn set_revision(&mut self, revision: u64) {
        self.revision = revision;
    }

    /// Objects in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.values()
    }

    /// Mutable objects in insertion order.
    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut SceneObject> {
        self.objects.values_mut()
    }

    /// Number of objects.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Looks up an object by id.
    #[must_use]
    pub fn object(&self, id: Uuid) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    /// Looks up an object by id for mutation.
    pub fn object_mut(&mut self, id: Uuid) -> Option<&mut SceneObject> {
        self.objects.get_mut(&id)
    }

    /// Adds an object on the current layer and returns its id.
    pub fn add_object(
        &mut self,
        kind: ObjectKind,
        name: Option<String>,
        geometry: Geometry,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let object = SceneObject {
            id,
            name,
            kind,
            layer: self.current_layer,
            color: Rgb::default(),
            visible: true,
            selected: false,
            attributes: BTreeMap::new(),
            geometry,
        };
        self.objects.insert(id, object);
        id
    }

    /// Removes an object, preserving the order of the rest.
    pub fn remove_object(&mut self, id: Uuid) -> Option<SceneObject> {
        self.objects.shift_remove(&id)
    }

    /// Removes every object and returns how many there were.
    pub fn clear_objects(&mut self) -> usize {
        let count = self.objects.len();
        self.objects.clear();
        count
    }

    /// Resolves an object by id when given, otherwise by unique name.
    ///
    /// # Errors
    ///
    /// Fails when the id is unknown, the name matches zero or several
    /// objects, or neither identifier is supplied.
    pub fn resolve(&self, id: Option<&str>, name: Option<&str>) -> Result<Uuid, SceneError> {
        if let Some(id) = id.filter(|id| !id.is_empty()) {
            return Uuid::parse_str(id)
                .ok()
                .filter(|parsed| self.objects.contains_key(parsed))
                .ok_or_else(|| SceneError::ObjectNotFound { id: id.to_owned() });
        }

        let Some(name) = name.filter(|name| !name.is_empty()) else {
            return Err(SceneError::MissingIdentifier);
        };
        let mut matches = self
            .objects
            .values()
            .filter(|object| object.name.as_deref() == Some(name));
        match (matches.next(), matches.next()) {
            (Some(object), None) => Ok(object.id),
            (None, _) => Err(SceneError::ObjectNameNotFound {
                name: name.to_owned(),
            }),
            (Some(_), Some(_)) => Err(SceneError::AmbiguousName {
                name: name.to_owned(),
            }),
        }
    }

    /// Layers in creation order.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.values()
    }

    /// Number of layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Looks up a layer by id.
    #[must_use]
    pub fn layer(&self, id: Uuid) -> Option<&Layer> {
        self.layers.get(&id)
    }

    /// Looks up a layer by exact name.
    #[must_use]
    pub fn layer_by_name(&self, name: &str) -> Option<&Layer> {
        self.layers.values().find(|layer| layer.name == name)
    }

    /// Name of a layer, or an empty string for an unknown id.
    #[must_use]
    pub fn layer_name(&self, id: Uuid) -> &str {
        self.layer(id).map_or("", |layer| layer.name.as_str())
    }

    /// Identifier of the layer new objects are placed on.
    #[must_use]
    pub const fn current_layer_id(&self) -> Uuid {
        self.current_layer
    }

    /// Makes a known layer current. Returns false for unknown ids.
    pub fn set_current_layer(&mut self, id: Uuid) -> bool {
        if self.layers.contains_key(&id) {
            self.current_layer = id;
            true
        } else {
            false
        }
    }

    /// Adds a layer.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::LayerExists`] when the name is taken.
    pub fn add_layer(&mut self, layer: Layer) -> Result<Uuid, SceneError> {
        if self.layer_by_name(&layer.name).is_some() {
            return Err(SceneError::LayerExists { name: layer.name });
        }
        let id = layer.id;
        self.layers.insert(id, layer);
        Ok(id)
    }

    /// Removes a layer together with its objects. Child layers move up to
    /// the removed layer's parent.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::LayerInUse`] for the current layer, which also
    /// protects the last remaining layer.
    pub fn remove_layer(&mut self, id: Uuid) -> Result<Option<Layer>, SceneError> {
        let Some(layer) = self.layers.get(&id) else {
            return Ok(None);
        };
        if id == self.current_layer {
            return Err(SceneError::LayerInUse {
                name: layer.name.clone(),
            });
        }
        let removed = self.layers.shift_remove(&id);
        let new_parent = removed.as_ref().and_then(|layer| layer.parent);
        for child in self.layers.values_mut() {
            if child.parent == Some(id) {
                child.parent = new_parent;
            }
        }
        self.objects.retain(|_, object| object.layer != id);
        Ok(removed)
    }
}
