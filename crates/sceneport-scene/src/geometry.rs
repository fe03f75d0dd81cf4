//! World-space geometry held by scene objects.
//!
//! Every object keeps the points that define it: control points for open
//! shapes and a sampled hull for round ones. Bounding boxes and transforms
//! operate on those points, which keeps all shapes on one code path.

use glam::{DAffine3, DMat3, DVec3};
use serde_json::{Value, json};

/// Axis-aligned bounding box in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: DVec3,
    /// Maximum corner.
    pub max: DVec3,
}

impl BoundingBox {
    /// Smallest box containing every point, or `None` for no points.
    #[must_use]
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a DVec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        Some(points.fold(
            Self {
                min: first,
                max: first,
            },
            |bbox, point| Self {
                min: bbox.min.min(*point),
                max: bbox.max.max(*point),
            },
        ))
    }

    /// Centre of the box.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// `[[min], [max]]` as sent to clients.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!([
            [self.min.x, self.min.y, self.min.z],
            [self.max.x, self.max.y, self.max.z]
        ])
    }
}

/// Defining points of an object in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    points: Vec<DVec3>,
}

impl Geometry {
    /// Wraps a set of world-space points.
    #[must_use]
    pub const fn from_points(points: Vec<DVec3>) -> Self {
        Self { points }
    }

    /// Defining points.
    #[must_use]
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Bounding box of the defining points. Empty geometry collapses to the
    /// origin.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points).unwrap_or(BoundingBox {
            min: DVec3::ZERO,
            max: DVec3::ZERO,
        })
    }

    /// Applies an affine transform to every point.
    pub fn transform(&mut self, transform: &DAffine3) {
        for point in &mut self.points {
            *point = transform.transform_point3(*point);
        }
    }

    /// Rotates by `angles` (radians) about the bounding-box centre, X first,
    /// then Y, then Z.
    pub fn rotate(&mut self, angles: DVec3) {
        let center = self.bounding_box().center();
        let rotation = DMat3::from_rotation_z(angles.z)
            * DMat3::from_rotation_y(angles.y)
            * DMat3::from_rotation_x(angles.x);
        self.transform(&about(center, DAffine3::from_mat3(rotation)));
    }

    /// Scales per axis with the bounding-box minimum held fixed.
    pub fn scale(&mut self, factors: DVec3) {
        let anchor = self.bounding_box().min;
        self.transform(&about(anchor, DAffine3::from_scale(factors)));
    }

    /// Moves every point by `offset`.
    pub fn translate(&mut self, offset: DVec3) {
        self.transform(&DAffine3::from_translation(offset));
    }
}

fn about(pivot: DVec3, transform: DAffine3) -> DAffine3 {
    DAffine3::from_translation(pivot) * transform * DAffine3::from_translation(-pivot)
}
