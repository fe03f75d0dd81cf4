//! Builders that turn `create_object` parameters into geometry.
//!
//! Round shapes are sampled at fixed resolution. Samples include the
//! cardinal directions so bounding boxes of circles and spheres are exact.
//!
//! A few parameters only shape a rendered surface and have no effect on the
//! sampled points: `cap` on cones and cylinders, and `degree` and `closed` on
//! surfaces. They are type-checked so malformed requests still fail, then
//! ignored. Curve `degree` is checked to be at least 1 and likewise does not
//! change the control points.

use std::f64::consts::TAU;

use glam::DVec3;

use crate::document::ObjectKind;
use crate::errors::SceneError;
use crate::geometry::Geometry;
use crate::params::{
    Params, flag, get, optional_count, optional_list, optional_number, require_number,
    require_points, require_positive, require_vector,
};

const RIM_SEGMENTS: u32 = 32;
const ARC_SEGMENTS: u32 = 16;
const LATITUDE_BANDS: u32 = 8;

/// Builds the world-space geometry for `kind` from its shape parameters.
pub(crate) fn build(kind: ObjectKind, params: &Params) -> Result<Geometry, SceneError> {
    let points = match kind {
        ObjectKind::Point => vec![DVec3::new(
            optional_number(params, "x")?.unwrap_or_default(),
            optional_number(params, "y")?.unwrap_or_default(),
            optional_number(params, "z")?.unwrap_or_default(),
        )],
        ObjectKind::Line => vec![
            require_vector(params, "start")?,
            require_vector(params, "end")?,
        ],
        ObjectKind::Polyline => require_points(params, "points", 2)?,
        ObjectKind::Curve => curve(params)?,
        ObjectKind::Circle => {
            let radius = require_positive(params, "radius")?;
            ring(
                require_vector(params, "center")?,
                radius,
                radius,
                0.0,
                RIM_SEGMENTS,
            )
        }
        ObjectKind::Ellipse => ring(
            require_vector(params, "center")?,
            require_positive(params, "radius_x")?,
            require_positive(params, "radius_y")?,
            0.0,
            RIM_SEGMENTS,
        ),
        ObjectKind::Arc => arc(params)?,
        ObjectKind::Box => cuboid(
            require_positive(params, "width")?,
            require_positive(params, "length")?,
            require_positive(params, "height")?,
        ),
        ObjectKind::Sphere => sphere(require_positive(params, "radius")?),
        ObjectKind::Cone => cone(params)?,
        ObjectKind::Cylinder => cylinder(params)?,
        ObjectKind::Surface => surface(params)?,
    };
    Ok(Geometry::from_points(points))
}

fn curve(params: &Params) -> Result<Vec<DVec3>, SceneError> {
    let degree = optional_count(params, "degree")?.unwrap_or(3);
    if degree == 0 {
        return Err(SceneError::invalid("degree", "must be at least 1"));
    }
    require_points(params, "points", 2)
}

fn arc(params: &Params) -> Result<Vec<DVec3>, SceneError> {
    let center = require_vector(params, "center")?;
    let radius = require_positive(params, "radius")?;
    let sweep = require_number(params, "angle")?.to_radians();
    if sweep == 0.0 || sweep.abs() > TAU {
        return Err(SceneError::invalid(
            "angle",
            "must be non-zero and within 360 degrees",
        ));
    }
    Ok((0..=ARC_SEGMENTS)
        .map(|step| {
            let angle = sweep * f64::from(step) / f64::from(ARC_SEGMENTS);
            center + DVec3::new(radius * angle.cos(), radius * angle.sin(), 0.0)
        })
        .collect())
}

fn ring(center: DVec3, radius_x: f64, radius_y: f64, z: f64, segments: u32) -> Vec<DVec3> {
    (0..segments)
        .map(|step| {
            let angle = TAU * f64::from(step) / f64::from(segments);
            center + DVec3::new(radius_x * angle.cos(), radius_y * angle.sin(), z)
        })
        .collect()
}

fn cuboid(width: f64, length: f64, height: f64) -> Vec<DVec3> {
    let half = DVec3::new(width, length, height) * 0.5;
    let mut corners = Vec::with_capacity(8);
    for x in [-half.x, half.x] {
        for y in [-half.y, half.y] {
            for z in [-half.z, half.z] {
                corners.push(DVec3::new(x, y, z));
            }
        }
    }
    corners
}

fn sphere(radius: f64) -> Vec<DVec3> {
    let mut points = vec![DVec3::new(0.0, 0.0, -radius), DVec3::new(0.0, 0.0, radius)];
    for band in 1..LATITUDE_BANDS {
        let latitude = TAU * 0.5 * (f64::from(band) / f64::from(LATITUDE_BANDS) - 0.5);
        let ring_radius = radius * latitude.cos();
        points.extend(ring(
            DVec3::ZERO,
            ring_radius,
            ring_radius,
            radius * latitude.sin(),
            RIM_SEGMENTS,
        ));
    }
    points
}

fn cone(params: &Params) -> Result<Vec<DVec3>, SceneError> {
    let radius = require_positive(params, "radius")?;
    let height = require_positive(params, "height")?;
    flag(params, "cap")?;
    let mut points = ring(DVec3::ZERO, radius, radius, 0.0, RIM_SEGMENTS);
    points.push(DVec3::new(0.0, 0.0, height));
    Ok(points)
}

fn cylinder(params: &Params) -> Result<Vec<DVec3>, SceneError> {
    let radius = require_positive(params, "radius")?;
    let height = require_positive(params, "height")?;
    flag(params, "cap")?;
    let mut points = ring(DVec3::ZERO, radius, radius, 0.0, RIM_SEGMENTS);
    points.extend(ring(DVec3::ZERO, radius, radius, height, RIM_SEGMENTS));
    Ok(points)
}

fn surface(params: &Params) -> Result<Vec<DVec3>, SceneError> {
    let count = get(params, "count").ok_or_else(|| SceneError::missing("count"))?;
    let (u, v) = match count.as_array().map(Vec::as_slice) {
        Some([u, v]) => (u.as_u64(), v.as_u64()),
        _ => (None, None),
    };
    let (Some(u), Some(v)) = (u, v) else {
        return Err(SceneError::invalid("count", "expected [u, v] point counts"));
    };
    if u < 2 || v < 2 {
        return Err(SceneError::invalid("count", "each direction needs at least 2 points"));
    }
    let points = require_points(params, "points", 4)?;
    let expected = usize::try_from(u.saturating_mul(v)).unwrap_or(usize::MAX);
    if points.len() != expected {
        return Err(SceneError::invalid(
            "points",
            format!("expected {expected} points for a {u}x{v} surface"),
        ));
    }
    optional_list(params, "degree")?;
    optional_list(params, "closed")?;
    Ok(points)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;

    fn params(value: Value) -> Params {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn bbox_of(kind: ObjectKind, value: Value) -> (DVec3, DVec3) {
        let bbox = build(kind, &params(value))
            .expect("build geometry")
            .bounding_box();
        (bbox.min, bbox.max)
    }

    #[test]
    fn sphere_bounds_match_radius() {
        let (min, max) = bbox_of(ObjectKind::Sphere, json!({"radius": 5}));
        assert!(min.abs_diff_eq(DVec3::splat(-5.0), 1e-9));
        assert!(max.abs_diff_eq(DVec3::splat(5.0), 1e-9));
    }

    #[test]
    fn circle_bounds_surround_centre() {
        let (min, max) = bbox_of(
            ObjectKind::Circle,
            json!({"center": [1, 1, 0], "radius": 2}),
        );
        assert!(min.abs_diff_eq(DVec3::new(-1.0, -1.0, 0.0), 1e-9));
        assert!(max.abs_diff_eq(DVec3::new(3.0, 3.0, 0.0), 1e-9));
    }

    #[test]
    fn box_is_centred_on_origin() {
        let (min, max) = bbox_of(
            ObjectKind::Box,
            json!({"width": 2, "length": 4, "height": 6}),
        );
        assert_eq!(min, DVec3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn cone_rises_from_base_to_apex() {
        let (min, max) = bbox_of(ObjectKind::Cone, json!({"radius": 1, "height": 3}));
        assert!(min.abs_diff_eq(DVec3::new(-1.0, -1.0, 0.0), 1e-9));
        assert!(max.abs_diff_eq(DVec3::new(1.0, 1.0, 3.0), 1e-9));
    }

    #[test]
    fn point_defaults_missing_coordinates_to_zero() {
        let (min, _) = bbox_of(ObjectKind::Point, json!({"y": 4}));
        assert_eq!(min, DVec3::new(0.0, 4.0, 0.0));
    }

    #[rstest]
    #[case::sphere_without_radius(ObjectKind::Sphere, json!({}))]
    #[case::negative_radius(ObjectKind::Circle, json!({"center": [0, 0, 0], "radius": -1}))]
    #[case::single_point_polyline(ObjectKind::Polyline, json!({"points": [[0, 0, 0]]}))]
    #[case::zero_arc(ObjectKind::Arc, json!({"center": [0, 0, 0], "radius": 1, "angle": 0}))]
    fn rejects_invalid_shape_parameters(#[case] kind: ObjectKind, #[case] value: Value) {
        assert!(build(kind, &params(value)).is_err());
    }

    #[test]
    fn rejects_zero_degree_curves() {
        let curve = json!({"points": [[0, 0, 0], [1, 1, 1]], "degree": 0});
        assert!(build(ObjectKind::Curve, &params(curve)).is_err());
    }

    #[test]
    fn rejects_surfaces_whose_point_count_mismatches() {
        let surface = json!({"count": [2, 2], "points": [[0, 0, 0], [1, 0, 0], [0, 1, 0]]});
        assert!(build(ObjectKind::Surface, &params(surface)).is_err());
    }

    #[rstest]
    #[case::cone(ObjectKind::Cone)]
    #[case::cylinder(ObjectKind::Cylinder)]
    fn cap_is_checked_but_leaves_geometry_alone(#[case] kind: ObjectKind) {
        let open = build(kind, &params(json!({"radius": 1, "height": 2})))
            .expect("open");
        let capped = build(kind, &params(json!({"radius": 1, "height": 2, "cap": true})))
            .expect("capped");
        assert_eq!(open, capped);

        let malformed = json!({"radius": 1, "height": 2, "cap": "yes"});
        assert!(matches!(
            build(kind, &params(malformed)),
            Err(SceneError::InvalidParameter { .. })
        ));
    }

    fn surface_grid() -> Params {
        params(json!({
            "count": [2, 2],
            "points": [[0, 0, 0], [1, 0, 0], [0, 1, 0], [1, 1, 0]],
        }))
    }

    #[rstest]
    #[case::degree_not_a_list(json!({"degree": 3}))]
    #[case::closed_not_a_list(json!({"closed": true}))]
    fn surface_options_must_be_lists(#[case] options: Value) {
        let mut surface = surface_grid();
        surface.extend(params(options));
        assert!(matches!(
            build(ObjectKind::Surface, &surface),
            Err(SceneError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn surface_options_leave_geometry_alone() {
        let mut surface = surface_grid();
        surface.insert("degree".to_owned(), json!([3, 3]));
        surface.insert("closed".to_owned(), json!([false, true]));
        assert_eq!(
            build(ObjectKind::Surface, &surface).expect("surface with options"),
            build(ObjectKind::Surface, &surface_grid()).expect("plain surface")
        );
    }
}
