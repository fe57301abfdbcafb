//! Per-bone bounding volumes

use asset_common::{BoneBounds, BoundingBox};
use glam::{Mat4, Vec3};

use super::types::BoneWeight;

/// Minimum weight for a vertex to count towards a bone's bounds
pub const WEIGHT_THRESHOLD: f32 = 0.01;

/// Radius and half-extent used for bones no vertex is weighted to
pub const FALLBACK_EXTENT: f32 = 0.1;

/// Bounds of bone `bone` in its bind space.
///
/// Every vertex with at least [`WEIGHT_THRESHOLD`] weight on the bone is
/// moved into bind space with `bind_matrix`. Bones without such vertices get
/// a small fixed box so the engine never sees an empty volume.
pub fn bone_bounds(
    bone: u32,
    bind_matrix: &Mat4,
    positions: &[Vec3],
    weights: &[BoneWeight],
) -> BoneBounds {
    let points = positions
        .iter()
        .zip(weights.iter())
        .filter(|(_, w)| w.influences(bone, WEIGHT_THRESHOLD))
        .map(|(p, _)| bind_matrix.transform_point3(*p));

    match BoundingBox::from_points(points) {
        Some(bbox) => BoneBounds {
            radius: bbox.max.length().max(bbox.min.length()),
            bbox,
        },
        None => BoneBounds {
            radius: FALLBACK_EXTENT,
            bbox: BoundingBox::new(Vec3::splat(-FALLBACK_EXTENT), Vec3::splat(FALLBACK_EXTENT)),
        },
    }
}
