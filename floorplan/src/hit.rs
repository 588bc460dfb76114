#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::entity::{Entity, Registry};
use crate::viewport::Point;

/// Whether `pt` lies inside the entity's axis-aligned bounding box, edges included.
///
/// Rotation is ignored: a rotated device is still hit against its unrotated box.
#[must_use]
pub fn contains(entity: &Entity, pt: Point) -> bool {
    pt.x >= entity.x && pt.x <= entity.x + entity.width && pt.y >= entity.y && pt.y <= entity.y + entity.height
}

/// Index of the top-most entity under `pt`, scanning last-added first.
#[must_use]
pub fn hit_test(pt: Point, registry: &Registry) -> Option<usize> {
    registry
        .as_slice()
        .iter()
        .rposition(|entity| contains(entity, pt))
}
