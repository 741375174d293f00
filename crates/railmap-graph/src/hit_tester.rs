//! Pointer picking against the laid-out stations.

use crate::layout::ForceSimulation;
use crate::render::drawn_radius;
use crate::store::StationNode;
use crate::viewport::ViewportController;
use railmap_core::Vec2;
use std::sync::Arc;

/// Extra screen pixels around a disc that still count as a hit.
pub const HIT_TOLERANCE_PX: f32 = 4.0;

/// Nearest station whose disc (plus tolerance) contains `screen`.
pub fn hit_test<'a>(
    simulation: &'a ForceSimulation,
    viewport: &ViewportController,
    screen: Vec2,
) -> Option<&'a Arc<StationNode>> {
    let zoom = viewport.zoom();
    simulation
        .positions()
        .filter_map(|(node, position)| {
            let distance = viewport.world_to_screen(position).distance(screen);
            let reach = drawn_radius(node) * zoom + HIT_TOLERANCE_PX;
            (distance <= reach).then_some((node, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(node, _)| node)
}
