//! Curve-driven animation host
//!
//! Reference [`AnimationHost`] that poses a scratch hierarchy straight from a
//! clip's curves. Bound nodes start from their rest transform and only the
//! components that have a curve are overwritten.

use glam::Quat;
use hashbrown::HashMap;

use super::clip::{AnimationClip, TransformProperty};
use super::curve::normalize_or_identity;
use super::pose::{AnimationHost, PlaybackGraphId};
use super::scratch::ScratchHierarchy;
use crate::error::{ExportError, Result};
use crate::scene::Transform;

#[derive(Debug, Default)]
pub struct CurveAnimationHost {
    graphs: HashMap<PlaybackGraphId, AnimationClip>,
    next_graph: u64,
}

impl CurveAnimationHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Playback graphs created and not yet deleted
    pub fn live_graph_count(&self) -> usize {
        self.graphs.len()
    }
}

fn set_component(local: &mut Transform, property: TransformProperty, value: f32) {
    use TransformProperty::*;

    let mut rotation = local.rotation.to_array();
    match property {
        PositionX => local.translation.x = value,
        PositionY => local.translation.y = value,
        PositionZ => local.translation.z = value,
        RotationX => rotation[0] = value,
        RotationY => rotation[1] = value,
        RotationZ => rotation[2] = value,
        RotationW => rotation[3] = value,
        ScaleX => local.scale.x = value,
        ScaleY => local.scale.y = value,
        ScaleZ => local.scale.z = value,
    }
    local.rotation = Quat::from_array(rotation);
}

/// Write the clip's value at `time` onto every bound node of `target`.
fn pose(clip: &AnimationClip, target: &mut ScratchHierarchy, time: f32) {
    let mut posed: HashMap<usize, Transform> = HashMap::new();
    // Keeps the write order stable
    let mut order = Vec::new();

    for binding in &clip.bindings {
        let Some(property) = binding.transform_property() else {
            continue;
        };
        let Some(node) = target.resolve_path(&binding.path) else {
            continue;
        };
        let Some(value) = binding.curve.evaluate(time) else {
            continue;
        };
        let local = posed.entry(node).or_insert_with(|| {
            order.push(node);
            target.node(node).map_or(Transform::IDENTITY, |n| n.local)
        });
        set_component(local, property, value);
    }

    for node in order {
        if let Some(mut local) = posed.remove(&node) {
            local.rotation = normalize_or_identity(local.rotation);
            target.set_local(node, local);
        }
    }
}

impl AnimationHost for CurveAnimationHost {
    fn evaluate_clip(
        &mut self,
        clip: &AnimationClip,
        target: &mut ScratchHierarchy,
        time: f32,
    ) -> Result<()> {
        pose(clip, target, time);
        Ok(())
    }

    fn create_playback_graph(&mut self, clip: &AnimationClip) -> Result<PlaybackGraphId> {
        self.next_graph += 1;
        let id = PlaybackGraphId(self.next_graph);
        self.graphs.insert(id, clip.clone());
        Ok(id)
    }

    fn evaluate_playback_graph(
        &mut self,
        graph: PlaybackGraphId,
        target: &mut ScratchHierarchy,
        fraction: f32,
    ) -> Result<()> {
        let clip = self.graphs.get(&graph).ok_or_else(|| ExportError::Sampling {
            clip: String::new(),
            reason: format!("unknown playback graph {}", graph.0),
        })?;
        pose(clip, target, fraction * clip.length);
        Ok(())
    }

    fn delete_playback_graph(&mut self, graph: PlaybackGraphId) {
        self.graphs.remove(&graph);
    }
}
