//! The compact, joint-indexed graph emitted by the index graph builder (§4.3).

pub mod builder;
pub mod serializer;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::edge::Edge;
use crate::feature::{EdgeEstimator, FeatureId, RoadPoint};
use crate::road_info::RoadInfo;

pub use builder::IndexGraphBuilder;
pub use serializer::IndexGraphSerializer;

/// Identifies a [`Joint`] within one [`IndexGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JointId(u32);

impl JointId {
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// An equivalence class of [`RoadPoint`]s whose geometric locations
/// coincide (§3). Only constructed with ≥ 2 members; a singleton joint is
/// dropped before reaching [`IndexGraph::import`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joint {
    members: SmallVec<[RoadPoint; 4]>,
}

impl Joint {
    /// Panics if given fewer than two members; see §3's size invariant.
    #[must_use]
    pub fn new(members: impl IntoIterator<Item = RoadPoint>) -> Self {
        let members: SmallVec<[RoadPoint; 4]> = members.into_iter().collect();
        assert!(members.len() >= 2, "a Joint must have at least two members");
        Self { members }
    }

    #[must_use]
    pub fn members(&self) -> &[RoadPoint] {
        &self.members
    }
}

/// A tile's compact, joint-indexed road graph: the result of coalescing
/// coincident feature vertices (§4.3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexGraph {
    joints: Vec<Joint>,
    by_road_point: HashMap<RoadPoint, JointId>,
}

impl IndexGraph {
    /// Imports a joint table built by [`IndexGraphBuilder`] (§4.3 step 5).
    #[must_use]
    pub fn import(joints: Vec<Joint>) -> Self {
        let mut by_road_point = HashMap::new();
        for (index, joint) in joints.iter().enumerate() {
            let id = JointId(u32::try_from(index).expect("fewer than u32::MAX joints per tile"));
            for member in joint.members() {
                by_road_point.insert(*member, id);
            }
        }
        Self { joints, by_road_point }
    }

    #[must_use]
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    #[must_use]
    pub fn joint(&self, id: JointId) -> &Joint {
        &self.joints[id.0 as usize]
    }

    #[must_use]
    pub fn joint_for(&self, road_point: RoadPoint) -> Option<JointId> {
        self.by_road_point.get(&road_point).copied()
    }

    /// Walks each member's feature polyline away from its vertex, in the
    /// direction(s) permitted by the feature, accumulating `estimator`'s
    /// weight until the next joint-bearing vertex is reached. Interior
    /// (non-joint) vertices are skipped over, exactly as the joint table
    /// intends: joints are the only routing nodes, so an index-graph edge
    /// spans every interior vertex between two joints.
    #[must_use]
    pub fn outgoing_transitions(
        &self,
        id: JointId,
        road_infos: &HashMap<FeatureId, RoadInfo>,
        estimator: &dyn EdgeEstimator,
    ) -> Vec<(JointId, f64)> {
        let mut transitions = Vec::new();
        for member in self.joint(id).members() {
            let Some(info) = road_infos.get(&member.feature_id) else { continue };
            self.walk_direction(*member, info, estimator, true, &mut transitions);
            if !info.is_one_way() {
                self.walk_direction(*member, info, estimator, false, &mut transitions);
            }
        }
        transitions
    }

    fn walk_direction(&self, start: RoadPoint, info: &RoadInfo, estimator: &dyn EdgeEstimator, forward: bool, out: &mut Vec<(JointId, f64)>) {
        let junctions = info.junctions();
        let mut cost = 0.0;
        let mut index = start.point_index as usize;
        loop {
            let next_index = if forward {
                if index + 1 >= junctions.len() {
                    return;
                }
                index + 1
            } else {
                if index == 0 {
                    return;
                }
                index - 1
            };

            let (from_idx, to_idx) = if forward { (index, next_index) } else { (next_index, index) };
            let segment_index = u32::try_from(from_idx).expect("polyline index fits u32");
            let edge = Edge::new(start.feature_id, forward, false, segment_index, junctions[from_idx], junctions[to_idx]);
            cost += estimator.weight(&edge, &edge, &edge);

            index = next_index;
            let candidate = RoadPoint::new(start.feature_id, u32::try_from(index).expect("polyline index fits u32"));
            if let Some(joint_id) = self.joint_for(candidate) {
                out.push((joint_id, cost));
                return;
            }
        }
    }
}
