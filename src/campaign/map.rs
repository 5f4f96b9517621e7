//! Campaign domain: the stage/node graph built from the content catalog.

use std::collections::HashMap;

use crate::content::{ContentRegistry, NodePosition, NodeType};

/// Per-run clone of a node definition. Everything is frozen at build time
/// except the two flags, which belong to the progression state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignNode {
    pub id: String,
    pub node_type: NodeType,
    pub stage_index: u32,
    pub tier: u32,
    pub encounter_id: Option<String>,
    pub next_node_ids: Vec<String>,
    pub position: NodePosition,
    pub reward_tier: u32,
    pub is_completed: bool,
    pub is_accessible: bool,
}

#[derive(Debug, Clone)]
pub struct CampaignStage {
    pub id: String,
    pub index: u32,
    pub name: String,
    pub boss_node_id: String,
    pub next_stage_id: Option<String>,
    /// Node ids in declaration order.
    pub node_ids: Vec<String>,
}

/// Graph build failure. Malformed content is rejected outright rather than
/// patched over at runtime.
#[derive(Debug, PartialEq, Eq)]
pub enum MapError {
    NoStages,
    DuplicateNode(String),
    MissingEdgeTarget { from: String, to: String },
    BackwardEdge { from: String, to: String },
    MissingBossNode { stage: String, node: String },
    NoEntryNode { stage: String },
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::NoStages => write!(f, "catalog contains no stages"),
            MapError::DuplicateNode(id) => write!(f, "node '{}' declared more than once", id),
            MapError::MissingEdgeTarget { from, to } => {
                write!(f, "node '{}' points at missing node '{}'", from, to)
            }
            MapError::BackwardEdge { from, to } => {
                write!(f, "node '{}' points at '{}' in an earlier stage", from, to)
            }
            MapError::MissingBossNode { stage, node } => {
                write!(f, "stage '{}' names missing boss node '{}'", stage, node)
            }
            MapError::NoEntryNode { stage } => {
                write!(f, "stage '{}' has no zero-inbound entry node", stage)
            }
        }
    }
}

/// In-memory node graph for one run. Stages are ordered by index; inbound
/// edges are precomputed once by inverting every node's successor list.
#[derive(Debug, Clone, Default)]
pub struct CampaignMap {
    stages: Vec<CampaignStage>,
    nodes: HashMap<String, CampaignNode>,
    inbound: HashMap<String, Vec<String>>,
    /// Entry node id per stage, same order as `stages`.
    entry_nodes: Vec<String>,
}

impl CampaignMap {
    /// Build the full graph from the catalog, cloning every stage and node
    /// with flags reset. Fails on duplicate ids, dangling or backward edges,
    /// a missing boss node, or a stage without an entry node.
    pub fn build(registry: &ContentRegistry) -> Result<Self, MapError> {
        let stage_defs = registry.stages_in_order();
        if stage_defs.is_empty() {
            return Err(MapError::NoStages);
        }

        let mut stages = Vec::with_capacity(stage_defs.len());
        let mut nodes: HashMap<String, CampaignNode> = HashMap::new();

        for stage_def in &stage_defs {
            let mut node_ids = Vec::with_capacity(stage_def.nodes.len());
            for node_def in &stage_def.nodes {
                let node = CampaignNode {
                    id: node_def.id.clone(),
                    node_type: node_def.node_type,
                    stage_index: stage_def.index,
                    tier: node_def.tier,
                    encounter_id: node_def.encounter_id.clone(),
                    next_node_ids: node_def.next_node_ids.clone(),
                    position: node_def.position,
                    reward_tier: node_def.reward_tier,
                    is_completed: false,
                    is_accessible: false,
                };
                if nodes.insert(node.id.clone(), node).is_some() {
                    return Err(MapError::DuplicateNode(node_def.id.clone()));
                }
                node_ids.push(node_def.id.clone());
            }

            if !node_ids.iter().any(|id| id == &stage_def.boss_node_id) {
                return Err(MapError::MissingBossNode {
                    stage: stage_def.id.clone(),
                    node: stage_def.boss_node_id.clone(),
                });
            }

            stages.push(CampaignStage {
                id: stage_def.id.clone(),
                index: stage_def.index,
                name: stage_def.name.clone(),
                boss_node_id: stage_def.boss_node_id.clone(),
                next_stage_id: stage_def.next_stage_id.clone(),
                node_ids,
            });
        }

        // Invert successor lists into the inbound-edge index, checking edge
        // targets as we go.
        let mut inbound: HashMap<String, Vec<String>> = HashMap::new();
        for node in nodes.values() {
            for next_id in &node.next_node_ids {
                let Some(target) = nodes.get(next_id) else {
                    return Err(MapError::MissingEdgeTarget {
                        from: node.id.clone(),
                        to: next_id.clone(),
                    });
                };
                if target.stage_index < node.stage_index {
                    return Err(MapError::BackwardEdge {
                        from: node.id.clone(),
                        to: next_id.clone(),
                    });
                }
                inbound.entry(next_id.clone()).or_default().push(node.id.clone());
            }
        }

        // The entry node is the one with zero inbound edges from its own
        // stage. Content without one is malformed; there is no fallback.
        let mut entry_nodes = Vec::with_capacity(stages.len());
        for stage in &stages {
            let entry = stage.node_ids.iter().find(|id| {
                inbound
                    .get(*id)
                    .map(|sources| {
                        !sources.iter().any(|src| {
                            nodes
                                .get(src)
                                .map(|n| n.stage_index == stage.index)
                                .unwrap_or(false)
                        })
                    })
                    .unwrap_or(true)
            });
            match entry {
                Some(id) => entry_nodes.push(id.clone()),
                None => {
                    return Err(MapError::NoEntryNode {
                        stage: stage.id.clone(),
                    })
                }
            }
        }

        Ok(Self {
            stages,
            nodes,
            inbound,
            entry_nodes,
        })
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Index of the first stage in sequence order.
    pub fn first_stage_index(&self) -> Option<u32> {
        self.stages.first().map(|s| s.index)
    }

    /// Stage by sequential index (not list position).
    pub fn stage(&self, index: u32) -> Option<&CampaignStage> {
        self.stages.iter().find(|s| s.index == index)
    }

    pub fn node(&self, id: &str) -> Option<&CampaignNode> {
        self.nodes.get(id)
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut CampaignNode> {
        self.nodes.get_mut(id)
    }

    pub fn entry_node_id(&self, stage_index: u32) -> Option<&str> {
        self.stages
            .iter()
            .position(|s| s.index == stage_index)
            .map(|pos| self.entry_nodes[pos].as_str())
    }

    /// Resolve the stage after `current`: an explicit next_stage_id wins,
    /// otherwise index + 1. None means the run is over.
    pub fn next_stage_index(&self, current: u32) -> Option<u32> {
        let stage = self.stage(current)?;
        match &stage.next_stage_id {
            Some(next_id) => self.stages.iter().find(|s| &s.id == next_id).map(|s| s.index),
            None => self.stage(current + 1).map(|s| s.index),
        }
    }

    pub fn inbound_edges(&self, node_id: &str) -> &[String] {
        self.inbound
            .get(node_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Recompute the accessible frontier from scratch. An incomplete current
    /// node is the sole accessible node; a completed one opens exactly its
    /// not-yet-completed direct successors. Sibling branches stay closed.
    pub fn recompute_accessibility(&mut self, current_node_id: &str) {
        for node in self.nodes.values_mut() {
            node.is_accessible = false;
        }
        let Some(current) = self.nodes.get(current_node_id) else {
            return;
        };
        if !current.is_completed {
            let id = current.id.clone();
            if let Some(node) = self.nodes.get_mut(&id) {
                node.is_accessible = true;
            }
            return;
        }
        let successors = current.next_node_ids.clone();
        for next_id in successors {
            if let Some(node) = self.nodes.get_mut(&next_id) {
                if !node.is_completed {
                    node.is_accessible = true;
                }
            }
        }
    }

    /// Ids of every currently accessible node, in no particular order.
    pub fn accessible_node_ids(&self) -> Vec<String> {
        self.nodes
            .values()
            .filter(|n| n.is_accessible)
            .map(|n| n.id.clone())
            .collect()
    }
}
