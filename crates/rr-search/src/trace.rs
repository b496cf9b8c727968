//! Exploration traces for animating a search.
//!
//! A trace is an append-only list of [`ExplorationStep`]s with strictly
//! increasing `step` indices.  It records what the search did, not what it
//! found, so failed searches keep theirs.

use serde::{Deserialize, Serialize};

use rr_core::{NodeId, SearchConfig};
use rr_graph::{GraphSnapshot, NodeSummary};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepAction {
    /// The source (or, backwards, the target) entered the frontier.
    Start,
    /// A node was permanently settled.
    Visit,
    /// A node's tentative distance improved.
    Relax,
    /// The search settled on its answer.
    Finalize,
}

/// Which frontier produced a step.  Only bidirectional searches set it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDirection {
    Forward,
    Backward,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExplorationStep {
    pub step: usize,
    pub action: StepAction,
    pub node: NodeSummary,
    /// g-score: cost from the frontier's origin.
    pub distance: f64,
    /// h-score, informed searches only.
    pub heuristic: Option<f64>,
    /// f-score (`distance + heuristic`), informed searches only.
    pub f_score: Option<f64>,
    pub parent: Option<NodeId>,
    pub direction: Option<SearchDirection>,
}

/// Builds a trace under the limits in [`SearchConfig`].
pub(crate) struct TraceRecorder<'g> {
    graph:              &'g GraphSnapshot,
    steps:              Vec<ExplorationStep>,
    limit:              usize,
    record_relaxations: bool,
    truncated:          bool,
}

impl<'g> TraceRecorder<'g> {
    pub fn new(graph: &'g GraphSnapshot, config: &SearchConfig) -> Self {
        Self {
            graph,
            steps: Vec::new(),
            limit: config.trace_limit,
            record_relaxations: config.record_relaxations,
            truncated: false,
        }
    }

    pub fn record(
        &mut self,
        action: StepAction,
        node: NodeId,
        distance: f64,
        heuristic: Option<f64>,
        parent: Option<NodeId>,
        direction: Option<SearchDirection>,
    ) {
        if action == StepAction::Relax && !self.record_relaxations {
            return;
        }
        // START and FINALIZE bracket the animation, so they bypass the limit.
        let always = matches!(action, StepAction::Start | StepAction::Finalize);
        if !always && self.steps.len() >= self.limit {
            self.truncated = true;
            return;
        }
        let Some(node) = self.graph.node(node) else {
            return;
        };
        self.steps.push(ExplorationStep {
            step: self.steps.len(),
            action,
            node: node.summary(),
            distance,
            heuristic,
            f_score: heuristic.map(|h| distance + h),
            parent,
            direction,
        });
    }

    /// Consume the recorder; the flag is `true` if any step was dropped.
    pub fn finish(self) -> (Vec<ExplorationStep>, bool) {
        (self.steps, self.truncated)
    }
}
