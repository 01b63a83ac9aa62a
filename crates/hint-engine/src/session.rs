use hintkit_core_types::{RenderHandle, RenderPort, SessionId};
use tracing::debug;

use crate::model::{Category, HintNode, MatchState, Variant};

/// Live state of one hint invocation, from build to resolution or cancel.
///
/// `nodes` keeps build order for the whole session; `active` is the filtered
/// subsequence (indices into `nodes`) still eligible for the typed input.
#[derive(Debug)]
pub struct HintSession {
    pub id: SessionId,
    pub category: Category,
    pub variant: Variant,
    pub nodes: Vec<HintNode>,
    pub active: Vec<usize>,
    pub active_index: usize,
    /// Node currently emphasized, if any.
    pub current: Option<usize>,
    pub last_input: Option<String>,
    /// Character offset just past the escape character, once seen.
    pub escape_offset: Option<usize>,
    pub notifier: Option<RenderHandle>,
    pub state: MatchState,
}

impl HintSession {
    pub fn new(category: Category, variant: Variant, nodes: Vec<HintNode>) -> Self {
        let active = (0..nodes.len()).collect();
        Self {
            id: SessionId::new(),
            category,
            variant,
            nodes,
            active,
            active_index: 0,
            current: None,
            last_input: None,
            escape_offset: None,
            notifier: None,
            state: MatchState::Initial,
        }
    }

    pub fn active_nodes(&self) -> impl Iterator<Item = &HintNode> + '_ {
        self.active.iter().map(move |&idx| &self.nodes[idx])
    }

    pub fn current_node(&self) -> Option<&HintNode> {
        self.current.and_then(|idx| self.nodes.get(idx))
    }

    /// Labels of the active nodes, in build order.
    pub fn active_labels(&self) -> Vec<String> {
        self.active_nodes().map(|node| node.label.clone()).collect()
    }

    /// Detach every injected node. Consumes the session so nothing can touch
    /// its nodes afterwards.
    pub fn teardown(self, render: &mut dyn RenderPort) {
        debug!(session = %self.id, nodes = self.nodes.len(), "tearing down hint session");
        for node in &self.nodes {
            render.remove(node.hint);
            if let Some(overlay) = node.overlay {
                render.remove(overlay);
            }
        }
        if let Some(notifier) = self.notifier {
            render.remove(notifier);
        }
    }
}
