//! GetTransitionMapHandler - introspection over the built graph.
//!
//! Consumed by external tooling (an admin view or documentation generator)
//! to visualize and audit the interview. Reads straight from the built
//! definition, so it can never go stale.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::foundation::StepName;
use crate::domain::workflow::WorkflowDefinition;

/// Handler exposing the transition table.
pub struct GetTransitionMapHandler {
    workflow: Arc<WorkflowDefinition>,
}

impl GetTransitionMapHandler {
    pub fn new(workflow: Arc<WorkflowDefinition>) -> Self {
        Self { workflow }
    }

    /// Step name to (condition label, target) pairs. The terminal step is
    /// present with no outgoing transitions.
    pub fn handle(&self) -> BTreeMap<StepName, Vec<(String, StepName)>> {
        self.workflow.transition_map()
    }

    /// Plain-text rendering for documentation tooling.
    pub fn render(&self) -> String {
        self.workflow.render_map()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workflow::flow;

    #[test]
    fn map_reflects_the_built_definition() {
        let workflow = flow::workflow();
        let handler = GetTransitionMapHandler::new(workflow.clone());
        let map = handler.handle();

        assert_eq!(map.len(), workflow.step_count() + 1);
        // Every target in the map is itself a key: the audit surface shows
        // a closed graph.
        for transitions in map.values() {
            for (_, target) in transitions {
                assert!(map.contains_key(target), "dangling {target} in map");
            }
        }
        assert!(map
            .get(&StepName::from(flow::steps::COMPLETE))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn render_emits_one_section_per_step() {
        let handler = GetTransitionMapHandler::new(flow::workflow());
        let rendered = handler.render();
        assert!(rendered.contains("## buyer-kind"));
        assert!(rendered.contains("individual -> buyer-identity-upload"));
    }
}
