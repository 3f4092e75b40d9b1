//! Workflow definition: the step registry and transition table.
//!
//! Built once through `WorkflowBuilder`, which checks the whole graph
//! before sealing it: duplicate names, dangling targets, option/condition
//! vocabulary drift, and unreachable steps all fail the build. Once built
//! the definition is immutable and safely shared across sessions and
//! threads.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::domain::foundation::StepName;
use crate::domain::session::Session;

use super::{
    ConfigurationError, EngineError, StepHandler, StepPrompt, TransitionRule,
};

/// One named step: handler plus transition rule.
#[derive(Debug, Clone)]
pub struct StepDefinition {
    pub name: StepName,
    pub handler: StepHandler,
    pub transition: TransitionRule,
}

impl StepDefinition {
    pub fn new(name: &str, handler: StepHandler, transition: TransitionRule) -> Self {
        Self {
            name: StepName::from(name),
            handler,
            transition,
        }
    }
}

/// Accumulates step registrations, then validates and seals the graph.
#[derive(Debug, Default)]
pub struct WorkflowBuilder {
    steps: Vec<StepDefinition>,
    entry: Option<StepName>,
    terminal: Option<StepName>,
}

impl WorkflowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one named step with its handler and transition rule.
    pub fn register(mut self, step: StepDefinition) -> Self {
        self.steps.push(step);
        self
    }

    /// Designates the entry step.
    pub fn entry(mut self, name: &str) -> Self {
        self.entry = Some(StepName::from(name));
        self
    }

    /// Designates the completion step. The terminal step has no handler and
    /// no outgoing transitions; reaching it ends the interview.
    pub fn terminal(mut self, name: &str) -> Self {
        self.terminal = Some(StepName::from(name));
        self
    }

    /// Validates the whole graph and seals it.
    ///
    /// # Errors
    ///
    /// `ConfigurationError` describing the first inconsistency found. A
    /// failed build is fatal; the hosting process must refuse to start.
    pub fn build(self) -> Result<WorkflowDefinition, ConfigurationError> {
        if self.steps.is_empty() {
            return Err(ConfigurationError::NoSteps);
        }
        let entry = self.entry.ok_or(ConfigurationError::NoEntryStep)?;
        let terminal = self.terminal.ok_or(ConfigurationError::NoTerminalStep)?;

        let mut steps: BTreeMap<StepName, StepDefinition> = BTreeMap::new();
        for step in self.steps {
            if step.name == terminal {
                return Err(ConfigurationError::TerminalIsRegistered(step.name));
            }
            if steps.contains_key(&step.name) {
                return Err(ConfigurationError::DuplicateStep(step.name));
            }
            steps.insert(step.name.clone(), step);
        }

        if !steps.contains_key(&entry) {
            return Err(ConfigurationError::MissingEntryStep(entry));
        }

        for step in steps.values() {
            for target in step.transition.targets() {
                if *target != terminal && !steps.contains_key(target) {
                    return Err(ConfigurationError::DanglingTarget {
                        step: step.name.clone(),
                        target: target.clone(),
                    });
                }
            }
            Self::check_vocabulary(step)?;
        }

        Self::check_reachability(&steps, &entry, &terminal)?;

        Ok(WorkflowDefinition {
            steps,
            entry,
            terminal,
        })
    }

    /// The option literals a step offers must be exactly the literals its
    /// outgoing conditions check. Unconditional rules ignore the response,
    /// so they are exempt.
    fn check_vocabulary(step: &StepDefinition) -> Result<(), ConfigurationError> {
        let literals = match step.transition.condition_literals() {
            Some(literals) => literals,
            None => return Ok(()),
        };
        let offered: BTreeSet<&str> = match step.handler.options() {
            Some(options) => options.iter().copied().collect(),
            None => {
                return Err(ConfigurationError::ConditionalOnOpenResponse(
                    step.name.clone(),
                ))
            }
        };
        let routed: BTreeSet<&str> = literals.into_iter().collect();
        if offered != routed {
            return Err(ConfigurationError::VocabularyMismatch {
                step: step.name.clone(),
                offered: offered.iter().map(|s| s.to_string()).collect(),
                routed: routed.iter().map(|s| s.to_string()).collect(),
            });
        }
        Ok(())
    }

    fn check_reachability(
        steps: &BTreeMap<StepName, StepDefinition>,
        entry: &StepName,
        terminal: &StepName,
    ) -> Result<(), ConfigurationError> {
        let mut seen: BTreeSet<&StepName> = BTreeSet::new();
        let mut queue: VecDeque<&StepName> = VecDeque::new();
        seen.insert(entry);
        queue.push_back(entry);
        while let Some(name) = queue.pop_front() {
            if let Some(step) = steps.get(name) {
                for target in step.transition.targets() {
                    if target != terminal && seen.insert(target) {
                        queue.push_back(target);
                    }
                }
            }
        }
        for name in steps.keys() {
            if !seen.contains(name) {
                return Err(ConfigurationError::UnreachableStep(name.clone()));
            }
        }
        Ok(())
    }
}

/// The sealed interview graph.
#[derive(Debug, Clone)]
pub struct WorkflowDefinition {
    steps: BTreeMap<StepName, StepDefinition>,
    entry: StepName,
    terminal: StepName,
}

impl WorkflowDefinition {
    pub fn entry(&self) -> &StepName {
        &self.entry
    }

    pub fn terminal(&self) -> &StepName {
        &self.terminal
    }

    pub fn is_terminal(&self, name: &StepName) -> bool {
        *name == self.terminal
    }

    /// Number of interactive steps (the terminal step is not counted).
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn step(&self, name: &StepName) -> Option<&StepDefinition> {
        self.steps.get(name)
    }

    pub fn step_names(&self) -> impl Iterator<Item = &StepName> {
        self.steps.keys()
    }

    /// Renders the prompt for the session's current step.
    pub fn prompt_for(&self, session: &Session) -> Result<StepPrompt, EngineError> {
        let step = self
            .step(session.current_step())
            .ok_or_else(|| EngineError::UnknownStep(session.current_step().clone()))?;
        let progress = format!(
            "step {} of about {}",
            session.step_seq() + 1,
            self.step_count()
        );
        Ok(step.handler.prompt(session, &step.name, progress))
    }

    /// The full transition table, for introspection tooling.
    ///
    /// Reflects exactly the built graph: one entry per step, each listing
    /// its (condition label, target) pairs. The terminal step appears with
    /// an empty list.
    pub fn transition_map(&self) -> BTreeMap<StepName, Vec<(String, StepName)>> {
        let mut map: BTreeMap<StepName, Vec<(String, StepName)>> = self
            .steps
            .iter()
            .map(|(name, step)| (name.clone(), step.transition.labeled()))
            .collect();
        map.insert(self.terminal.clone(), Vec::new());
        map
    }

    /// Plain-text rendering of the transition map for documentation.
    pub fn render_map(&self) -> String {
        let mut lines = vec!["# Interview map".to_string(), String::new()];
        for (step, transitions) in self.transition_map() {
            lines.push(format!("## {}", step));
            for (label, target) in transitions {
                lines.push(format!("  - {} -> {}", label, target));
            }
            lines.push(String::new());
        }
        lines.join("\n")
    }
}
