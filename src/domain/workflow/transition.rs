//! Transition rules: how a step's response selects the next step.

use crate::domain::foundation::StepName;

use super::TransitionError;

/// Condition on the raw response value.
///
/// Conditions compare by exact equality against the literal they were
/// authored with. The literals a step offers as options must line up with
/// the literals its conditions expect; `WorkflowBuilder::build` enforces
/// that equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Equals(&'static str),
}

impl Condition {
    pub fn matches(&self, response: &str) -> bool {
        match self {
            Condition::Equals(literal) => *literal == response,
        }
    }

    /// The literal this condition expects.
    pub fn literal(&self) -> &'static str {
        match self {
            Condition::Equals(literal) => *literal,
        }
    }
}

/// The rule mapping a step's possible responses to the next step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionRule {
    /// One unconditional target; the response does not affect routing.
    Always(StepName),
    /// Ordered (condition, target) pairs, evaluated top to bottom, first
    /// match wins. No implicit fallback.
    When(Vec<(Condition, StepName)>),
}

impl TransitionRule {
    /// Convenience constructor for a conditional rule.
    pub fn when(pairs: Vec<(&'static str, &str)>) -> Self {
        TransitionRule::When(
            pairs
                .into_iter()
                .map(|(literal, target)| (Condition::Equals(literal), StepName::from(target)))
                .collect(),
        )
    }

    /// Convenience constructor for an unconditional rule.
    pub fn always(target: &str) -> Self {
        TransitionRule::Always(StepName::from(target))
    }

    /// Resolves the next step for a response.
    pub fn next(&self, step: &StepName, response: &str) -> Result<&StepName, TransitionError> {
        match self {
            TransitionRule::Always(target) => Ok(target),
            TransitionRule::When(pairs) => pairs
                .iter()
                .find(|(condition, _)| condition.matches(response))
                .map(|(_, target)| target)
                .ok_or_else(|| TransitionError {
                    step: step.clone(),
                    response: response.to_string(),
                }),
        }
    }

    /// All target step names this rule can resolve to.
    pub fn targets(&self) -> Vec<&StepName> {
        match self {
            TransitionRule::Always(target) => vec![target],
            TransitionRule::When(pairs) => pairs.iter().map(|(_, t)| t).collect(),
        }
    }

    /// The condition literals of a conditional rule, in order.
    pub fn condition_literals(&self) -> Option<Vec<&'static str>> {
        match self {
            TransitionRule::Always(_) => None,
            TransitionRule::When(pairs) => {
                Some(pairs.iter().map(|(c, _)| c.literal()).collect())
            }
        }
    }

    /// (condition label, target) pairs for introspection tooling.
    pub fn labeled(&self) -> Vec<(String, StepName)> {
        match self {
            TransitionRule::Always(target) => vec![("always".to_string(), target.clone())],
            TransitionRule::When(pairs) => pairs
                .iter()
                .map(|(c, t)| (c.literal().to_string(), t.clone()))
                .collect(),
        }
    }
}
