//! Workflow step definitions
//!
//! The workflow is strictly linear: company → product → search → results.
//! There is no backward navigation and no skipping forward.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Company,
    Product,
    Search,
    Results,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Step::Company => "company",
            Step::Product => "product",
            Step::Search => "search",
            Step::Results => "results",
        };
        f.write_str(s)
    }
}

/// The canonical ordering of workflow steps.
pub const WORKFLOW_STEPS: &[Step] = &[Step::Company, Step::Product, Step::Search, Step::Results];

/// Get the 0-based position of a step in the workflow.
pub fn step_index(step: Step) -> usize {
    WORKFLOW_STEPS
        .iter()
        .position(|&s| s == step)
        .unwrap_or(usize::MAX)
}

/// Returns the step that follows `current`, or None for the final `results` step.
pub fn next_step(current: Step) -> Option<Step> {
    let index = step_index(current);
    WORKFLOW_STEPS.get(index.checked_add(1)?).copied()
}

/// Whether `step` is the last step, where the workflow stays for approval and outreach.
pub fn is_final_step(step: Step) -> bool {
    next_step(step).is_none()
}
