use std::fmt;

use serde::{Deserialize, Serialize};

use crate::agents::AgentResponse;

/// Pipeline position of a completed agent call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    InitialPlan,
    /// Specialist step, 1-based.
    Step(usize),
    FinalSummary,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::InitialPlan => write!(f, "initial_plan"),
            Stage::Step(idx) => write!(f, "step_{idx}"),
            Stage::FinalSummary => write!(f, "final_summary"),
        }
    }
}

/// The six text fields a request produces, keyed by fixed names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamReport {
    pub initial_plan: String,
    pub step_1: String,
    pub step_2: String,
    pub step_3: String,
    pub step_4: String,
    pub final_summary: String,
}

impl TeamReport {
    pub const KEYS: [&'static str; 6] = [
        "initial_plan",
        "step_1",
        "step_2",
        "step_3",
        "step_4",
        "final_summary",
    ];

    pub(crate) fn assemble(
        initial_plan: AgentResponse,
        steps: [AgentResponse; 4],
        final_summary: AgentResponse,
    ) -> Self {
        let [step_1, step_2, step_3, step_4] = steps;
        Self {
            initial_plan: initial_plan.content,
            step_1: step_1.content,
            step_2: step_2.content,
            step_3: step_3.content,
            step_4: step_4.content,
            final_summary: final_summary.content,
        }
    }

    /// Field name and value pairs in pipeline order.
    pub fn entries(&self) -> [(&'static str, &str); 6] {
        [
            (Self::KEYS[0], self.initial_plan.as_str()),
            (Self::KEYS[1], self.step_1.as_str()),
            (Self::KEYS[2], self.step_2.as_str()),
            (Self::KEYS[3], self.step_3.as_str()),
            (Self::KEYS[4], self.step_4.as_str()),
            (Self::KEYS[5], self.final_summary.as_str()),
        ]
    }
}

/// Builds the document the coordinator reviews for its final summary.
pub fn review_document(initial_plan: &str, steps: &[AgentResponse]) -> String {
    let mut lines = Vec::with_capacity(steps.len() + 3);
    lines.push("=== Original Plan ===".to_string());
    lines.push(initial_plan.to_string());
    lines.push("=== Implementations ===".to_string());
    for (idx, step) in steps.iter().enumerate() {
        lines.push(format!("Step {}: {}", idx + 1, step.content));
    }
    lines.join("\n")
}
