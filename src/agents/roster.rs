/// A fixed role: agent name plus the system prompt it always runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentRole {
    pub name: &'static str,
    pub system_prompt: &'static str,
}

pub const COORDINATOR: &str = "CEO";
pub const SPECIALISTS: [&str; 4] = ["O1", "O2", "O3", "O4"];

pub const ROSTER: [AgentRole; 5] = [
    AgentRole {
        name: COORDINATOR,
        // The indent before the second sentence is part of the prompt.
        system_prompt: "You are the Chief Executive AI. Break down problems into 4 clear steps.\n            When reviewing, provide a concise summary of all implementations.",
    },
    AgentRole {
        name: "O1",
        system_prompt: "You are the Foundation Specialist. Focus ONLY on implementing step 1 of the plan.",
    },
    AgentRole {
        name: "O2",
        system_prompt: "You are the Builder Specialist. Focus ONLY on implementing step 2 of the plan.",
    },
    AgentRole {
        name: "O3",
        system_prompt: "You are the Integration Specialist. Focus ONLY on implementing step 3 of the plan.",
    },
    AgentRole {
        name: "O4",
        system_prompt: "You are the Quality Specialist. Focus ONLY on implementing step 4 of the plan.",
    },
];

/// Every name a team must hold before it can take a request.
pub fn required_names() -> impl Iterator<Item = &'static str> {
    std::iter::once(COORDINATOR).chain(SPECIALISTS)
}
