use std::collections::HashMap;

use anyhow::{bail, Context};
use tracing::{info, instrument};

use crate::agents::roster::required_names;
use crate::agents::{Agent, AgentResponse, COORDINATOR, ROSTER, SPECIALISTS};
use crate::llm_client::SharedLlmClient;

use super::report::{review_document, Stage, TeamReport};

/// How the four specialist calls are awaited once the plan exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecialistMode {
    /// O1, then O2, then O3, then O4.
    #[default]
    Sequential,
    /// All four in flight together; results keep index order.
    Concurrent,
}

/// Coordinator plus four specialists, run through one fixed pipeline.
#[derive(Debug)]
pub struct Team {
    agents: HashMap<String, Agent>,
    specialist_mode: SpecialistMode,
}

impl Team {
    pub fn new(model: &str, llm_client: SharedLlmClient) -> Self {
        let agents = ROSTER
            .iter()
            .map(|role| {
                let agent = Agent::from_role(role, model, llm_client.clone());
                (role.name.to_string(), agent)
            })
            .collect();

        Self {
            agents,
            specialist_mode: SpecialistMode::default(),
        }
    }

    /// Builds a team from caller-supplied agents. Exactly the five roster names must appear.
    #[allow(dead_code)]
    pub fn from_agents(agents: impl IntoIterator<Item = Agent>) -> anyhow::Result<Self> {
        let mut by_name = HashMap::new();
        for agent in agents {
            let name = agent.name().to_string();
            if !required_names().any(|required| required == name) {
                bail!("Unexpected agent '{name}' in team roster");
            }
            if by_name.insert(name.clone(), agent).is_some() {
                bail!("Agent '{name}' appears more than once in team roster");
            }
        }

        if let Some(missing) = required_names().find(|name| !by_name.contains_key(*name)) {
            bail!("Team roster is missing agent '{missing}'");
        }

        Ok(Self {
            agents: by_name,
            specialist_mode: SpecialistMode::default(),
        })
    }

    pub fn with_specialist_mode(mut self, mode: SpecialistMode) -> Self {
        self.specialist_mode = mode;
        self
    }

    pub fn agent(&self, name: &str) -> anyhow::Result<&Agent> {
        self.agents
            .get(name)
            .with_context(|| format!("No agent named '{name}' on this team"))
    }

    pub async fn process_request(&self, user_input: &str) -> anyhow::Result<TeamReport> {
        self.process_request_with(user_input, |_, _| {}).await
    }

    /// Runs plan → four steps → summary, handing each finished stage to `observer`.
    ///
    /// Agent failures never stop the pipeline; their `Error: ...` text is passed
    /// along as content. Only a missing agent is reported as an error.
    #[instrument(skip_all, fields(mode = ?self.specialist_mode))]
    pub async fn process_request_with<F>(
        &self,
        user_input: &str,
        mut observer: F,
    ) -> anyhow::Result<TeamReport>
    where
        F: FnMut(Stage, &AgentResponse),
    {
        let coordinator = self.agent(COORDINATOR)?;

        info!("Requesting initial plan");
        let initial_plan = coordinator.think(user_input).await;
        observer(Stage::InitialPlan, &initial_plan);

        let steps = self
            .run_specialists(&initial_plan.content, &mut observer)
            .await?;

        let review = review_document(&initial_plan.content, &steps);

        info!("Requesting final summary");
        let final_summary = coordinator.think(&review).await;
        observer(Stage::FinalSummary, &final_summary);

        let failures = std::iter::once(&initial_plan)
            .chain(steps.iter())
            .chain(std::iter::once(&final_summary))
            .filter(|response| response.is_error())
            .count();
        info!(failures, "Request processed");

        Ok(TeamReport::assemble(initial_plan, steps, final_summary))
    }

    async fn run_specialists<F>(
        &self,
        plan: &str,
        observer: &mut F,
    ) -> anyhow::Result<[AgentResponse; 4]>
    where
        F: FnMut(Stage, &AgentResponse),
    {
        let [o1, o2, o3, o4] = [
            self.agent(SPECIALISTS[0])?,
            self.agent(SPECIALISTS[1])?,
            self.agent(SPECIALISTS[2])?,
            self.agent(SPECIALISTS[3])?,
        ];

        let steps = match self.specialist_mode {
            SpecialistMode::Sequential => [
                Self::run_step(1, o1, plan, observer).await,
                Self::run_step(2, o2, plan, observer).await,
                Self::run_step(3, o3, plan, observer).await,
                Self::run_step(4, o4, plan, observer).await,
            ],
            SpecialistMode::Concurrent => {
                info!("Requesting all implementations together");
                let (s1, s2, s3, s4) =
                    tokio::join!(o1.think(plan), o2.think(plan), o3.think(plan), o4.think(plan));
                let steps = [s1, s2, s3, s4];
                for (idx, response) in steps.iter().enumerate() {
                    observer(Stage::Step(idx + 1), response);
                }
                steps
            }
        };

        Ok(steps)
    }

    async fn run_step<F>(
        step: usize,
        agent: &Agent,
        plan: &str,
        observer: &mut F,
    ) -> AgentResponse
    where
        F: FnMut(Stage, &AgentResponse),
    {
        info!(step, agent = agent.name(), "Requesting implementation");
        let response = agent.think(plan).await;
        observer(Stage::Step(step), &response);
        response
    }
}
