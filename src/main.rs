mod agents;
mod llm_client;
mod orchestrator;

use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use llm_client::{build_llm_client, BackendKind, LlmConfig};
use orchestrator::{SpecialistMode, Stage, Team, TeamReport};
use tracing::{error, info, warn};

use agents::AgentResponse;

const DEFAULT_TASK: &str =
    "write a python code to refresh https://naija-find-uni.onrender.com/ every 5 seconds";
const RULE_WIDTH: usize = 50;

#[derive(Parser, Debug)]
#[command(
    name = "o1-team",
    about = "Run a task through a CEO agent and four specialists on a local LLM"
)]
struct Cli {
    /// Task for the team; defaults to the built-in demo task.
    #[arg(short, long)]
    prompt: Option<String>,

    /// Model backend: ollama, openai, or echo (overrides O1_TEAM_BACKEND).
    #[arg(long)]
    backend: Option<BackendKind>,

    /// Model identifier used by every agent (overrides O1_TEAM_MODEL).
    #[arg(long)]
    model: Option<String>,

    /// Ollama base URL (overrides OLLAMA_HOST).
    #[arg(long)]
    host: Option<String>,

    /// Await the four specialist calls together instead of one after another.
    #[arg(long, default_value_t = false)]
    concurrent_specialists: bool,

    /// Print only the final result as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    let config = LlmConfig::from_env()
        .context("Invalid LLM configuration")?
        .with_backend(cli.backend)
        .with_model(cli.model.clone())
        .with_ollama_host(cli.host.clone());
    info!(backend = %config.backend, model = %config.model, "Starting team");

    let llm_client = build_llm_client(&config).context("LLM client initialization failed")?;
    let mode = if cli.concurrent_specialists {
        SpecialistMode::Concurrent
    } else {
        SpecialistMode::Sequential
    };
    let team = Team::new(&config.model, llm_client).with_specialist_mode(mode);

    let task = cli.prompt.unwrap_or_else(|| DEFAULT_TASK.to_string());
    let mut stdout = io::stdout().lock();
    let report = run_task(&team, &task, cli.json, &mut stdout)
        .await
        .map_err(|err| {
            error!(?err, "Team request failed");
            err
        })?;

    for (field, value) in report.entries() {
        if value.starts_with(AgentResponse::ERROR_PREFIX) {
            warn!(field, "Stage finished with a backend error");
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Runs the team and writes the stage banners (unless `quiet`) and the JSON result to `out`.
async fn run_task(
    team: &Team,
    task: &str,
    quiet: bool,
    out: &mut impl Write,
) -> anyhow::Result<TeamReport> {
    let report = if quiet {
        team.process_request(task).await?
    } else {
        writeln!(out, "\n🎯 Task: {task}")?;
        writeln!(out, "\n🤖 Processing request...\n")?;
        out.flush()?;

        let mut write_err = None;
        let report = team
            .process_request_with(task, |stage, response| {
                tracing::debug!(%stage, agent = %response.agent_name, "Stage complete");
                if write_err.is_none() {
                    write_err = write_stage(&mut *out, stage, response)
                        .and_then(|_| out.flush())
                        .err();
                }
            })
            .await?;
        if let Some(err) = write_err {
            return Err(err).context("Failed to write stage output");
        }
        report
    };

    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    out.flush()?;
    Ok(report)
}

fn stage_heading(stage: Stage) -> String {
    match stage {
        Stage::InitialPlan => "📋 Initial Plan:".to_string(),
        Stage::Step(idx) => format!("\n👉 Step {idx} Implementation:"),
        Stage::FinalSummary => "\n📊 Executive Summary:".to_string(),
    }
}

fn write_stage(out: &mut impl Write, stage: Stage, response: &AgentResponse) -> io::Result<()> {
    let rule = "-".repeat(RULE_WIDTH);
    writeln!(out, "{}", stage_heading(stage))?;
    writeln!(out, "{rule}")?;
    writeln!(out, "{}", response.content)?;
    writeln!(out, "{rule}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::EchoLlmClient;
    use clap::CommandFactory;

    #[test]
    fn cli_defaults_leave_configuration_to_env() {
        let cli = Cli::parse_from(["o1-team"]);
        assert!(cli.prompt.is_none());
        assert!(cli.backend.is_none());
        assert!(cli.model.is_none());
        assert!(!cli.concurrent_specialists);
        assert!(!cli.json);
    }

    #[test]
    fn cli_accepts_overrides() {
        let cli = Cli::parse_from([
            "o1-team",
            "-p",
            "hello",
            "--backend",
            "echo",
            "--model",
            "qwen2.5:0.5b",
            "--host",
            "http://gpu-box:11434",
            "--concurrent-specialists",
            "--json",
        ]);
        assert_eq!(cli.prompt.as_deref(), Some("hello"));
        assert_eq!(cli.backend, Some(BackendKind::Echo));
        assert_eq!(cli.model.as_deref(), Some("qwen2.5:0.5b"));
        assert_eq!(cli.host.as_deref(), Some("http://gpu-box:11434"));
        assert!(cli.concurrent_specialists);
        assert!(cli.json);
    }

    #[test]
    fn cli_rejects_unknown_backend() {
        let err = Cli::try_parse_from(["o1-team", "--backend", "bard"]).expect_err("bad backend");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn cli_help_is_emitted_as_error_kind() {
        let err = Cli::command()
            .try_get_matches_from(["o1-team", "--help"])
            .expect_err("help should short-circuit");
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn stage_block_is_framed_by_rules() {
        let mut buf = Vec::new();
        write_stage(&mut buf, Stage::Step(2), &AgentResponse::new("built", "O2"))
            .expect("write to vec");

        let rule = "-".repeat(RULE_WIDTH);
        let expected = format!("\n👉 Step 2 Implementation:\n{rule}\nbuilt\n{rule}\n");
        assert_eq!(String::from_utf8(buf).expect("utf8"), expected);
    }

    #[tokio::test]
    async fn quiet_run_returns_report_from_echo_backend() {
        let config = LlmConfig {
            backend: BackendKind::Echo,
            ..LlmConfig::default()
        };
        let team = Team::new(&config.model, build_llm_client(&config).expect("echo client"));

        let mut out = Vec::new();
        let report = run_task(&team, "hello", true, &mut out)
            .await
            .expect("report");
        assert_eq!(report.initial_plan, "hello");
        assert_eq!(report.step_4, "hello");
        assert!(report.final_summary.starts_with("=== Original Plan ==="));

        let printed = String::from_utf8(out).expect("utf8");
        let expected = format!("{}\n", serde_json::to_string_pretty(&report).expect("json"));
        assert_eq!(printed, expected, "quiet mode prints only the JSON result");
    }

    #[tokio::test]
    async fn default_run_prints_banners_in_pipeline_order() {
        let team = Team::new(LlmConfig::DEFAULT_MODEL, EchoLlmClient::shared());

        let mut out = Vec::new();
        let report = run_task(&team, "hi", false, &mut out)
            .await
            .expect("report");

        let rule = "-".repeat(RULE_WIDTH);
        let review = "=== Original Plan ===\nhi\n=== Implementations ===\nStep 1: hi\nStep 2: hi\nStep 3: hi\nStep 4: hi";
        let mut expected = String::from("\n🎯 Task: hi\n\n🤖 Processing request...\n\n");
        expected.push_str(&format!("📋 Initial Plan:\n{rule}\nhi\n{rule}\n"));
        for idx in 1..=4 {
            expected.push_str(&format!("\n👉 Step {idx} Implementation:\n{rule}\nhi\n{rule}\n"));
        }
        expected.push_str(&format!("\n📊 Executive Summary:\n{rule}\n{review}\n{rule}\n"));
        expected.push_str(&serde_json::to_string_pretty(&report).expect("json"));
        expected.push('\n');

        assert_eq!(String::from_utf8(out).expect("utf8"), expected);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader went away"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn closed_stdout_is_an_error_not_a_panic() {
        let team = Team::new(LlmConfig::DEFAULT_MODEL, EchoLlmClient::shared());

        let err = run_task(&team, "hi", false, &mut BrokenPipe)
            .await
            .expect_err("write failure surfaces");
        let io_err = err.downcast_ref::<io::Error>().expect("io error");
        assert_eq!(io_err.kind(), io::ErrorKind::BrokenPipe);
    }
}
