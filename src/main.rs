//! Cofound command-line entrypoint.

use std::io::Read;

use anyhow::{Context, bail};
use mimalloc::MiMalloc;

use cofound::config::Config;
use cofound::engine::{DefaultEngine, RecommendRequest, RecommendResponse};
use cofound::model::UserId;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const USAGE: &str = "\
usage: cofound [REQUEST.json | -]
       cofound --record-swipe <user_id> <target_id>

Reads a JSON request {user_id, my_profile, candidates, swipe_history, limit}
from the given file (or stdin) and prints {recommendations, scores}.";

#[derive(Debug, PartialEq)]
enum Command {
    Recommend { input: Option<String> },
    RecordSwipe { user_id: String, target_id: String },
    Help,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Command> {
    let mut args = args.into_iter();
    let command = match args.next().as_deref() {
        None | Some("-") => Command::Recommend { input: None },
        Some("-h" | "--help") => Command::Help,
        Some("--record-swipe") => {
            let (Some(user_id), Some(target_id)) = (args.next(), args.next()) else {
                bail!("--record-swipe needs <user_id> <target_id>\n\n{USAGE}");
            };
            Command::RecordSwipe { user_id, target_id }
        }
        Some(flag) if flag.starts_with("--") => bail!("unknown option {flag}\n\n{USAGE}"),
        Some(path) => Command::Recommend {
            input: Some(path.to_string()),
        },
    };

    if let Some(extra) = args.next() {
        bail!("unexpected argument {extra}\n\n{USAGE}");
    }
    Ok(command)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let command = parse_args(std::env::args().skip(1))?;
    if command == Command::Help {
        println!("{USAGE}");
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!(
        storage_path = %config.storage_path.display(),
        stub_embeddings = config.uses_stub_embedder(),
        "Cofound starting"
    );

    let engine = DefaultEngine::from_config(&config)?;

    let outcome = match command {
        Command::Recommend { input } => run_recommend(&engine, input.as_deref()).await,
        Command::RecordSwipe { user_id, target_id } => {
            let added = engine.record_swipe(&user_id, &target_id).await?;
            tracing::info!(user_id = %user_id, target_id = %target_id, added, "Swipe recorded");
            Ok(())
        }
        Command::Help => Ok(()),
    };

    if let Err(e) = engine.shutdown() {
        tracing::error!(error = %e, "Failed to flush state on shutdown");
    }

    outcome
}

async fn run_recommend(engine: &DefaultEngine, input: Option<&str>) -> anyhow::Result<()> {
    let raw = read_input(input)?;
    let request: RecommendRequest =
        serde_json::from_str(&raw).context("invalid recommendation request")?;

    let user_id = request.user_id.as_ref().map(UserId::as_str).unwrap_or_default();
    let limit = request.limit.unwrap_or(engine.config().max_results);

    let ranked = engine
        .recommend(
            user_id,
            &request.my_profile,
            request.candidates,
            &request.swipe_history,
            limit,
        )
        .await?;

    let response = RecommendResponse::from(ranked);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn read_input(path: Option<&str>) -> anyhow::Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
        }
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read request from stdin")?;
            Ok(raw)
        }
    }
}
