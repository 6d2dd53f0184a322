mod cli;
mod config;
mod error;
mod layers;

use crate::cli::Args;
use crate::config::Config;
use crate::layers::execution::executable::ToolExecutable;
use crate::layers::service::logging::init_tracing;
use crate::layers::service::{run_once, run_worker, RequestHandler};
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let exit_code = {
        let _file_guard = init_tracing(args.log_dir.as_deref(), args.log_to_stderr)?;
        run(args).await?
    };
    std::process::exit(exit_code)
}

async fn run(args: Args) -> anyhow::Result<i32> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(tool) = &args.tool {
        config.tool.program = tool.clone();
    }

    let executable = Arc::new(ToolExecutable::from_config(&config.tool, &config.limits));
    let handler = Arc::new(RequestHandler::new(executable));

    if args.is_persistent_worker() {
        let concurrency = args
            .concurrency
            .unwrap_or_else(|| config.worker.concurrency());
        run_worker(tokio::io::stdin(), tokio::io::stdout(), handler, concurrency).await?;
        return Ok(0);
    }

    match run_once(args.arguments, &handler).await {
        Ok(exit_code) => Ok(exit_code),
        Err(err) => {
            tracing::error!(error = %err, "execution failed");
            eprintln!("{err}");
            Ok(1)
        }
    }
}
