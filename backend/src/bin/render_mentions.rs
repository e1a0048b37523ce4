//! Render account mentions in a markup file to HTML.
//!
//! The first render links every new mention to its guessed profile URI. With
//! `--settle` the command then waits for the background WebFinger lookups and
//! prints a second render using the corrected links.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tokio::io::AsyncReadExt;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use wiki_backend::domain::{AccountCache, MentionResolver, TokioExecutor};
use wiki_backend::inbound::markup::{InlineParser, render_html};
use wiki_backend::outbound::webfinger::WebFingerHttpSource;
use wiki_backend::settings::MentionSettings;

/// `render-mentions` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "render-mentions",
    about = "Render @user@domain mentions in markup as profile links",
    version
)]
struct CliArgs {
    /// Markup file to render. Reads standard input when omitted.
    #[arg(long = "input", value_name = "path")]
    input: Option<PathBuf>,
    /// Wait for profile lookups and print a second, corrected render.
    #[arg(long = "settle")]
    settle: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::try_parse()?;
    let settings = MentionSettings::load_from_iter([OsString::from("render-mentions")])
        .map_err(|error| eyre!("failed to load mention settings: {error}"))?;
    init_tracing(settings.json_logs);

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create Tokio runtime")?;
    runtime.block_on(async_main(args, settings))
}

fn init_tracing(json_logs: bool) {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    let result = if json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

async fn async_main(args: CliArgs, settings: MentionSettings) -> Result<()> {
    let markup = read_markup(args.input.as_ref()).await?;

    let source = WebFingerHttpSource::with_user_agent(settings.user_agent())
        .context("failed to build WebFinger client")?;
    let executor = Arc::new(TokioExecutor::current().context("no Tokio runtime in scope")?);
    let cache = Arc::new(AccountCache::new());
    let resolver = MentionResolver::new(Arc::clone(&cache), Arc::new(source), executor.clone());

    let mut parser = InlineParser::new();
    parser.register(Arc::new(resolver));

    println!("{}", render_html(&parser.parse(&markup)));

    if args.settle {
        info!(pending = executor.pending(), "waiting for profile lookups");
        executor.drain().await;
        info!(accounts = cache.len(), "profile lookups settled");
        println!("{}", render_html(&parser.parse(&markup)));
    }
    Ok(())
}

async fn read_markup(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read markup from {}", path.display())),
        None => {
            let mut markup = String::new();
            tokio::io::stdin()
                .read_to_string(&mut markup)
                .await
                .context("failed to read markup from standard input")?;
            Ok(markup)
        }
    }
}
