use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

mod composer;
mod config;
mod console;
mod datetime;
mod error;
mod history;
mod logger;
mod project;
mod time_entry;
mod time_window;
mod toggl;

use composer::EntryComposer;
use config::{Config, ConfigError};
use console::{ConsoleDescriptionPrompt, ConsoleLine, ConsolePresenter, DescriptionPrompt};
use history::{DescriptionHistory, DEFAULT_SUGGESTION_LIMIT};
use toggl::{TogglClient, DEFAULT_API_URL};

/// 指定したプロジェクトにtime entryを作成するためのCLIアプリケーション。
///
/// # Examples
/// ```
/// $ toggl-entry -d "review" -s 08:00AM -e 04:30PM
/// $ toggl-entry -p Camunda
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
pub struct Args {
    #[clap(
        short = 'a',
        long = "api-token",
        env = "TOGGL_API_TOKEN",
        hide_env_values = true,
        help = "Toggl API token"
    )]
    api_token: Option<String>,

    #[clap(
        short = 'd',
        long = "description",
        help = "Task description, chosen from recent entries if omitted"
    )]
    description: Option<String>,

    #[clap(
        short = 's',
        long = "start",
        default_value = "08:00AM",
        help = "Start time, e.g. 08:00AM"
    )]
    start: String,

    #[clap(
        short = 'e',
        long = "end",
        default_value = "04:30PM",
        help = "End time, e.g. 04:30PM"
    )]
    end: String,

    #[clap(
        short = 'p',
        long = "project",
        default_value = "Camunda",
        help = "Project name to create the entry in"
    )]
    project: String,

    #[clap(
        short = 'w',
        long = "workspace",
        help = "Workspace id, defaults to the first workspace"
    )]
    workspace: Option<i64>,

    #[clap(
        short = 'l',
        long = "limit",
        default_value_t = DEFAULT_SUGGESTION_LIMIT,
        help = "Number of recent descriptions to suggest"
    )]
    limit: usize,

    #[clap(long = "api-url", default_value = DEFAULT_API_URL, hide = true)]
    api_url: String,

    #[clap(short = 'v', long = "verbose", help = "Show debug logs")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logger::init(args.verbose).context("Failed to initialize logger")?;

    let config = match Config::try_from(args) {
        Ok(config) => config,
        // トークンがない場合は案内を表示して正常終了する
        Err(ConfigError::MissingApiToken) => {
            println!("{}", ConfigError::MissingApiToken);
            return Ok(());
        }
    };
    run(config).await
}

/// 説明文を決め、time entryを作成して結果を表示する。
async fn run(config: Config) -> Result<()> {
    let client = TogglClient::new(&config.api_url, &config.api_token);

    let description = match config.description {
        Some(description) => description,
        None => {
            let suggestions = DescriptionHistory::new(&client)
                .latest_descriptions(config.suggestion_limit)
                .await
                .context("Failed to retrieve recent descriptions")?;
            let mut reader = io::stdin().lock();
            let mut writer = io::stdout();
            ConsoleDescriptionPrompt::new(&mut reader, &mut writer).select(&suggestions)?
        }
    };

    let composer = EntryComposer::new(&client, config.project_name, config.workspace);
    let entry = composer
        .execute(&description, &config.start, &config.end)
        .await
        .context("Failed to create time entry")?;
    info!(
        "Created time entry {} in workspace {} (project: {:?}, billable: {})",
        entry.id, entry.workspace_id, entry.project_id, entry.billable
    );

    let mut stdout = io::stdout();
    ConsoleLine::new(&mut stdout).show_created_entry(&entry)?;

    Ok(())
}
