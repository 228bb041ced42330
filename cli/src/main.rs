mod session;

use std::path::PathBuf;
use std::sync::Arc;

use api::auth::{self, LoginForm};
use api::client::{HttpTimeouts, build_http, normalize_base_url};
use api::services::{admins, payments, statistics, stories, users, withdrawals};
use api::types::ListQuery;
use api::types::withdrawals::{StatusFilter, StatusUpdate, WithdrawalQuery, WithdrawalStatus};
use api::{ApiClient, ApiError};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::session::{FileTokenStore, SessionError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("login failed: {0}")]
    Login(String),
    #[error("story {0} not found")]
    StoryNotFound(String),
    #[error("bulk update failed: {0}")]
    BulkUpdate(String),
    #[error("cannot read {path}: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("invalid value `{0}`")]
    InvalidValue(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "console-cli", about = "Partner console backend CLI")]
struct Cli {
    #[arg(long, env = "CONSOLE_API_URL", default_value = "http://localhost:8000/api")]
    api_url: String,

    #[arg(long, env = "CONSOLE_SESSION_FILE", default_value = ".console-session.json")]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "CONSOLE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Profile,
    #[command(subcommand)]
    Partners(PartnersCommand),
    #[command(subcommand)]
    Users(ListOnly),
    #[command(subcommand)]
    Payments(ListOnly),
    #[command(subcommand)]
    Withdrawals(WithdrawalsCommand),
    #[command(subcommand)]
    Stories(StoriesCommand),
    #[command(subcommand)]
    Stats(StatsCommand),
}

#[derive(Args, Debug, Default)]
struct ListArgs {
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    page_size: Option<u32>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    partner_id: Option<i64>,
}

impl ListArgs {
    fn into_query(self) -> ListQuery {
        ListQuery {
            page: self.page,
            page_size: self.page_size,
            search: self.search,
            partner_id: self.partner_id,
        }
    }
}

#[derive(Subcommand, Debug)]
enum ListOnly {
    List(ListArgs),
}

#[derive(Subcommand, Debug)]
enum PartnersCommand {
    List(ListArgs),
    Get { partner_id: i64 },
    Toggle { partner_id: i64 },
    Delete { partner_id: i64 },
}

#[derive(Subcommand, Debug)]
enum WithdrawalsCommand {
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long, value_parser = parse_filter, default_value = "ALL")]
        status: StatusFilter,
    },
    Cancel {
        withdrawal_id: i64,
    },
    UpdateStatus {
        withdrawal_id: i64,
        #[arg(long, value_parser = parse_status)]
        status: WithdrawalStatus,
        #[arg(long)]
        hash: Option<String>,
        #[arg(long)]
        error: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum StoriesCommand {
    List(ListArgs),
    Get {
        story_id: String,
    },
    BulkUpdate {
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum StatsCommand {
    Dashboard,
    Partner,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let base_url = normalize_base_url(&cli.api_url)?;
    let store = Arc::new(FileTokenStore::load(&cli.session_file)?);
    let mut client = ApiClient::new(build_http(HttpTimeouts::default())?, &base_url, store.clone())
        .with_cookie_relay(store.clone());
    if let Some(cookie) = store.cookie_header() {
        client = client.with_forwarded_cookie(cookie);
    }
    tracing::debug!(%base_url, session = %store.path().display(), "client ready");

    match cli.command {
        Command::Login { username, password } => {
            let signed_in = auth::sign_in(&client, &LoginForm { username, password }).await;
            if signed_in.redirect.is_none() {
                return Err(CliError::Login(signed_in.notice.message));
            }
            print_json(&signed_in)
        }
        Command::Logout => print_json(&auth::sign_out(&client).await),
        Command::Profile => print_json(&admins::profile(&client).await?),
        Command::Partners(command) => run_partners(&client, command).await,
        Command::Users(ListOnly::List(args)) => print_json(&users::list_users(&client, &args.into_query()).await?),
        Command::Payments(ListOnly::List(args)) => {
            print_json(&payments::list_payments(&client, &args.into_query()).await?)
        }
        Command::Withdrawals(command) => run_withdrawals(&client, command).await,
        Command::Stories(command) => run_stories(&client, command).await,
        Command::Stats(StatsCommand::Dashboard) => print_json(&statistics::dashboard(&client).await?),
        Command::Stats(StatsCommand::Partner) => print_json(&statistics::partner(&client).await?),
    }
}

async fn run_partners(client: &ApiClient, command: PartnersCommand) -> Result<(), CliError> {
    match command {
        PartnersCommand::List(args) => print_json(&admins::list_partners(client, &args.into_query()).await?),
        PartnersCommand::Get { partner_id } => print_json(&admins::get_partner(client, partner_id).await?),
        PartnersCommand::Toggle { partner_id } => print_json(&admins::toggle_partner(client, partner_id).await?),
        PartnersCommand::Delete { partner_id } => print_json(&admins::delete_partner(client, partner_id).await?),
    }
}

async fn run_withdrawals(client: &ApiClient, command: WithdrawalsCommand) -> Result<(), CliError> {
    match command {
        WithdrawalsCommand::List { list, status } => {
            let query = WithdrawalQuery {
                page: list.page,
                page_size: list.page_size,
                search: list.search,
                status,
            };
            print_json(&withdrawals::list_withdrawals(client, &query).await?)
        }
        WithdrawalsCommand::Cancel { withdrawal_id } => {
            withdrawals::cancel_withdrawal(client, withdrawal_id).await?;
            print_json(&serde_json::json!({ "cancelled": withdrawal_id }))
        }
        WithdrawalsCommand::UpdateStatus {
            withdrawal_id,
            status,
            hash,
            error,
        } => {
            let update = StatusUpdate {
                status,
                ton_transaction_hash: hash,
                error_message: error,
            };
            print_json(&withdrawals::update_status(client, withdrawal_id, &update).await?)
        }
    }
}

async fn run_stories(client: &ApiClient, command: StoriesCommand) -> Result<(), CliError> {
    match command {
        StoriesCommand::List(args) => print_json(&stories::list_stories(client, &args.into_query()).await?),
        StoriesCommand::Get { story_id } => match stories::get_story(client, &story_id).await {
            Some(story) => print_json(&story),
            None => Err(CliError::StoryNotFound(story_id)),
        },
        StoriesCommand::BulkUpdate { file } => {
            let bytes = tokio::fs::read(&file).await.map_err(|source| CliError::ReadFile {
                path: file.clone(),
                source,
            })?;
            let file_name = file
                .file_name()
                .map_or_else(|| "stories.json".to_owned(), |name| name.to_string_lossy().into_owned());
            let result = stories::bulk_update_from_file(client, &file_name, bytes).await;
            if !result.success {
                return Err(CliError::BulkUpdate(result.message));
            }
            print_json(&result)
        }
    }
}

/// Parse an upper- or lower-case wire name through the type's serde form.
fn parse_wire<T: DeserializeOwned>(raw: &str) -> Result<T, CliError> {
    serde_json::from_value(Value::String(raw.trim().to_ascii_uppercase()))
        .map_err(|_| CliError::InvalidValue(raw.to_owned()))
}

fn parse_filter(raw: &str) -> Result<StatusFilter, String> {
    parse_wire(raw).map_err(|e| e.to_string())
}

fn parse_status(raw: &str) -> Result<WithdrawalStatus, String> {
    parse_wire(raw).map_err(|e| e.to_string())
}

fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
