//! wa-bridge CLI
//!
//! Sends a message through the WhatsApp bridge engine (or only listens) and
//! prints what the session produced.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod error;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use application::{ApplicationError, BridgeOutcome, BridgeService, SessionOptions};
use clap::Parser;
use domain::{BridgeCommand, ChatTarget};
use infrastructure::{AppConfig, WhatsAppBridgeAdapter, init_logging};
use integration_whatsapp::{BridgeGateway, NativeEngine};
use tracing::{debug, info};

use crate::error::CliError;

/// Text sent when `--message` is not given
const DEFAULT_MESSAGE: &str = "Hello from wa-bridge!";

/// wa-bridge CLI
#[derive(Debug, Parser)]
#[command(name = "wa-bridge")]
#[command(author, version, about = "Talk to WhatsApp through the bridge engine library", long_about = None)]
struct Cli {
    /// Path to the engine shared library [default: dist/libwa.so]
    #[arg(long = "lib", value_name = "PATH")]
    library: Option<PathBuf>,

    /// Session store connection URI [default: file:whatsapp.db?_foreign_keys=on]
    #[arg(long, value_name = "URI")]
    db_uri: Option<String>,

    /// Phone number of the account to act as
    #[arg(long, value_name = "PHONE")]
    account_phone: Option<String>,

    /// Recipient phone number or JID (required unless --read-only)
    #[arg(long, value_name = "TARGET")]
    recipient: Option<String>,

    /// Text to send
    #[arg(long, default_value = DEFAULT_MESSAGE)]
    message: String,

    /// Only collect messages, send nothing
    #[arg(long)]
    read_only: bool,

    /// Maximum number of messages to collect
    #[arg(long, value_name = "N")]
    read_limit: Option<u32>,

    /// How long to listen for messages
    #[arg(long, value_name = "SECONDS", allow_negative_numbers = true)]
    listen_seconds: Option<f64>,

    /// Chat to read from (defaults to the recipient)
    #[arg(long, value_name = "TARGET")]
    read_chat: Option<String>,

    /// Print QR codes when the account needs pairing
    #[arg(long)]
    show_qr: bool,

    /// Clear the stored session and pair again
    #[arg(long)]
    force_relink: bool,

    /// Config file (TOML) [default: ./wa-bridge.toml if present]
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// What a run asks the engine to do
#[derive(Debug, Clone, PartialEq)]
enum Action {
    Send { recipient: ChatTarget, text: String },
    Read { chat: ChatTarget },
    Status,
}

impl Cli {
    /// Overlay flags on the loaded configuration
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(library) = &self.library {
            config.library_path.clone_from(library);
        }
        if let Some(db_uri) = &self.db_uri {
            config.db_uri.clone_from(db_uri);
        }
        if let Some(phone) = &self.account_phone {
            config.account_phone = Some(phone.clone());
        }
        if self.verbose > 0 {
            config.logging.level = Some(log_filter_from_verbosity(self.verbose).to_string());
        }
    }

    fn action(&self) -> Result<Action, CliError> {
        let recipient = self.recipient.as_deref().map(ChatTarget::new).transpose()?;

        if !self.read_only {
            let recipient = recipient.ok_or_else(|| {
                CliError::Usage("--recipient is required unless --read-only is set".to_string())
            })?;
            return Ok(Action::Send {
                recipient,
                text: self.message.clone(),
            });
        }

        let read_chat = self.read_chat.as_deref().map(ChatTarget::new).transpose()?;
        Ok(match read_chat.or(recipient) {
            Some(chat) => Action::Read { chat },
            None => Action::Status,
        })
    }

    fn session_options(&self) -> Result<SessionOptions, CliError> {
        if let Some(seconds) = self.listen_seconds {
            BridgeCommand::default()
                .with_listen_seconds(seconds)
                .validate()?;
        }

        Ok(SessionOptions {
            read_chat: self.read_chat.as_deref().map(ChatTarget::new).transpose()?,
            read_limit: self.read_limit,
            listen_seconds: self.listen_seconds,
            show_qr: self.show_qr,
            force_relink: self.force_relink,
        })
    }
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Load the engine and wire the service to it
#[allow(unsafe_code)]
fn connect(config: &AppConfig) -> Result<BridgeService, CliError> {
    let db_uri = config.connection_uri()?;
    let account = config.account_id()?;

    // SAFETY: the library path is chosen by the operator through flags,
    // config or environment, and must name a trusted engine build.
    let engine = unsafe {
        NativeEngine::load_with_symbols(&config.library_path, &config.engine.symbols())
    }?;
    let library = engine.path().to_path_buf();
    let gateway = BridgeGateway::with_options(engine, config.gateway.options());
    let adapter = WhatsAppBridgeAdapter::new(gateway, db_uri, account);

    info!(
        library = %library.display(),
        account = %adapter.account(),
        "Bridge engine ready"
    );
    Ok(BridgeService::new(Arc::new(adapter)))
}

async fn execute(
    service: &BridgeService,
    action: Action,
    options: &SessionOptions,
) -> Result<BridgeOutcome, ApplicationError> {
    match action {
        Action::Send { recipient, text } => service.send_message(recipient, &text, options).await,
        Action::Read { chat } => service.read_messages(chat, options).await,
        Action::Status => service.check_status(options).await,
    }
}

async fn run(cli: Cli) -> Result<BridgeOutcome, CliError> {
    let mut config =
        AppConfig::load(cli.config.as_deref()).map_err(|e| CliError::Configuration(e.to_string()))?;
    cli.apply_to(&mut config);
    init_logging(&config.logging)?;

    let action = cli.action()?;
    let options = cli.session_options()?;
    debug!(?action, library = %config.library_path.display(), "Starting bridge call");

    let service = connect(&config)?;
    let outcome = execute(&service, action, &options).await?;

    info!(requires_qr = outcome.requires_qr, "Bridge call finished");
    Ok(outcome)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(outcome) => {
            print!("{}", report::render(&outcome));
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        },
    }
}
