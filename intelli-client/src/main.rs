//! intelli-console: command-line front end for the IntelliHub console
//!
//! Keeps its session in `INTELLI_STORAGE_DIR` so consecutive invocations
//! share a login.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use intelli_client::{ClientConfig, ConsoleApp, LoginRequest, RestoreOutcome, TracingNotifier};
use shared::models::ChatRequest;

#[derive(Parser, Debug)]
#[command(name = "intelli-console")]
#[command(about = "IntelliHub admin console client")]
struct Args {
    /// Gateway base URL, API prefix included
    #[arg(long, env = "INTELLI_API_BASE_URL")]
    base_url: Option<String>,

    /// Session storage directory
    #[arg(long, env = "INTELLI_STORAGE_DIR")]
    storage_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "INTELLI_PASSWORD")]
        password: String,
    },
    /// Log out and forget the session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Run the route guard for a console path
    Navigate { path: String },
    /// Stream a chat completion
    Chat {
        message: String,
        #[arg(long, default_value = "qwen-turbo")]
        model: String,
        /// Continue an existing conversation
        #[arg(long)]
        conversation: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intelli_client=info,intelli_console=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = ClientConfig::from_env();
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(dir) = args.storage_dir {
        config = config.with_storage_dir(dir);
    }

    let mut app = ConsoleApp::with_file_storage(&config, Arc::new(TracingNotifier))
        .context("Failed to initialize console")?;
    let restored = app.start().await.context("Failed to restore session")?;
    tracing::debug!(?restored, "Session restore finished");

    match args.command {
        Command::Login { username, password } => {
            let navigation = app
                .login(&LoginRequest::new(username, password))
                .await
                .context("Login failed")?;
            let user = app.store().user().map(|u| u.username.as_str()).unwrap_or("?");
            println!("Logged in as {user}");
            println!("{} ({})", navigation.title, navigation.location);
        }
        Command::Logout => {
            if restored == RestoreOutcome::Anonymous {
                println!("Not logged in");
                return Ok(());
            }
            app.logout().await?;
            println!("Logged out");
        }
        Command::Whoami => {
            app.refresh_profile().await.ok();
            match app.store().user() {
                Some(user) => {
                    println!("{} ({})", user.username, user.role);
                    if let Some(tenant) = user.tenant_name.as_deref().or(user.tenant_id.as_deref()) {
                        println!("tenant: {tenant}");
                    }
                    let permissions: Vec<&str> = app.store().permissions().collect();
                    println!("permissions: {}", permissions.join(", "));
                }
                None => println!("Not logged in"),
            }
        }
        Command::Navigate { path } => {
            let navigation = app.navigate(&path)?;
            if let Some(from) = &navigation.redirected_from {
                println!("redirected from {from}");
            }
            println!("{} ({})", navigation.title, navigation.location);
        }
        Command::Chat {
            message,
            model,
            conversation,
        } => {
            if !app.store().is_authenticated() {
                bail!("Log in first");
            }
            let request = ChatRequest {
                message,
                model,
                conversation_id: conversation,
                stream: Some(true),
                ..Default::default()
            };

            let mut failure = None;
            app.api()
                .aigc
                .stream_chat(
                    &request,
                    |fragment| {
                        print!("{fragment}");
                        let _ = std::io::stdout().flush();
                    },
                    || println!(),
                    |e| failure = Some(e),
                )
                .await;
            app.process_signals();
            if let Some(e) = failure {
                return Err(e).context("Chat stream failed");
            }
        }
    }

    Ok(())
}
