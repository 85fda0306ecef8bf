//! webmcp-kit Devtools
//!
//! Inspect and invoke tools registered on the process-wide host.

#![warn(missing_docs)]
#![warn(clippy::all)]

use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::fs::File;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;
use webmcp_devtools::{ConsoleBroker, DevtoolsConfig, TuiApp, register_demo_tools};
use webmcp_tool::{AutoBroker, SharedBroker, ToolDescriptor, context};

const DEFAULT_FILTER: &str = "webmcp=info";

#[derive(Parser)]
#[command(name = "webmcp-devtools")]
#[command(about = "Inspect and invoke webmcp tools", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Do not register the demo tools
    #[arg(long, global = true)]
    no_demo: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive harness (default)
    Tui {
        /// Start with the body hidden
        #[arg(long)]
        minimized: bool,
        /// Answer handler prompts automatically
        #[arg(long)]
        no_interactive: bool,
    },
    /// Print the active host's tools
    List {
        /// Print descriptors as JSON
        #[arg(long)]
        json: bool,
    },
    /// Invoke a tool and print the result
    Call {
        /// Tool name
        name: String,
        /// Arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        input: String,
        /// Ask on the console when the tool requests interaction
        #[arg(long)]
        interactive: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let mut config = DevtoolsConfig::load_or_default(cli.config.as_deref())?;
    if cli.no_demo {
        config.demo_tools = false;
    }
    let command = cli.command.unwrap_or(Commands::Tui {
        minimized: false,
        no_interactive: false,
    });
    init_tracing(&command, &config)?;

    let adapter = Arc::clone(context::global());
    if config.demo_tools {
        register_demo_tools(&adapter)?;
    }

    match command {
        Commands::Tui {
            minimized,
            no_interactive,
        } => {
            config.start_minimized |= minimized;
            config.interactive &= !no_interactive;
            TuiApp::new(adapter, config).run().await?;
        }
        Commands::List { json } => {
            let tools = adapter.list();
            if json {
                let descriptors: Vec<ToolDescriptor> =
                    tools.iter().map(|t| t.to_descriptor()).collect();
                println!("{}", serde_json::to_string_pretty(&descriptors)?);
            } else if tools.is_empty() {
                println!("No tools registered ({} host)", adapter.host_kind());
            } else {
                println!("{} tools ({} host)", tools.len(), adapter.host_kind());
                let width = tools.iter().map(|t| t.name().len()).max().unwrap_or(0);
                for tool in &tools {
                    println!("  {:width$}  {}", tool.name(), tool.description());
                }
            }
        }
        Commands::Call {
            name,
            input,
            interactive,
        } => {
            let broker: SharedBroker = if interactive {
                Arc::new(ConsoleBroker::stdio())
            } else {
                AutoBroker::shared()
            };
            let result = adapter.execute_serialized(&name, &input, broker).await?;
            println!("{}", result.to_display_text());
            if result.is_error() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Console commands log to stderr. The TUI owns the terminal, so it logs
/// to the configured file or not at all.
fn init_tracing(command: &Commands, config: &DevtoolsConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    match (command, &config.log_file) {
        (Commands::Tui { .. }, None) => {}
        (Commands::Tui { .. }, Some(path)) => {
            let file = File::options().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}
