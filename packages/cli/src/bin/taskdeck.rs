use clap::{Parser, Subcommand};
use colored::*;
use std::process;

mod cli;

use cli::chat::{handle_chat_command, ChatCommands};
use cli::clients::{handle_clients_command, ClientsCommands};
use cli::config::{handle_config_command, ConfigCommands};
use cli::issues::{handle_issues_command, IssuesCommands};
use cli::projects::{handle_projects_command, ProjectsCommands};
use cli::tasks::{handle_tasks_command, TasksCommands};
use cli::time::{handle_time_command, TimeCommands};
use taskdeck_cli::{build_services, init_logging, StoreMode};

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(about = "Taskdeck CLI - clients, projects, tasks, time, issues, and team chat")]
#[command(version)]
struct Cli {
    /// Use a seeded in-memory store instead of the hosted backend
    #[arg(long, global = true)]
    offline: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage clients
    #[command(subcommand)]
    Clients(ClientsCommands),
    /// Manage projects
    #[command(subcommand)]
    Projects(ProjectsCommands),
    /// Manage tasks
    #[command(subcommand)]
    Tasks(TasksCommands),
    /// Track time
    #[command(subcommand)]
    Time(TimeCommands),
    /// Track issues
    #[command(subcommand)]
    Issues(IssuesCommands),
    /// Team and project chat
    #[command(subcommand)]
    Chat(ChatCommands),
    /// Inspect or edit configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = handle_command(cli.command, StoreMode::from_flag(cli.offline)).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands, mode: StoreMode) -> anyhow::Result<()> {
    match command {
        Commands::Config(command) => handle_config_command(command).await,
        Commands::Clients(command) => {
            handle_clients_command(&build_services(mode).await?, command).await
        }
        Commands::Projects(command) => {
            handle_projects_command(&build_services(mode).await?, command).await
        }
        Commands::Tasks(command) => handle_tasks_command(&build_services(mode).await?, command).await,
        Commands::Time(command) => handle_time_command(&build_services(mode).await?, command).await,
        Commands::Issues(command) => {
            handle_issues_command(&build_services(mode).await?, command).await
        }
        Commands::Chat(command) => handle_chat_command(&build_services(mode).await?, command).await,
    }
}
