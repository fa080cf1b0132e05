//! repoinit - Bootstrap a new repository
//!
//! Main entry point for the repoinit CLI.

use clap::{Parser, Subcommand};
use gitcmd::Git;
use repoinit::config::{RepoInitConfig, DEFAULT_APP_NAME};
use repoinit::integrations::{GitHubConnector, GitignoreService, HostConnector, RepoHost};
use repoinit::provisioning::prompt::{Prompter, TerminalPrompter};
use repoinit::provisioning::{
    self, GitignoreOutcome, ProvisionOptions, ProvisionReport, Provisioner,
};
use repoinit::storage::{self, AppDirectory};
use repoinit::{style, RepoInitError};
use std::path::PathBuf;
use std::process;

/// repoinit - Create a GitHub repository and push the current directory to it
#[derive(Parser, Debug)]
#[command(name = "repoinit")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: ~/.<user>_data/<app>/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Application name used for the data directory
    #[arg(long, global = true, env = "REPOINIT_APP_NAME", default_value = DEFAULT_APP_NAME)]
    app_name: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a remote repository and push the working directory to it (default)
    New {
        /// Repository name (prompted when omitted)
        #[arg(short, long)]
        name: Option<String>,

        /// Create a public repository
        #[arg(long)]
        public: bool,

        /// Directory to turn into the repository (default: current directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Don't offer to generate a .gitignore
        #[arg(long)]
        no_gitignore: bool,
    },

    /// Delete a repository owned by the authenticated user
    Delete {
        /// Repository name
        name: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the account the stored token belongs to
    Whoami,

    /// Remove the stored token
    Logout,

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    if let Err(e) = repoinit::logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        if e.is_tool_not_found() {
            eprintln!("Install git and make sure it is on your PATH, then run repoinit again.");
        }
        process::exit(1);
    }
}

async fn run(cli: Cli) -> repoinit::Result<()> {
    let app_dir = provisioning::resolve_directory(None, &cli.app_name)?;

    let command = cli.command.unwrap_or(Commands::New {
        name: None,
        public: false,
        dir: None,
        no_gitignore: false,
    });

    let explicit_config = cli.config;

    match command {
        Commands::New {
            name,
            public,
            dir,
            no_gitignore,
        } => {
            let config = load_config(explicit_config, &app_dir)?;
            let workdir = match dir {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };
            if !workdir.is_dir() {
                return Err(RepoInitError::Config(format!(
                    "Not a directory: {}",
                    workdir.display()
                )));
            }

            let mut options = ProvisionOptions::from_config(&config, &workdir);
            options.repo_name = name;
            options.private = config.private && !public;
            options.gitignore = !no_gitignore;

            let mut prompter = TerminalPrompter::new();
            let connector = GitHubConnector::new(&config.api_url, config.request_timeout());
            let git = Git::with_workdir(&workdir);
            let templates =
                GitignoreService::new(&config.gitignore_api_url, config.request_timeout())?;

            println!("{}", style::header("Bootstrapping repository"));
            let report = Provisioner::new(
                app_dir,
                options,
                &mut prompter,
                &connector,
                &git,
                &templates,
            )
            .run()
            .await?;

            print_report(&report);
        }

        Commands::Delete { name, yes } => {
            let config = load_config(explicit_config, &app_dir)?;
            let host = connect_stored(&app_dir, &config)?;
            let owner = host.fetch_owner_identity().await?;
            let name = provisioning::normalize_repo_name(&name);

            if !yes {
                let prompt = format!("Delete {}/{}? This cannot be undone", owner.login, name);
                if !TerminalPrompter::new().confirm(&prompt, false)? {
                    println!("  {} Nothing deleted", style::dim("-"));
                    return Ok(());
                }
            }

            let outcome = host.delete_repository(&owner.login, &name).await?;
            println!(
                "  {} {}/{}: {}",
                if outcome.is_success() { style::check() } else { style::cross() },
                owner.login,
                name,
                style::outcome(outcome.is_success(), outcome.message())
            );
            if !outcome.is_success() {
                return Err(RepoInitError::Provisioning(format!(
                    "delete {}/{}: {}",
                    owner.login,
                    name,
                    outcome.message()
                )));
            }
        }

        Commands::Whoami => {
            let config = load_config(explicit_config, &app_dir)?;
            let host = connect_stored(&app_dir, &config)?;
            let owner = host.fetch_owner_identity().await?;
            println!("{} ({})", style::name(&owner.login), style::path(&owner.html_url));
        }

        Commands::Logout => {
            let config = load_config(explicit_config, &app_dir)?;
            let path = config.credential_path(&app_dir);
            if path.exists() {
                std::fs::remove_file(&path)?;
                println!(
                    "  {} Removed {}",
                    style::check(),
                    style::path(&path.display().to_string())
                );
            } else {
                println!("  {} No stored token", style::dim("-"));
            }
        }

        Commands::Config(config_cmd) => {
            handle_config_command(&config_cmd, &app_dir, explicit_config)?;
        }
    }

    Ok(())
}

/// Explicit path must exist; the default one falls back to defaults
fn load_config(
    explicit: Option<PathBuf>,
    app_dir: &AppDirectory,
) -> repoinit::Result<RepoInitConfig> {
    let config = match explicit {
        Some(path) => RepoInitConfig::load(path)?,
        None => RepoInitConfig::load_or_default(app_dir)?,
    };
    tracing::info!(app_dir = %app_dir.app_data_dir.display(), "Configuration loaded");
    Ok(config)
}

/// Build a host client from the stored credential, without prompting
fn connect_stored(
    app_dir: &AppDirectory,
    config: &RepoInitConfig,
) -> repoinit::Result<Box<dyn RepoHost>> {
    let path = config.credential_path(app_dir);
    if !path.exists() {
        return Err(RepoInitError::Credential(format!(
            "No stored token at {}. Run 'repoinit new' to create one.",
            path.display()
        )));
    }

    let document = storage::read_credentials(&path)?;
    GitHubConnector::new(&config.api_url, config.request_timeout()).connect(document.token()?)
}

fn handle_config_command(
    cmd: &ConfigCommands,
    app_dir: &AppDirectory,
    explicit: Option<PathBuf>,
) -> repoinit::Result<()> {
    let path = explicit.unwrap_or_else(|| RepoInitConfig::default_path(app_dir));

    match cmd {
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                return Err(RepoInitError::Config(format!(
                    "Config already exists at {}. Use --force to overwrite.",
                    path.display()
                )));
            }
            RepoInitConfig::new().save(&path)?;
            println!("  {} Wrote {}", style::check(), style::path(&path.display().to_string()));
        }

        ConfigCommands::Show => {
            let config = if path.exists() {
                RepoInitConfig::load(&path)?
            } else {
                RepoInitConfig::new()
            };
            println!("# {}", path.display());
            print!("{}", serde_yaml::to_string(&config)?);
        }
    }

    Ok(())
}

fn print_report(report: &ProvisionReport) {
    println!();
    println!("{}", style::header("Summary"));
    println!("  Owner:      {}", style::name(&report.owner.login));
    println!("  Repository: {}", style::name(&report.repository));
    println!("  Remote:     {}", style::path(&report.remote_url));
    println!(
        "  Local repo: {}",
        if report.initialized { "initialized" } else { "already existed" }
    );

    let gitignore = match &report.gitignore {
        GitignoreOutcome::AlreadyExists => "kept existing file".to_string(),
        GitignoreOutcome::Disabled => "disabled".to_string(),
        GitignoreOutcome::Declined => "skipped".to_string(),
        GitignoreOutcome::Written { topics } => format!("generated for {}", topics.join(", ")),
        GitignoreOutcome::Failed { reason } => format!("not generated ({})", reason),
    };
    println!("  .gitignore: {}", gitignore);
    println!("  Data dir:   {}", style::path(&report.app_dir.app_data_dir.display().to_string()));
}
