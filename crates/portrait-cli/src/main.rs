use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use portrait_cli::OutputFormat;
use portrait_cli::commands;
use portrait_core::config::DEFAULT_OUTPUT_DIR;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "portrait")]
#[command(author, version, long_about = None)]
#[command(
    about = "Collect profile photos through an authenticated browser session",
    long_about = "Portrait signs into the social network with a headless Chrome, visits every profile \
                  in the registry, and saves each profile photo as <local_id>.jpg."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and download the photo of every profile in the registry
    Fetch {
        /// Directory the photos are written to
        #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
        output: PathBuf,

        /// JSON registry file (defaults to the built-in founders list)
        #[arg(long, value_name = "FILE")]
        registry: Option<PathBuf>,

        /// Path to the Chrome binary
        #[arg(long, value_name = "PATH")]
        chrome_path: Option<PathBuf>,

        /// Named browser profile, kept between runs
        #[arg(long, default_value = "default", conflicts_with = "temp")]
        profile: String,

        /// Use a temporary profile, deleted afterwards
        #[arg(long)]
        temp: bool,

        /// Show the browser window
        #[arg(long)]
        headful: bool,

        /// Seconds to pause between profiles
        #[arg(long, value_name = "SECS", default_value_t = 2)]
        delay_secs: u64,

        /// Seconds to wait for the photo on each profile page
        #[arg(long, value_name = "SECS", default_value_t = 10)]
        timeout_secs: u64,

        /// Seconds to wait for the login to be confirmed
        #[arg(long, value_name = "SECS", default_value_t = 30)]
        login_timeout_secs: u64,

        /// Sign-in email (prompted for when absent). The password is read from
        /// PORTRAIT_SECRET or prompted for without echo.
        #[arg(long, env = "PORTRAIT_IDENTITY")]
        identity: Option<String>,
    },

    /// Show the profiles that fetch would process
    Registry {
        /// JSON registry file (defaults to the built-in founders list)
        #[arg(long, value_name = "FILE")]
        registry: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    #[command(after_help = "SUPPORTED SHELLS: bash, zsh, fish, powershell, elvish\n\n\
                            INSTALLATION:\n  \
                            bash: portrait completion --shell bash >> ~/.bashrc\n  \
                            zsh:  portrait completion --shell zsh >> ~/.zshrc\n  \
                            fish: portrait completion --shell fish > ~/.config/fish/completions/portrait.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Fetch {
            output,
            registry,
            chrome_path,
            profile,
            temp,
            headful,
            delay_secs,
            timeout_secs,
            login_timeout_secs,
            identity,
        } => commands::fetch::execute(commands::fetch::FetchOptions {
            output,
            registry,
            chrome_path,
            profile: (!temp).then_some(profile),
            headful,
            delay: Duration::from_secs(delay_secs),
            element_timeout: Duration::from_secs(timeout_secs),
            login_timeout: Duration::from_secs(login_timeout_secs),
            identity,
        }),
        Commands::Registry { registry } => {
            commands::registry::execute(registry.as_deref(), cli.format)
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("portrait=debug,portrait_core=debug,portrait_browser=debug")
    } else {
        EnvFilter::new("portrait=info,portrait_core=info,portrait_browser=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
