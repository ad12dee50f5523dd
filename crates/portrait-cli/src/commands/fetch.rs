use anyhow::{Context, Result};
use console::Term;
use portrait_browser::{ChromeFinder, ProfileManager, SessionConfig, SessionManager};
use portrait_core::config::{BatchConfig, StoreConfig};
use portrait_core::{BatchDriver, Credentials, ImageStore};
use std::path::PathBuf;
use std::time::Duration;

/// Options for a fetch run, as given on the command line
pub struct FetchOptions {
    pub output: PathBuf,
    pub registry: Option<PathBuf>,
    pub chrome_path: Option<PathBuf>,
    /// Named persistent profile; `None` means a temporary one
    pub profile: Option<String>,
    pub headful: bool,
    pub delay: Duration,
    pub element_timeout: Duration,
    pub login_timeout: Duration,
    pub identity: Option<String>,
}

/// Environment variable the password may be supplied in
pub const SECRET_ENV: &str = "PORTRAIT_SECRET";

pub fn execute(options: FetchOptions) -> Result<()> {
    // Fail on a bad registry or missing Chrome before asking for credentials
    let registry = super::registry::load(options.registry.as_deref())?;

    println!("🔍 Locating Chrome...");
    let chrome_binary = ChromeFinder::new(options.chrome_path.clone()).find()?;
    println!("✅ Found Chrome at: {}", chrome_binary.display());

    let profile = match &options.profile {
        Some(name) => {
            let profile = ProfileManager::named(name)?;
            println!("📁 Using profile: {}", profile.path().display());
            profile
        }
        None => {
            println!("📁 Using temporary profile");
            ProfileManager::temporary()?
        }
    };

    let secret = std::env::var(SECRET_ENV).ok().filter(|s| !s.is_empty());
    let credentials = read_credentials(options.identity.clone(), secret)?;

    let mut session_config = SessionConfig {
        headless: !options.headful,
        ..SessionConfig::default()
    };
    session_config.locator.element_timeout = options.element_timeout;
    session_config.login.confirm_timeout = options.login_timeout;

    let sessions = SessionManager::new(chrome_binary, profile, session_config);
    let store = ImageStore::new(StoreConfig::default()).context("Failed to build HTTP client")?;
    let driver = BatchDriver::new(
        store,
        BatchConfig {
            delay: options.delay,
        },
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    println!(
        "📸 Collecting {} photos into {}",
        registry.len(),
        options.output.display()
    );

    let result = runtime.block_on(async {
        let shutdown = async {
            if tokio::signal::ctrl_c().await.is_err() {
                // No signal handler; never interrupt
                std::future::pending::<()>().await;
            }
            println!();
            println!("🛑 Interrupted, closing browser...");
        };

        driver
            .run_until(&sessions, &registry, &credentials, &options.output, shutdown)
            .await
    });

    runtime.shutdown_timeout(Duration::from_millis(100));

    let report = result?;
    tracing::debug!("{:?}", report);
    println!("✅ Done");

    Ok(())
}

/// Identity from the flag or environment, secret from the environment, prompting for whatever is missing
fn read_credentials(identity: Option<String>, secret: Option<String>) -> Result<Credentials> {
    let term = Term::stderr();

    let identity = match identity {
        Some(identity) => identity,
        None => {
            term.write_str("Enter LinkedIn email: ")?;
            term.read_line().context("Failed to read email")?
        }
    };

    let secret = match secret {
        Some(secret) => secret,
        None => {
            term.write_str("Enter LinkedIn password: ")?;
            term.read_secure_line().context("Failed to read password")?
        }
    };

    let identity = identity.trim().to_string();
    if identity.is_empty() {
        anyhow::bail!("An email address is required to sign in");
    }

    Ok(Credentials::new(identity, secret))
}
