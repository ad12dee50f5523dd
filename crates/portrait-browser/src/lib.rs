mod chrome_finder;
mod error;
mod launcher;
pub mod locator;
pub mod login;
pub mod page;
mod profile;
mod session;

pub use chrome_finder::ChromeFinder;
pub use error::{Error, Result};
pub use launcher::ChromeLauncher;
pub use locator::{LocatorConfig, PhotoLocator};
pub use login::LoginConfig;
pub use profile::ProfileManager;
pub use session::{BrowserSession, SessionConfig, SessionManager};
