use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Manages Chrome profile directories
pub struct ProfileManager {
    path: PathBuf,
    is_temporary: bool,
}

impl ProfileManager {
    /// Create a temporary profile that will be deleted on drop
    pub fn temporary() -> Result<Self> {
        let temp_dir = tempfile::Builder::new().prefix("portrait-profile-").tempdir()?;

        Ok(Self {
            path: temp_dir.keep(),
            is_temporary: true,
        })
    }

    /// Create or use a persistent profile at the given path
    pub fn persistent(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(&path)?;
        }

        Ok(Self {
            path,
            is_temporary: false,
        })
    }

    /// Persistent profile `name` under the profiles directory.
    ///
    /// Signed-in cookies survive between runs, so later runs can skip the login form.
    pub fn named(name: &str) -> Result<Self> {
        if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
            return Err(Error::Browser(format!("Invalid profile name: '{}'", name)));
        }
        Self::persistent(Self::get_profiles_dir()?.join(name))
    }

    /// Directory holding all named profiles (`~/.portrait/profiles`)
    pub fn get_profiles_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Browser("Could not determine home directory".to_string()))?;
        Ok(home.join(".portrait").join("profiles"))
    }

    /// Get the profile directory path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if this is a temporary profile
    pub fn is_temporary(&self) -> bool {
        self.is_temporary
    }
}

impl Drop for ProfileManager {
    fn drop(&mut self) {
        if self.is_temporary && self.path.exists() {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}
