use super::types::Registry;
use crate::{Error, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct RegistryReader;

impl RegistryReader {
    /// Read, parse and validate a registry file
    pub fn from_file(path: &Path) -> Result<Registry> {
        tracing::debug!("Reading registry from: {}", path.display());

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let registry: Registry = serde_json::from_reader(reader)?;
        Self::validate(&registry)?;

        tracing::info!(
            "Loaded registry with {} entries from {}",
            registry.len(),
            path.display()
        );

        Ok(registry)
    }

    /// Parse and validate a registry from a JSON string
    pub fn from_str(content: &str) -> Result<Registry> {
        let registry: Registry = serde_json::from_str(content)?;
        Self::validate(&registry)?;
        Ok(registry)
    }

    /// Check that every entry can be processed and stored safely
    pub fn validate(registry: &Registry) -> Result<()> {
        let mut seen = HashSet::new();

        for (idx, entry) in registry.iter().enumerate() {
            validate_handle(&entry.external_handle).map_err(|reason| {
                Error::InvalidRegistry(format!(
                    "Entry {} ({}) has invalid external handle '{}': {}",
                    idx, entry.display_name, entry.external_handle, reason
                ))
            })?;
            validate_local_id(&entry.local_id).map_err(|reason| {
                Error::InvalidRegistry(format!(
                    "Entry {} ({}) has invalid local id '{}': {}",
                    idx, entry.display_name, entry.local_id, reason
                ))
            })?;

            if !seen.insert(entry.local_id.as_str()) {
                tracing::warn!(
                    "Local id '{}' appears more than once; the last entry wins",
                    entry.local_id
                );
            }
        }

        Ok(())
    }
}

/// The handle becomes a single path segment under the profile base URL
fn validate_handle(handle: &str) -> std::result::Result<(), &'static str> {
    let handle = handle.trim();
    if handle.is_empty() {
        return Err("must not be empty");
    }
    if handle == "." || handle == ".." {
        return Err("must not be a relative path segment");
    }
    if handle.contains(['/', '\\', '?', '#', '%', ':']) {
        return Err("must not contain URL delimiters");
    }
    if handle.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err("must not contain whitespace or control characters");
    }
    Ok(())
}

/// The local id becomes a file name, so it must stay inside the output directory
fn validate_local_id(local_id: &str) -> std::result::Result<(), &'static str> {
    if local_id.is_empty() {
        return Err("must not be empty");
    }
    if local_id.starts_with('.') {
        return Err("must not start with '.'");
    }
    if local_id.contains(['/', '\\']) {
        return Err("must not contain path separators");
    }
    if local_id.chars().any(char::is_control) {
        return Err("must not contain control characters");
    }
    Ok(())
}
