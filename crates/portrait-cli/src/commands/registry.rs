use crate::OutputFormat;
use anyhow::{Context, Result};
use portrait_core::registry::{self, Registry, RegistryReader};
use std::path::Path;

/// The registry from `path`, or the built-in founders list
pub fn load(path: Option<&Path>) -> Result<Registry> {
    match path {
        Some(path) => RegistryReader::from_file(path)
            .with_context(|| format!("Failed to load registry from {}", path.display())),
        None => Ok(registry::founders()),
    }
}

/// Print the registry that `fetch` would process
pub fn execute(path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let registry = load(path)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&registry)?),
        OutputFormat::Pretty => print_pretty(&registry),
    }

    Ok(())
}

fn print_pretty(registry: &Registry) {
    use console::style;

    if registry.is_empty() {
        println!("Registry is empty.");
        return;
    }

    let name_width = registry
        .iter()
        .map(|e| e.display_name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);
    let handle_width = registry
        .iter()
        .map(|e| e.external_handle.len())
        .max()
        .unwrap_or(0)
        .max(6);
    let org_width = registry
        .iter()
        .map(|e| e.org.as_deref().map_or(1, str::len))
        .max()
        .unwrap_or(0)
        .max(3);

    println!(
        "{}",
        style(format!(
            "{:<name_width$}  {:<handle_width$}  {:<org_width$}  {}",
            "NAME", "HANDLE", "ORG", "FILE"
        ))
        .bold()
    );

    for entry in registry {
        println!(
            "{:<name_width$}  {:<handle_width$}  {:<org_width$}  {}.jpg",
            entry.display_name,
            entry.external_handle,
            entry.org.as_deref().unwrap_or("-"),
            entry.local_id
        );
    }

    println!();
    println!("{} profiles", registry.len());
}
