//! The media command

use colored::Colorize;
use kvs_media::MediaRegistry;

use crate::error::Result;

/// List the registered media and the extensions they are selected by.
pub fn run_media() -> Result<()> {
    let registry = MediaRegistry::with_builtins();
    let fallback = registry.fallback().media_type().to_string();

    println!("{}", "Available Media".bold());
    println!();
    for media in registry.iter() {
        let extensions = media
            .file_extensions()
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect::<Vec<_>>()
            .join(", ");
        let marker = if media.media_type() == fallback {
            " (default)".dimmed().to_string()
        } else {
            String::new()
        };
        println!("  {:<24} {}{}", media.media_type().green(), extensions, marker);
    }
    Ok(())
}
