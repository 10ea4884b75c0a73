//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// kvs - Resolve layered key-value configuration
#[derive(Parser, Debug)]
#[command(name = "kvs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Resolve resources and print the result
    ///
    /// Examples:
    ///   kvs resolve app.properties
    ///   kvs resolve classpath:/app.properties --classpath conf -p dev
    ///   kvs resolve app.properties --format json
    Resolve(ResolveArgs),

    /// Resolve resources and report whether resolution succeeds
    Check(ResolveArgs),

    /// List the registered media
    Media,
}

/// Inputs shared by every command that runs a resolution
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ResolveArgs {
    /// Resources to resolve, in order (paths or URIs)
    #[arg(required = true)]
    pub uris: Vec<String>,

    /// Active profile (repeatable, in order)
    #[arg(short, long = "profile", env = "KVS_PROFILES", value_delimiter = ',')]
    pub profiles: Vec<String>,

    /// Variable made available to interpolation, as KEY=VALUE (repeatable)
    #[arg(long = "var", value_parser = parse_key_val)]
    pub vars: Vec<(String, String)>,

    /// Directory searched for classpath: resources (repeatable, in order)
    #[arg(long = "classpath")]
    pub classpath: Vec<PathBuf>,

    /// Media used to render the result (media type or extension)
    #[arg(short, long, default_value = "properties")]
    pub format: String,

    /// Print every entry with its full source chain instead of rendering it
    #[arg(long)]
    pub verbose_entries: bool,
}

/// Parse a single `KEY=VALUE` argument.
pub fn parse_key_val(arg: &str) -> Result<(String, String), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{arg}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{arg}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(parse_key_val("a=b=c"), Ok(("a".to_string(), "b=c".to_string())));
        assert_eq!(parse_key_val("empty="), Ok(("empty".to_string(), String::new())));
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=x").is_err());
    }

    #[test]
    fn test_resolve_arguments() {
        let cli = Cli::try_parse_from([
            "kvs",
            "resolve",
            "a.properties",
            "memory:b",
            "-p",
            "dev,local",
            "--profile",
            "extra",
            "--var",
            "HOST=example.com",
            "--classpath",
            "conf",
            "--format",
            "json",
        ])
        .unwrap();

        let Commands::Resolve(args) = cli.command else {
            panic!("expected resolve command");
        };
        assert_eq!(args.uris, vec!["a.properties", "memory:b"]);
        assert_eq!(args.profiles, vec!["dev", "local", "extra"]);
        assert_eq!(args.vars, vec![("HOST".to_string(), "example.com".to_string())]);
        assert_eq!(args.classpath, vec![PathBuf::from("conf")]);
        assert_eq!(args.format, "json");
        assert!(!args.verbose_entries);
    }

    #[test]
    fn test_resolve_requires_a_resource() {
        assert!(Cli::try_parse_from(["kvs", "resolve"]).is_err());
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["kvs", "media", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.command, Commands::Media);
    }
}
