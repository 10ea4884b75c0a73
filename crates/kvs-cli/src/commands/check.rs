//! The check command

use colored::Colorize;

use super::build_engine;
use super::resolve::resolve;
use crate::cli::ResolveArgs;
use crate::error::Result;

/// Resolve the given resources and summarize the outcome.
///
/// Failures are returned as errors so the process exits non-zero with the
/// full provenance chain in the message.
pub fn run_check(args: &ResolveArgs) -> Result<()> {
    let engine = build_engine(args);
    let kvs = resolve(&engine, args)?;

    let sensitive = kvs.iter().filter(|kv| kv.is_sensitive()).count();
    println!(
        "{} {} entries ({} keys, {} sensitive) from {} seeds and {} load directives",
        "OK".green().bold(),
        kvs.len(),
        kvs.to_map().len(),
        sensitive,
        args.uris.len(),
        kvs.provenance().len()
    );
    Ok(())
}
