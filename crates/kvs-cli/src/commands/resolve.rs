//! The resolve command

use std::io::Write;

use kvs_core::{KeyValues, Seed};

use super::build_engine;
use crate::cli::ResolveArgs;
use crate::error::{CliError, Result};

/// Resolve the given resources and render the result.
pub fn run_resolve(args: &ResolveArgs) -> Result<()> {
    let engine = build_engine(args);
    let kvs = resolve(&engine, args)?;
    let output = render(&engine, &kvs, args)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&output)?;
    stdout.flush()?;
    Ok(())
}

pub(crate) fn resolve(engine: &kvs_core::Engine, args: &ResolveArgs) -> Result<KeyValues> {
    let seeds = args.uris.iter().map(|uri| Seed::from(uri.as_str()));
    Ok(engine.load(seeds)?)
}

fn render(engine: &kvs_core::Engine, kvs: &KeyValues, args: &ResolveArgs) -> Result<Vec<u8>> {
    if args.verbose_entries {
        let mut out = kvs.verbose();
        out.push('\n');
        return Ok(out.into_bytes());
    }

    let media = engine
        .media()
        .by_name(&args.format)
        .ok_or_else(|| CliError::user(format!("Unknown format '{}'", args.format)))?;
    Ok(kvs.format(media)?)
}
