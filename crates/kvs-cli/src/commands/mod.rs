//! Command implementations for kvs-cli

pub mod check;
pub mod media;
pub mod resolve;

pub use check::run_check;
pub use media::run_media;
pub use resolve::run_resolve;

use std::path::PathBuf;

use kvs_core::{Engine, MapVariables};
use kvs_loader::ClasspathLoader;

use crate::cli::ResolveArgs;

/// Directory under the user config dir searched last for classpath resources
const CONFIG_DIR_NAME: &str = "kvs";

/// Classpath roots: the `--classpath` directories in order, then the user
/// config directory.
fn classpath_roots(args: &ResolveArgs) -> Vec<PathBuf> {
    let mut roots = args.classpath.clone();
    if let Some(dir) = dirs::config_dir() {
        roots.push(dir.join(CONFIG_DIR_NAME));
    }
    roots
}

/// Build the engine described by the command line.
pub(crate) fn build_engine(args: &ResolveArgs) -> Engine {
    let roots = classpath_roots(args);
    tracing::debug!(?roots, "Classpath roots");

    let vars: MapVariables = args.vars.iter().cloned().collect();
    let mut builder = Engine::builder()
        .loader(ClasspathLoader::new(roots))
        .variables(vars);
    if !args.profiles.is_empty() {
        builder = builder.profiles(args.profiles.iter().map(String::as_str));
    }
    builder.build()
}
