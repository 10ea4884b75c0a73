//! Resolution engine for layered key-value configuration
//!
//! This crate turns an ordered list of configuration resources into a single
//! ordered, interpolated [`KeyValues`] result that remembers where every
//! entry came from:
//!
//! - **Resource model**: [`Resource`] descriptors with [`Flags`], parameters
//!   and an optional media override
//! - **Resolution engine**: [`Engine`] fetches, parses and recursively expands
//!   `_load_` directives depth-first
//! - **Interpolation**: `${name}` and `${name:-default}` placeholders resolved
//!   against [`Variables`] layers and previously resolved entries
//! - **Provenance**: each entry's [`Source`] points into a [`Provenance`] arena
//!   of the directives that introduced its resource
//!
//! # Architecture
//!
//! ```text
//!              kvs-cli
//!                 |
//!              kvs-core
//!                 |
//!        +--------+--------+
//!        |                 |
//!    kvs-media         kvs-loader
//! ```
//!
//! # Example
//!
//! ```
//! use kvs_core::{Engine, Seed};
//! use kvs_loader::MemoryLoader;
//!
//! let engine = Engine::builder()
//!     .loader(MemoryLoader::new().with("app", "home=/srv\nlogs=${home}/logs\n"))
//!     .build();
//! let config = engine.load(["memory:app"]).unwrap();
//! assert_eq!(config.get("logs"), Some("/srv/logs"));
//!
//! let defaults = Seed::literal("defaults", [("port", "8080")]);
//! let config = engine.load([defaults]).unwrap();
//! assert_eq!(config.get("port"), Some("8080"));
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod flags;
pub mod interpolate;
pub mod key_value;
pub mod key_values;
pub mod resource;
pub mod settings;
pub mod variables;

pub use config::{ReloadableConfig, Snapshot};
pub use engine::{Engine, EngineBuilder, EngineConfig, MediaPrecedence};
pub use error::{Error, Result};
pub use flags::{Flag, Flags};
pub use interpolate::Interpolator;
pub use key_value::{KeyValue, NodeId, Provenance, Source};
pub use key_values::{KeyValues, REDACTED};
pub use resource::{Resource, Seed};
pub use variables::{
    ChainedVariables, EnvVariables, MapVariables, RandomVariables, SettingsVariables, Variables,
};
