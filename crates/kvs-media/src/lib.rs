//! Media parsing and rendering for layered key-value configuration
//!
//! A *media* turns a byte stream into an ordered list of raw `(key, value)`
//! pairs and renders such a list back into bytes. The resolution engine only
//! ever talks to media through the [`Media`] trait; which implementation is
//! used for a given resource is decided by the [`MediaRegistry`].
//!
//! Built-in media:
//!
//! - **properties** - the default `key=value` format
//! - **dotenv** - `.env` files
//! - **json**, **toml**, **yaml** - structured documents flattened to dotted keys

pub mod error;
pub mod handlers;
pub mod media;
pub mod registry;

pub use error::{Error, Result};
pub use handlers::{DotenvMedia, JsonMedia, PropertiesMedia, TomlMedia, YamlMedia};
pub use media::{Media, Pair, extension_of};
pub use registry::MediaRegistry;
