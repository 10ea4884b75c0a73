//! Resource loaders for layered key-value configuration
//!
//! A loader turns a resource URI into a byte stream. Loaders are keyed by
//! URI scheme and collected into a [`LoaderRegistry`] at startup; the
//! resolution engine never discovers loaders on its own.
//!
//! Built-in schemes:
//!
//! - `file:` (and URIs without a scheme) - the local filesystem
//! - `classpath:` - files searched across an ordered list of root directories
//! - `memory:` - an in-process map of named byte buffers
//! - `system:` - a no-op source that always yields empty content

pub mod classpath;
pub mod error;
pub mod file;
pub mod loader;
pub mod memory;
pub mod registry;
pub mod system;
pub mod uri;

pub use classpath::ClasspathLoader;
pub use error::{Error, Result};
pub use file::FileLoader;
pub use loader::ResourceLoader;
pub use memory::MemoryLoader;
pub use registry::LoaderRegistry;
pub use system::SystemLoader;
pub use uri::ResourceUri;
