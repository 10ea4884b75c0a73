//! The loader contract

use crate::error::Result;
use crate::uri::ResourceUri;

/// Trait for resource loaders.
///
/// A loader answers for one or more URI schemes and fetches the full
/// content of a resource. A missing resource must be reported as
/// [`Error::NotFound`](crate::Error::NotFound) so that callers can tell it
/// apart from a failed read.
pub trait ResourceLoader: Send + Sync {
    /// Schemes (lowercase, without the colon) this loader handles
    fn schemes(&self) -> &[&str];

    /// Fetch the resource content
    fn fetch(&self, uri: &ResourceUri) -> Result<Vec<u8>>;
}
