//! The segment's environment: the collaborators it talks to.
//!
//! Each collaborator is a narrow trait with one shipped implementation, so
//! tests can swap in fakes and the binary can pick a disk-backed cache.

mod cache;
mod file_cache;
mod http;
mod properties;
mod template;

use std::sync::Arc;

pub use cache::{CacheError, CacheStore, MemoryCache};
pub use file_cache::FileCache;
pub use http::{HttpTransport, ReqwestTransport, TransportError};
pub use properties::{Properties, PropertiesError};
pub use template::{TemplateContext, TemplateError, TemplateRenderer, TextTemplate};

/// Collaborators injected into a segment.
#[derive(Clone)]
pub struct SegmentEnv {
    /// HTTP GET transport
    pub http: Arc<dyn HttpTransport>,

    /// Shared cache store
    pub cache: Arc<dyn CacheStore>,

    /// Output template renderer
    pub templates: Arc<dyn TemplateRenderer>,
}

impl SegmentEnv {
    /// Create an environment from its parts.
    pub fn new(
        http: Arc<dyn HttpTransport>,
        cache: Arc<dyn CacheStore>,
        templates: Arc<dyn TemplateRenderer>,
    ) -> Self {
        Self {
            http,
            cache,
            templates,
        }
    }

    /// Real HTTP and templates over the given cache store.
    pub fn with_cache(cache: Arc<dyn CacheStore>) -> Self {
        Self::new(Arc::new(ReqwestTransport::new()), cache, Arc::new(TextTemplate::new()))
    }
}

impl Default for SegmentEnv {
    /// Real HTTP, an in-memory cache and the built-in template renderer.
    fn default() -> Self {
        Self::with_cache(Arc::new(MemoryCache::new()))
    }
}
