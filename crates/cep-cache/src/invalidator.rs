use cep_core::{AddressCache, CacheInvalidator, Mutation};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, warn};

/// Flushes a whole [`AddressCache`] in the background whenever a record
/// changes.
///
/// Cache keys describe query shapes, not rows, so there is no cheaper way to
/// find every entry a mutation made stale. The flush is spawned on the
/// current Tokio runtime and never awaited; failures are logged and dropped.
#[derive(Debug)]
pub struct FlushCacheInvalidator<C> {
    cache: Arc<C>,
}

impl<C> Clone for FlushCacheInvalidator<C> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<C: AddressCache> FlushCacheInvalidator<C> {
    pub fn new(cache: C) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }
}

impl<C: AddressCache> CacheInvalidator for FlushCacheInvalidator<C> {
    fn notify(&self, mutation: Mutation) {
        let Ok(runtime) = Handle::try_current() else {
            warn!(%mutation, "No async runtime available, skipping cache flush");
            return;
        };

        let cache = Arc::clone(&self.cache);
        runtime.spawn(async move {
            match cache.flush().await {
                Ok(()) => debug!(%mutation, "Flushed address cache"),
                Err(e) => warn!(%mutation, error = %e, "Failed to flush address cache"),
            }
        });
    }
}
