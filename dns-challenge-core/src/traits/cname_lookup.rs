//! Public DNS CNAME lookup Trait

use async_trait::async_trait;
use thiserror::Error;

/// A CNAME query that could not be answered (timeout, server failure, malformed answer).
///
/// "No such name" and "no CNAME record" are not errors; lookups report them as `Ok(None)`.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct CnameLookupError(pub String);

/// One CNAME query against public DNS.
#[async_trait]
pub trait CnameLookup: Send + Sync {
    /// Target of the CNAME at `name`, or `None` when there is none.
    async fn cname(&self, name: &str) -> Result<Option<String>, CnameLookupError>;
}

/// Lookup that never reports a CNAME; every name resolves to itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughLookup;

#[async_trait]
impl CnameLookup for PassThroughLookup {
    async fn cname(&self, _name: &str) -> Result<Option<String>, CnameLookupError> {
        Ok(None)
    }
}
