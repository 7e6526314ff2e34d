//! Pluggable authentication strategies.
//!
//! A strategy inspects the inbound request and either produces a partial
//! user filter (a candidate identity) or passes. Strategies are registered
//! in order at boot; resolution uses the first candidate and never falls
//! through to later strategies, so deployments must ensure at most one
//! strategy can claim any given request.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use atrium_core::Registry;
use atrium_query::Props;

use crate::error::AuthError;

/// Partial property filter identifying a candidate user, e.g.
/// `{"uuid": "..."} ` or `{"email": "..."}`.
pub type UserFilter = Props;

/// The transport-agnostic slice of the request strategies get to see.
#[derive(Debug, Clone, Default)]
pub struct AuthRequest {
    headers: BTreeMap<String, String>,
}

impl AuthRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Header names are matched case-insensitively.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into().to_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// The token of an `Authorization: Bearer <token>` header, if present.
    pub fn bearer_token(&self) -> Option<&str> {
        self.header("authorization")?.strip_prefix("Bearer ")
    }
}

pub type StrategyFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Option<UserFilter>, AuthError>> + Send + 'a>>;

/// `request -> candidate user filter | None`.
pub trait AuthStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn candidate<'a>(&'a self, request: &'a AuthRequest) -> StrategyFuture<'a>;
}

/// Ordered strategy list, sealed after boot.
pub type StrategyRegistry = Registry<Box<dyn AuthStrategy>>;

/// Walk the strategy list in order and return the first candidate along
/// with the name of the strategy that produced it. Later strategies are
/// not consulted once a candidate exists.
pub(crate) async fn select_candidate(
    request: &AuthRequest,
    strategies: &StrategyRegistry,
) -> Result<Option<(&'static str, UserFilter)>, AuthError> {
    for strategy in strategies {
        if let Some(filter) = strategy.candidate(request).await? {
            return Ok(Some((strategy.name(), filter)));
        }
    }
    Ok(None)
}
