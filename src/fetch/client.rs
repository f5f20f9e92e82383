use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes a single prepared request against the report source.
///
/// The sheet export is public, so the only production implementation is
/// [`BasicClient`](super::BasicClient); the trait exists so callers can
/// wrap or substitute the transport.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
