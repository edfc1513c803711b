use std::sync::Arc;

use tokio_stream::wrappers::ReceiverStream;

use crate::{RunStats, Session, SourceResult};

/// Interface every passive discovery source implements.
///
/// The plugin registry drives sources exclusively through this trait: it
/// configures credentials, starts a run, drains the returned stream, and
/// reads the statistics once the stream has closed.
pub trait Source: Send + Sync {
    /// Constant identifier of the source
    fn name(&self) -> &'static str;

    /// Whether the source is included in aggregate runs by default
    fn is_default(&self) -> bool;

    /// Whether the source can take discovered subdomains as new targets
    fn has_recursive_support(&self) -> bool;

    /// Whether the source needs an API key to operate
    fn needs_keys(&self) -> bool;

    /// Replace the credential pool
    fn add_api_keys(&mut self, keys: Vec<String>);

    /// Start a discovery run for `domain`.
    ///
    /// Returns immediately with the result stream; the actual work happens
    /// on a background task that closes the stream exactly once when the
    /// run ends, whether it succeeded, failed, or was skipped. Dropping the
    /// stream cancels the run at its next emission.
    fn run(&self, domain: &str, session: Arc<Session>) -> ReceiverStream<SourceResult>;

    /// Statistics of the most recent run.
    ///
    /// Only meaningful after the stream returned by [`Source::run`] has
    /// closed.
    fn statistics(&self) -> RunStats;
}
