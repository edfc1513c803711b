//! `subquake` is a passive subdomain discovery source backed by the
//! [360 Quake](https://quake.360.net) search API.
//!
//! Given a target domain it walks the paginated search results and streams
//! every discovered hostname to the consumer as it arrives:
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use subquake::{QuakeSource, Result, Session, Source};
//! use tokio_stream::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let session = Arc::new(Session::new(Duration::from_secs(20))?);
//!     let mut source = QuakeSource::new();
//!     source.add_api_keys(vec!["my-api-key".to_string()]);
//!
//!     let mut results = source.run("example.com", session);
//!     while let Some(result) = results.next().await {
//!         println!("{result}");
//!     }
//!     // Valid once the stream has closed.
//!     println!("{:?}", source.statistics());
//!     Ok(())
//! }
//! ```
//!
//! The crate deliberately stops at the source boundary: aggregation across
//! sources, deduplication, and output formatting belong to the caller.

mod keys;
mod session;
mod source;
mod types;

pub mod quake;

pub use keys::{KeyPicker, RandomPicker};
pub use quake::QuakeSource;
pub use session::Session;
pub use source::Source;
pub use types::*;
