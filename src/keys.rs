//! API key selection.
//!
//! Sources hold a pool of configured credentials and pick one per run
//! through an injected [`KeyPicker`], which keeps the selection policy out
//! of the pagination engine.

use std::fmt::Debug;

use log::debug;
use rand::seq::SliceRandom;

/// Strategy for choosing one API key out of a configured pool.
pub trait KeyPicker: Debug + Send + Sync {
    /// Pick one usable key from `pool`, or `None` if no key is available.
    ///
    /// `seed` identifies the requesting source; implementations may use it
    /// for deterministic selection or diagnostics.
    fn pick(&self, pool: &[String], seed: &str) -> Option<String>;
}

/// Default picker: a uniformly random choice among the non-empty keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPicker;

impl KeyPicker for RandomPicker {
    fn pick(&self, pool: &[String], seed: &str) -> Option<String> {
        let usable: Vec<&String> = pool.iter().filter(|key| !key.is_empty()).collect();
        if usable.is_empty() {
            debug!("no API keys available for {seed}");
            return None;
        }
        usable.choose(&mut rand::thread_rng()).map(|key| (*key).clone())
    }
}
