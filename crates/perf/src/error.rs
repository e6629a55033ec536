//! Error types owned by this crate.
//!
//! The instrumentation and caching layers are transparent: a wrapped
//! operation's own error type passes through them untouched. The only
//! failure this crate produces itself is cache-key derivation, and the
//! caching wrapper recovers from it locally by bypassing the cache, so
//! `KeyError` rarely reaches callers at all.

use thiserror::Error;

/// Failure to derive a cache key from an operation's inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// A positional argument's `Display` implementation returned an error.
    #[error("argument at position {0} has no stable string form")]
    UnprintableArg(usize),

    /// A named argument's `Display` implementation returned an error.
    #[error("named argument `{0}` has no stable string form")]
    UnprintableNamed(String),
}
