//! Deterministic cache-key derivation from operation arguments.
//!
//! A key is built from the string forms of positional arguments (in call
//! order) and `name=value` pairs (sorted by name), joined and hashed to a
//! SHA-256 hex digest. Two calls with equal argument strings and equal
//! named sets therefore always map to the same key, regardless of the
//! order named parts were added in.
//!
//! Known limitation: string-form keys are lossy — distinct values whose
//! `Display` output coincides collide. Callers for whom that matters
//! should key a [`Cache`](super::Cache) with a structural key type
//! directly instead of going through this module.
//!
//! # Example
//!
//! ```
//! use pitwall_perf::cache::KeyBuilder;
//!
//! let a = KeyBuilder::new()
//!     .arg(&2026)?
//!     .named("session", &"qualifying")?
//!     .named("driver", &44)?
//!     .finish();
//! let b = KeyBuilder::new()
//!     .arg(&2026)?
//!     .named("driver", &44)?
//!     .named("session", &"qualifying")?
//!     .finish();
//! assert_eq!(a, b);
//! # Ok::<(), pitwall_perf::error::KeyError>(())
//! ```

use std::fmt::{Display, Write as _};

use sha2::{Digest, Sha256};

use crate::error::KeyError;

const PART_SEPARATOR: &str = "|";

/// Accumulates argument parts and digests them into a cache key.
#[derive(Debug, Default)]
pub struct KeyBuilder {
    parts: Vec<String>,
    named: Vec<(String, String)>,
}

impl KeyBuilder {
    /// Start an empty key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument's string form.
    ///
    /// Fails with [`KeyError::UnprintableArg`] if the value's `Display`
    /// implementation errors — the caller is expected to bypass the cache
    /// in that case, not to fail the operation.
    pub fn arg<T: Display + ?Sized>(mut self, value: &T) -> Result<Self, KeyError> {
        let mut rendered = String::new();
        write!(rendered, "{value}").map_err(|_| KeyError::UnprintableArg(self.parts.len()))?;
        self.parts.push(rendered);
        Ok(self)
    }

    /// Append a named argument. Named parts are sorted by name before
    /// digesting, so insertion order does not affect the key.
    pub fn named<T: Display + ?Sized>(mut self, name: &str, value: &T) -> Result<Self, KeyError> {
        let mut rendered = String::new();
        write!(rendered, "{value}")
            .map_err(|_| KeyError::UnprintableNamed(name.to_string()))?;
        self.named.push((name.to_string(), rendered));
        Ok(self)
    }

    /// Produce the fixed-length hex digest.
    #[must_use]
    pub fn finish(mut self) -> String {
        self.named.sort_by(|a, b| a.0.cmp(&b.0));

        let mut composite = self.parts;
        composite.extend(self.named.into_iter().map(|(name, value)| format!("{name}={value}")));

        hex::encode(Sha256::digest(composite.join(PART_SEPARATOR).as_bytes()))
    }
}

/// Input types the caching wrapper can derive a key from.
pub trait CacheKey {
    /// Derive this input's cache key.
    fn cache_key(&self) -> Result<String, KeyError>;
}

impl CacheKey for () {
    fn cache_key(&self) -> Result<String, KeyError> {
        Ok(KeyBuilder::new().finish())
    }
}

macro_rules! impl_cache_key_via_display {
    ($($ty:ty),* $(,)?) => {$(
        impl CacheKey for $ty {
            fn cache_key(&self) -> Result<String, KeyError> {
                Ok(KeyBuilder::new().arg(self)?.finish())
            }
        }
    )*};
}

impl_cache_key_via_display!(
    String, &str, bool, char, i32, i64, isize, u32, u64, usize, f32, f64,
);

macro_rules! impl_cache_key_for_tuple {
    ($(($($field:tt : $ty:ident),+)),* $(,)?) => {$(
        impl<$($ty: Display),+> CacheKey for ($($ty,)+) {
            fn cache_key(&self) -> Result<String, KeyError> {
                Ok(KeyBuilder::new()$(.arg(&self.$field)?)+.finish())
            }
        }
    )*};
}

impl_cache_key_for_tuple!(
    (0: A),
    (0: A, 1: B),
    (0: A, 1: B, 2: C),
    (0: A, 1: B, 2: C, 3: D),
);
