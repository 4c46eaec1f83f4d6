//! Deterministic hash-based identity for provider types and routines.
//!
//! [`TypeHash`] is a 64-bit hash computed from names and signatures. The same
//! input always produces the same hash, so a provider type can be referenced
//! before it is registered and two registrations of the same routine shape
//! collide predictably.
//!
//! # Examples
//!
//! ```
//! use sqlprovider_core::TypeHash;
//!
//! let provider = TypeHash::from_name("UserSqlProvider");
//! assert_eq!(provider, TypeHash::from_name("UserSqlProvider"));
//!
//! let by_id = TypeHash::from_routine(provider, "provideSql", &[TypeHash::from_name("int")]);
//! let by_name = TypeHash::from_routine(provider, "provideSql", &[TypeHash::from_name("string")]);
//! assert_ne!(by_id, by_name);
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
mod hash_constants {
    /// Separator constant for signature components.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for type hashes.
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for routine hashes.
    pub const ROUTINE: u64 = 0x7d3c8b4a92e15f6d;

    /// Parameter position mixing constants.
    /// Each position gets its own constant so parameter order matters.
    pub const PARAM_MARKERS: [u64; 8] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
    ];
}

/// A deterministic 64-bit hash identifying a type or routine.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Create a type hash from a qualified type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a routine hash from the owning type, the routine name and the
    /// parameter type hashes.
    ///
    /// Parameter order matters: `(int, string)` and `(string, int)` differ.
    #[inline]
    pub fn from_routine(owner: TypeHash, name: &str, param_hashes: &[TypeHash]) -> Self {
        let mut hash = hash_constants::ROUTINE ^ owner.0 ^ xxh64(name.as_bytes(), 0);
        for (i, param) in param_hashes.iter().enumerate() {
            let marker = hash_constants::PARAM_MARKERS
                .get(i)
                .copied()
                .unwrap_or_else(|| hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64));
            // wrapping_mul keeps the fold non-commutative
            hash = hash
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(marker ^ param.0);
        }
        TypeHash(hash)
    }

    /// Create a type hash for a Rust type, keyed by its type name.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::from_name(std::any::type_name::<T>())
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
