//! Display-name interning
//!
//! Caster and target names repeat every tick for the whole session, so they
//! are interned once and carried around as 4-byte keys.

use lasso::{Spur, ThreadedRodeo};
use std::sync::OnceLock;

/// Interned display name.
pub type IStr = Spur;

static INTERNER: OnceLock<ThreadedRodeo> = OnceLock::new();

static EMPTY_ISTR: OnceLock<Spur> = OnceLock::new();

/// Get the global interner (initializes on first call).
pub fn interner() -> &'static ThreadedRodeo {
    INTERNER.get_or_init(ThreadedRodeo::default)
}

/// Intern a name, returning a key.
pub fn intern(s: &str) -> IStr {
    interner().get_or_intern(s)
}

/// Key for the empty name. Spur::default() collides with the first
/// interned string, so never use it as a placeholder.
#[inline]
pub fn empty_istr() -> IStr {
    *EMPTY_ISTR.get_or_init(|| interner().get_or_intern(""))
}

/// Resolve an interned key back to a string.
pub fn resolve(key: IStr) -> &'static str {
    interner().resolve(&key)
}

/// Resolve a list of keys, keeping order.
pub fn resolve_all(keys: &[IStr]) -> Vec<&'static str> {
    keys.iter().map(|k| resolve(*k)).collect()
}

/// Join names with a separator, skipping empty ones.
pub fn join_names(keys: &[IStr], separator: &str) -> String {
    let mut out = String::new();
    for name in keys.iter().map(|k| resolve(*k)).filter(|n| !n.is_empty()) {
        if !out.is_empty() {
            out.push_str(separator);
        }
        out.push_str(name);
    }
    out
}
