//! In-memory cache of expanded scripts
//!
//! One [`ScriptCache`] per engine holds every view of the resolved scripts
//! (by file path, by logical name, by alias) together with the cycle guard,
//! so that clearing always resets both at once.

mod guard;
mod hash;
mod store;

pub use guard::CycleGuard;
pub use hash::{digest, DIGEST_HEX_LEN};
pub use store::{LoadedScript, ScriptCache};
