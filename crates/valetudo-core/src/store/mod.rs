// ── Status store ──
//
// Single-flight cache, the interval policy that sizes its freshness window,
// and the one-shot timer that keeps it warm in the background.

mod policy;
mod refresh;
mod status_cache;

pub use policy::RefreshPolicy;
pub use refresh::RefreshTimer;
pub use status_cache::StatusCache;
pub(crate) use status_cache::{ReadDecision, StatusResult};
