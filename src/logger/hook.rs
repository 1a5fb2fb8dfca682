//! Per-level callbacks that observe records after they reached the sink.

use crate::entity::Summary;
use crate::internal;
use crate::level::Level;
use parking_lot::RwLock;
use std::sync::Arc;

/// Runs synchronously on the logging thread after the record was written.
///
/// A hook that logs through the same `Logger` at one of its own levels
/// recurses without bound; log elsewhere or at a level the hook ignores.
pub trait Hook: Send + Sync {
    /// Levels this hook fires for.
    fn levels(&self) -> &[Level];

    /// Errors are reported on the internal diagnostic logger and never reach
    /// the caller of the log statement.
    ///
    /// # Errors
    /// Any failure the hook wants reported.
    fn fire(&self, summary: &Summary<'_>) -> Result<(), crate::Error>;
}

struct HookFn<F> {
    levels: Vec<Level>,
    f: F,
}

impl<F> Hook for HookFn<F>
where
    F: Fn(&Summary<'_>) -> Result<(), crate::Error> + Send + Sync,
{
    fn levels(&self) -> &[Level] {
        &self.levels
    }

    fn fire(&self, summary: &Summary<'_>) -> Result<(), crate::Error> {
        (self.f)(summary)
    }
}

/// Wraps a closure as a [`Hook`].
pub fn hook_fn<F>(levels: impl Into<Vec<Level>>, f: F) -> Arc<dyn Hook>
where
    F: Fn(&Summary<'_>) -> Result<(), crate::Error> + Send + Sync + 'static,
{
    Arc::new(HookFn {
        levels: levels.into(),
        f,
    })
}

/// Hooks indexed by level rank, in registration order.
#[derive(Default)]
pub(super) struct HookRegistry {
    by_level: RwLock<[Vec<Arc<dyn Hook>>; 7]>,
}

impl HookRegistry {
    pub(super) fn add(&self, hook: Arc<dyn Hook>) {
        let mut seen = 0u8;
        let mut by_level = self.by_level.write();
        for level in hook.levels() {
            let bit = 1 << level.rank();
            if seen & bit == 0 {
                seen |= bit;
                by_level[usize::from(level.rank())].push(Arc::clone(&hook));
            }
        }
    }

    pub(super) fn count(&self, level: Level) -> usize {
        self.by_level.read()[usize::from(level.rank())].len()
    }

    /// Runs every hook for the summary's level. The lock is released first so
    /// hooks may register hooks or log without deadlocking.
    pub(super) fn fire(&self, summary: &Summary<'_>) {
        let hooks = self.by_level.read()[usize::from(summary.level().rank())].clone();
        for hook in hooks {
            if let Err(e) = hook.fire(summary) {
                internal::warn(
                    "HOOK",
                    &format!("Hook failed on {} record: {e}", summary.level()),
                );
            }
        }
    }
}
