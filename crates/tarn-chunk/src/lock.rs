use std::hint;
use std::sync::atomic::{AtomicBool, Ordering};

/// Scoped hold of one light-granule spin lock. Acquisition spin-waits;
/// release happens on drop, on every exit path.
pub struct LightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> LightGuard<'a> {
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Self {
        while flag.swap(true, Ordering::Acquire) {
            hint::spin_loop();
        }
        Self { flag }
    }
}

impl Drop for LightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
