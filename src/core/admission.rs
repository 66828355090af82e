use std::sync::atomic::{AtomicBool, Ordering};

/// Single-slot, non-blocking admission. Contention is rejected, never queued.
///
/// The guard is per process; separate instances do not see each other.
#[derive(Debug, Default)]
pub struct AdmissionGuard {
    busy: AtomicBool,
}

impl AdmissionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` while another permit is alive.
    pub fn try_acquire(&self) -> Option<AdmissionPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| AdmissionPermit { guard: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the guard when dropped, including during unwinding.
#[derive(Debug)]
pub struct AdmissionPermit<'a> {
    guard: &'a AdmissionGuard,
}

impl Drop for AdmissionPermit<'_> {
    fn drop(&mut self) {
        self.guard.busy.store(false, Ordering::Release);
    }
}
