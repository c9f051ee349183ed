use std::{
    num::NonZeroUsize,
    sync::atomic::{AtomicUsize, Ordering},
};

static LAST_ID: AtomicUsize = AtomicUsize::new(1);

/// A process-unique identifier handed out to every `InputItem`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroUsize);

impl Id {
    pub(crate) fn new() -> Self {
        let id = LAST_ID.fetch_add(1, Ordering::SeqCst);

        // LAST_ID starts at 1 and only grows; wrapping around would take
        // usize::MAX allocations.
        match NonZeroUsize::new(id) {
            Some(id) => Id(id),
            None => panic!("gridpack ran out of item IDs"),
        }
    }
}
