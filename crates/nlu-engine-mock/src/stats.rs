//! Per-thread allocation counters
//!
//! Every exported call runs on the caller's thread, so tests can reset the
//! counters, drive the engine and check that each allocation was released.

use std::cell::Cell;

/// Counters of native allocations and error messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Clients returned by the create functions
    pub clients_created: usize,
    /// Clients passed to `nlu_engine_destroy_client`
    pub clients_destroyed: usize,
    /// Parse results and entity lists handed out
    pub results_allocated: usize,
    /// Parse results and entity lists released
    pub results_destroyed: usize,
    /// Strings handed out, error messages included
    pub strings_allocated: usize,
    /// Strings passed to `nlu_engine_destroy_string`
    pub strings_destroyed: usize,
    /// Failed calls that stored a last error
    pub errors_raised: usize,
    /// Messages taken by `nlu_engine_get_last_error`
    pub errors_retrieved: usize,
}

impl Stats {
    /// True when every client, result and string has been released
    pub fn is_balanced(&self) -> bool {
        self.clients_created == self.clients_destroyed
            && self.results_allocated == self.results_destroyed
            && self.strings_allocated == self.strings_destroyed
    }
}

thread_local! {
    static STATS: Cell<Stats> = const { Cell::new(Stats {
        clients_created: 0,
        clients_destroyed: 0,
        results_allocated: 0,
        results_destroyed: 0,
        strings_allocated: 0,
        strings_destroyed: 0,
        errors_raised: 0,
        errors_retrieved: 0,
    }) };
}

/// Counters of the current thread
pub fn snapshot() -> Stats {
    STATS.with(Cell::get)
}

/// Zero the counters of the current thread
pub fn reset() {
    STATS.with(|s| s.set(Stats::default()));
}

pub(crate) fn record(update: impl FnOnce(&mut Stats)) {
    STATS.with(|cell| {
        let mut stats = cell.get();
        update(&mut stats);
        cell.set(stats);
    });
}
