//! Machine-readable records of operator lookups.
//!
//! Each `find_operator` call emits one `lookup` record on target
//! `opconv::resolution`, after the result is known. Each lazily built
//! candidate list emits one `candidate_set` record. All fields are plain
//! values, so `OPCONV_LOG_FORMAT=json` yields one object per record.
//!
//! `OPCONV_TRACE_SESSION`, when set, labels every record so that output of
//! several runs can be concatenated and still told apart.

use crate::def::FunctionId;
use crate::fuzzy::FuzzyType;
use crate::types::TypeId;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{Level, trace};

pub(crate) const TARGET: &str = "opconv::resolution";

static LOOKUP_SEQ: AtomicU64 = AtomicU64::new(0);
static SESSION: OnceLock<Box<str>> = OnceLock::new();

fn session() -> &'static str {
    SESSION.get_or_init(|| {
        std::env::var("OPCONV_TRACE_SESSION")
            .map(String::into_boxed_str)
            .unwrap_or_default()
    })
}

/// A lookup being timed. Only exists while something listens on `TARGET`.
pub(crate) struct Lookup {
    seq: u64,
    convention: &'static str,
    queried: TypeId,
    free_params: usize,
    started: Instant,
}

impl Lookup {
    #[inline]
    pub(crate) fn begin(convention: &'static str, queried: &FuzzyType) -> Option<Self> {
        if !tracing::enabled!(target: TARGET, Level::TRACE) {
            return None;
        }
        Some(Self {
            seq: LOOKUP_SEQ.fetch_add(1, Ordering::Relaxed),
            convention,
            queried: queried.ty(),
            free_params: queried.free_params().len(),
            started: Instant::now(),
        })
    }

    pub(crate) fn finish(self, matched: Option<FunctionId>, from_cache: bool) {
        let micros = u64::try_from(self.started.elapsed().as_micros()).unwrap_or(u64::MAX);
        trace!(
            target: TARGET,
            record = "lookup",
            session = session(),
            seq = self.seq,
            convention = self.convention,
            queried = self.queried.0,
            free_params = self.free_params,
            matched = matched.map(|function| function.0),
            source = if from_cache { "cache" } else { "search" },
            micros
        );
    }
}

#[inline]
pub(crate) fn candidate_set(convention: &'static str, tier: &'static str, size: usize) {
    trace!(
        target: TARGET,
        record = "candidate_set",
        session = session(),
        convention,
        tier,
        size
    );
}

#[cfg(test)]
#[path = "../tests/operator_trace_tests.rs"]
mod tests;
