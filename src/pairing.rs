//! Stratified pairing of accepted sources into the clear and unclear sets.
//!
//! Reliable and unreliable pools are shuffled independently, then sliced
//! into non-overlapping ranges: the clear set takes the head of both pools
//! and the unclear set takes the next ranges. Unknown sources are counted
//! but never placed, and a URL seen earlier in the input is dropped. A
//! pool that runs short yields a smaller set, never an error.

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use tracing::{info, warn};

use crate::source::{Category, FormattedSource, PairedResult, Source};

/// Target composition of the two output sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairingPlan {
    pub clear_reliable: usize,
    pub clear_unreliable: usize,
    pub unclear_reliable: usize,
    pub unclear_unreliable: usize,
}

impl PairingPlan {
    /// Clear set: 4 reliable to 1 unreliable.
    pub const CLEAR_RELIABLE: usize = 4;
    pub const CLEAR_UNRELIABLE: usize = 1;
    /// Unclear set: 1 reliable to 3 unreliable.
    pub const UNCLEAR_RELIABLE: usize = 1;
    pub const UNCLEAR_UNRELIABLE: usize = 3;
}

impl Default for PairingPlan {
    fn default() -> Self {
        Self {
            clear_reliable: Self::CLEAR_RELIABLE,
            clear_unreliable: Self::CLEAR_UNRELIABLE,
            unclear_reliable: Self::UNCLEAR_RELIABLE,
            unclear_unreliable: Self::UNCLEAR_UNRELIABLE,
        }
    }
}

/// Partition `sources` into the default 4:1 / 1:3 sets.
pub fn build<R: Rng + ?Sized>(sources: Vec<Source>, rng: &mut R) -> PairedResult {
    build_with_plan(&PairingPlan::default(), sources, rng)
}

/// Partition `sources` according to `plan`.
///
/// Within each set the reliable block comes first. The two sets index
/// disjoint ranges of the same shuffled pools, so they never share a source.
pub fn build_with_plan<R: Rng + ?Sized>(
    plan: &PairingPlan,
    sources: Vec<Source>,
    rng: &mut R,
) -> PairedResult {
    let mut reliable = Vec::new();
    let mut unreliable = Vec::new();
    let mut unknown = 0usize;
    let mut urls = HashSet::new();
    let mut duplicates = 0usize;
    for source in sources {
        if !urls.insert(source.url.clone()) {
            duplicates += 1;
            continue;
        }
        match source.category {
            Category::Reliable => reliable.push(source),
            Category::Unreliable => unreliable.push(source),
            Category::Unknown => unknown += 1,
        }
    }
    info!(
        reliable = reliable.len(),
        unreliable = unreliable.len(),
        unknown,
        duplicates,
        "pairing sources"
    );

    reliable.shuffle(rng);
    unreliable.shuffle(rng);

    let (clear_r, unclear_r) = split_pool(&reliable, plan.clear_reliable, plan.unclear_reliable);
    let (clear_u, unclear_u) =
        split_pool(&unreliable, plan.clear_unreliable, plan.unclear_unreliable);

    if clear_r.len() < plan.clear_reliable {
        warn!(
            wanted = plan.clear_reliable,
            got = clear_r.len(),
            "not enough reliable sources for the clear set"
        );
    }
    if clear_u.len() < plan.clear_unreliable {
        warn!(
            wanted = plan.clear_unreliable,
            got = clear_u.len(),
            "not enough unreliable sources for the clear set"
        );
    }
    if unclear_r.len() < plan.unclear_reliable {
        warn!(
            wanted = plan.unclear_reliable,
            got = unclear_r.len(),
            "not enough reliable sources for the unclear set"
        );
    }
    if unclear_u.len() < plan.unclear_unreliable {
        warn!(
            wanted = plan.unclear_unreliable,
            got = unclear_u.len(),
            "not enough unreliable sources for the unclear set"
        );
    }

    let result = PairedResult {
        clear_set: formatted(clear_r.iter().chain(clear_u)),
        unclear_set: formatted(unclear_r.iter().chain(unclear_u)),
    };
    info!(
        clear = result.clear_set.len(),
        unclear = result.unclear_set.len(),
        "pairing complete"
    );
    result
}

/// Head of `pool` (up to `first`) and the following range (up to `second`).
fn split_pool(pool: &[Source], first: usize, second: usize) -> (&[Source], &[Source]) {
    let head_end = first.min(pool.len());
    let tail_end = head_end.saturating_add(second).min(pool.len());
    (&pool[..head_end], &pool[head_end..tail_end])
}

fn formatted<'a>(sources: impl Iterator<Item = &'a Source>) -> Vec<FormattedSource> {
    sources.cloned().map(FormattedSource::from).collect()
}
