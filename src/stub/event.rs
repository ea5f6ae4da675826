//! Per-event driver: deduplicate, pair, evaluate, select.

use super::matcher::stub_contains;
use super::merger::{merge_pair, MergeContext, MergedStub};
use super::options::MergeCuts;
use super::types::StubInfo;
use log::debug;
use serde::Serialize;
use std::time::Instant;

/// Why a candidate pair did not produce a merged stub.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RejectionKind {
    Geometry,
    Cut,
}

#[derive(Clone, Debug, Serialize)]
pub struct PairRejection {
    pub pair: [usize; 2],
    pub kind: RejectionKind,
    pub reason: String,
}

/// Merged stub together with the indices of the input stubs it came from.
#[derive(Clone, Debug, Serialize)]
pub struct EventMerge {
    pub sources: [usize; 2],
    pub stub: MergedStub,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMergeResult {
    pub merged: Vec<EventMerge>,
    /// Inputs dropped because another stub on the same plane contains them.
    pub contained: Vec<usize>,
    /// Inputs that survived deduplication but were not merged.
    pub unmerged: Vec<usize>,
    pub rejected: Vec<PairRejection>,
    pub elapsed_ms: f64,
}

enum PairOutcome {
    Accepted(EventMerge),
    Rejected(PairRejection),
}

pub struct StubMergeEngine<'a> {
    ctx: MergeContext<'a>,
    cuts: MergeCuts,
}

impl<'a> StubMergeEngine<'a> {
    pub fn new(ctx: MergeContext<'a>, cuts: MergeCuts) -> Self {
        Self { ctx, cuts }
    }

    pub fn process(&self, stubs: &[StubInfo]) -> EventMergeResult {
        let t0 = Instant::now();
        let contained = if self.cuts.remove_contained {
            contained_stubs(stubs)
        } else {
            Vec::new()
        };
        let alive: Vec<usize> = (0..stubs.len()).filter(|i| !contained.contains(i)).collect();
        let pairs = self.candidate_pairs(stubs, &alive);

        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        for outcome in self.evaluate_pairs(stubs, &pairs) {
            match outcome {
                PairOutcome::Accepted(merge) => accepted.push(merge),
                PairOutcome::Rejected(rejection) => {
                    debug!(
                        "StubMergeEngine: pair {:?} rejected ({:?}): {}",
                        rejection.pair, rejection.kind, rejection.reason
                    );
                    rejected.push(rejection);
                }
            }
        }

        accepted.sort_by(|a, b| {
            a.stub
                .metrics
                .time_offset_us
                .abs()
                .total_cmp(&b.stub.metrics.time_offset_us.abs())
                .then(a.sources.cmp(&b.sources))
        });
        let mut used = vec![false; stubs.len()];
        let mut merged = Vec::new();
        for merge in accepted {
            let [i, j] = merge.sources;
            if used[i] || used[j] {
                continue;
            }
            used[i] = true;
            used[j] = true;
            merged.push(merge);
        }
        let unmerged: Vec<usize> = alive.into_iter().filter(|&i| !used[i]).collect();

        debug!(
            "StubMergeEngine: {} stubs, {} contained, {} pairs, {} merged, {} rejected",
            stubs.len(),
            contained.len(),
            pairs.len(),
            merged.len(),
            rejected.len()
        );

        EventMergeResult {
            merged,
            contained,
            unmerged,
            rejected,
            elapsed_ms: t0.elapsed().as_secs_f64() * 1000.0,
        }
    }

    fn candidate_pairs(&self, stubs: &[StubInfo], alive: &[usize]) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (k, &i) in alive.iter().enumerate() {
            for &j in &alive[k + 1..] {
                let (a, b) = (&stubs[i], &stubs[j]);
                if a.plane().volume != b.plane().volume || a.plane().view == b.plane().view {
                    continue;
                }
                if self.cuts.require_shared_vertex && a.vertex_hit != b.vertex_hit {
                    continue;
                }
                pairs.push((i, j));
            }
        }
        pairs
    }

    #[cfg(feature = "parallel")]
    fn evaluate_pairs(&self, stubs: &[StubInfo], pairs: &[(usize, usize)]) -> Vec<PairOutcome> {
        use rayon::prelude::*;

        pairs
            .par_iter()
            .map(|&(i, j)| self.evaluate(stubs, i, j))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_pairs(&self, stubs: &[StubInfo], pairs: &[(usize, usize)]) -> Vec<PairOutcome> {
        pairs
            .iter()
            .map(|&(i, j)| self.evaluate(stubs, i, j))
            .collect()
    }

    fn evaluate(&self, stubs: &[StubInfo], i: usize, j: usize) -> PairOutcome {
        let stub = match merge_pair(&self.ctx, &stubs[i], &stubs[j]) {
            Ok(stub) => stub,
            Err(err) => {
                return PairOutcome::Rejected(PairRejection {
                    pair: [i, j],
                    kind: RejectionKind::Geometry,
                    reason: err.to_string(),
                })
            }
        };
        if let Some(reason) = self.failed_cut(&stub) {
            return PairOutcome::Rejected(PairRejection {
                pair: [i, j],
                kind: RejectionKind::Cut,
                reason,
            });
        }
        PairOutcome::Accepted(EventMerge {
            sources: [i, j],
            stub,
        })
    }

    fn failed_cut(&self, stub: &MergedStub) -> Option<String> {
        let m = &stub.metrics;
        let cuts = &self.cuts;
        if m.time_offset_us.abs() > cuts.max_time_offset_us {
            return Some(format!(
                "time offset {:.3} us > {:.3}",
                m.time_offset_us.abs(),
                cuts.max_time_offset_us
            ));
        }
        if let Some(min_dot) = cuts.min_direction_dot {
            if m.direction_dot < min_dot {
                return Some(format!("direction dot {:.3} < {min_dot:.3}", m.direction_dot));
            }
        }
        if let Some(max_q) = cuts.max_charge_offset {
            if m.charge_offset.abs() > max_q {
                return Some(format!("charge offset {:.1} > {max_q:.1}", m.charge_offset.abs()));
            }
        }
        if let Some(max_dqdx) = cuts.max_peak_dqdx_offset {
            if m.peak_dqdx_offset.abs() > max_dqdx {
                return Some(format!(
                    "peak dQ/dx offset {:.1} > {max_dqdx:.1}",
                    m.peak_dqdx_offset.abs()
                ));
            }
        }
        None
    }
}

/// Indices of stubs contained in another stub of the same plane. Of two
/// mutually containing stubs, the one with the lower index is kept.
fn contained_stubs(stubs: &[StubInfo]) -> Vec<usize> {
    let mut out = Vec::new();
    for (j, b) in stubs.iter().enumerate() {
        let dropped = stubs.iter().enumerate().any(|(i, a)| {
            i != j
                && a.plane() == b.plane()
                && stub_contains(a, b)
                && (!stub_contains(b, a) || i < j)
        });
        if dropped {
            out.push(j);
        }
    }
    out
}
