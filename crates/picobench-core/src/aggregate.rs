//! Sample aggregator (§4.C): one forward pass over the results stream,
//! bucketed by (operation, size group).

use std::collections::HashMap;
use std::io::BufRead;

use crate::model::{Operation, SizeGroup};
use crate::stats::{summarise, Stats};

/// The aggregated statistics for one read bucket.
#[derive(Debug, Clone, Default)]
pub struct ReadBucket {
    /// Per-sample MB/s distribution.
    pub mbps: Stats,
    /// Per-sample latency distribution, in milliseconds.
    pub latency_ms: Stats,
    /// Arithmetic mean of elapsed microseconds across the bucket's
    /// samples, kept for the latency-derived MB/s alternative (§3).
    pub mean_latency_us: Option<f64>,
}

/// All buckets produced by one aggregator pass.
#[derive(Debug, Clone, Default)]
pub struct Aggregates {
    read: HashMap<SizeGroup, ReadBucket>,
    program: HashMap<SizeGroup, Stats>,
    erase: HashMap<SizeGroup, Stats>,
}

impl Aggregates {
    /// The read bucket for `group`, or an empty bucket if no samples
    /// landed there.
    pub fn read(&self, group: SizeGroup) -> ReadBucket {
        self.read.get(&group).cloned().unwrap_or_default()
    }

    /// The program-ms [`Stats`] for `group`.
    pub fn program(&self, group: SizeGroup) -> Stats {
        self.program.get(&group).copied().unwrap_or_default()
    }

    /// The erase-ms [`Stats`] for `group`.
    pub fn erase(&self, group: SizeGroup) -> Stats {
        self.erase.get(&group).copied().unwrap_or_default()
    }

    /// Whether any bucket, across any operation and size group, received
    /// at least one sample.
    pub fn any_samples(&self) -> bool {
        !self.read.is_empty() || !self.program.is_empty() || !self.erase.is_empty()
    }

    /// The elapsed-ms [`Stats`] for a given operation/group, i.e. the
    /// stats the report's per-size rows (`n_*`, `avg_*_ms`, ...) draw from:
    /// read draws from latency, program/erase from their own ms stats.
    pub fn elapsed_ms(&self, op: Operation, group: SizeGroup) -> Stats {
        match op {
            Operation::Read => self.read(group).latency_ms,
            Operation::Program => self.program(group),
            Operation::Erase => self.erase(group),
        }
    }
}

/// Accumulates raw per-sample vectors during the pass; consumed into
/// [`Aggregates`] by [`Builder::finish`].
#[derive(Default)]
struct Builder {
    read_mbps: HashMap<SizeGroup, Vec<f64>>,
    read_latency_ms: HashMap<SizeGroup, Vec<f64>>,
    read_latency_us: HashMap<SizeGroup, Vec<f64>>,
    program_ms: HashMap<SizeGroup, Vec<f64>>,
    erase_ms: HashMap<SizeGroup, Vec<f64>>,
}

impl Builder {
    fn ingest_line(&mut self, line: &str, capacity_bytes: u64) {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 6 {
            return;
        }
        let Some(op) = Operation::parse(fields[1]) else {
            return;
        };
        let Ok(size_bytes) = fields[2].trim().parse::<u64>() else {
            return;
        };
        let Some(group) = SizeGroup::classify(size_bytes, capacity_bytes) else {
            return;
        };
        let Ok(elapsed_us) = fields[4].trim().parse::<f64>() else {
            return;
        };
        if !(elapsed_us > 0.0) || !elapsed_us.is_finite() {
            return;
        }

        match op {
            Operation::Read => {
                self.read_latency_us
                    .entry(group)
                    .or_default()
                    .push(elapsed_us);
                self.read_latency_ms
                    .entry(group)
                    .or_default()
                    .push(elapsed_us / 1000.0);
                let mb_per_s = (size_bytes as f64 / (1024.0 * 1024.0))
                    / (elapsed_us / 1_000_000.0);
                if mb_per_s.is_finite() && mb_per_s > 0.0 {
                    self.read_mbps.entry(group).or_default().push(mb_per_s);
                }
            }
            Operation::Program => {
                self.program_ms
                    .entry(group)
                    .or_default()
                    .push(elapsed_us / 1000.0);
            }
            Operation::Erase => {
                self.erase_ms
                    .entry(group)
                    .or_default()
                    .push(elapsed_us / 1000.0);
            }
        }
    }

    fn finish(self) -> Aggregates {
        let mut read = HashMap::new();
        for group in SizeGroup::ALL {
            let mbps = self.read_mbps.get(&group).map(|v| summarise(v)).unwrap_or_default();
            let latency_ms = self
                .read_latency_ms
                .get(&group)
                .map(|v| summarise(v))
                .unwrap_or_default();
            let mean_latency_us = self
                .read_latency_us
                .get(&group)
                .filter(|v| !v.is_empty())
                .map(|v| v.iter().sum::<f64>() / v.len() as f64);
            if mbps.n > 0 || latency_ms.n > 0 {
                read.insert(
                    group,
                    ReadBucket {
                        mbps,
                        latency_ms,
                        mean_latency_us,
                    },
                );
            }
        }

        let program = self
            .program_ms
            .iter()
            .map(|(g, v)| (*g, summarise(v)))
            .collect();
        let erase = self
            .erase_ms
            .iter()
            .map(|(g, v)| (*g, summarise(v)))
            .collect();

        Aggregates { read, program, erase }
    }
}

/// Stream `reader` once, bucketing samples by (operation, size group).
///
/// Malformed lines are dropped silently (§7 input-malformed-line); the
/// aggregator never fails the run.
pub fn aggregate<R: BufRead>(reader: R, capacity_bytes: u64) -> Aggregates {
    let mut builder = Builder::default();
    let mut lines_seen = 0usize;
    for line in reader.lines().map_while(std::result::Result::ok) {
        if line.trim().is_empty() {
            continue;
        }
        lines_seen += 1;
        builder.ingest_line(&line, capacity_bytes);
    }
    log::debug!("aggregator read {lines_seen} non-blank lines");
    builder.finish()
}
