//! Per-key averages over `key,number` records.
//!
//! Each record becomes `(key, (number, 1))`, aggregates sharing a key are
//! merged with the sum-count monoid, and every merged aggregate is divided
//! once at the end. The whole run fails on the first malformed record; no
//! partial mapping is ever returned.
//!
//! Parsing rules: the record is split at the first `,`. The key is the
//! text before it, taken verbatim (it may be empty or contain spaces).
//! The remainder is parsed as an `i64` after trimming surrounding
//! whitespace; anything else (an empty field, interior whitespace, a
//! second comma, a value out of range) is a parse error.

use crate::context::FlowContext;
use crate::monoid::{SumCount, finalize, merge};
use crate::rdd::{PairRdd, SimpleRdd};
use crate::shuffle::HashPartitioner;
use crate::traits::{RddError, RddResult};
use monoflow_common::CommonError;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::num::IntErrorKind;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Parse a `key,number` record into `(key, (number, 1))`.
pub fn parse_record(record: &str) -> RddResult<(String, SumCount)> {
    let (key, number) = record
        .split_once(',')
        .ok_or_else(|| RddError::parse_error(record, "missing ',' separator"))?;
    let number = number.trim();
    let value: i64 = number.parse().map_err(|e: std::num::ParseIntError| {
        let reason = match e.kind() {
            IntErrorKind::Empty => "empty numeric field".to_string(),
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                format!("{number} does not fit in a 64-bit signed integer")
            }
            _ => format!("{number:?} is not a valid integer"),
        };
        RddError::parse_error(record, reason)
    })?;
    Ok((key.to_string(), SumCount::of(value)))
}

/// Group records by key and merge their partial aggregates, on the calling thread.
pub fn sum_count_records<I, S>(records: I) -> RddResult<HashMap<String, SumCount>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut groups: HashMap<String, SumCount> = HashMap::new();
    for (index, record) in records.into_iter().enumerate() {
        let (key, agg) = parse_record(record.as_ref()).map_err(|e| e.at_line(index + 1))?;
        let entry = groups.entry(key).or_default();
        *entry = merge(*entry, agg);
    }
    Ok(groups)
}

/// Finalize every grouped aggregate into its mean.
pub fn finalize_all(groups: HashMap<String, SumCount>) -> RddResult<HashMap<String, f64>> {
    groups
        .into_iter()
        .map(|(key, agg)| Ok((key, finalize(agg)?)))
        .collect()
}

/// Single-threaded reference implementation of the whole run.
pub fn average_records<I, S>(records: I) -> RddResult<HashMap<String, f64>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    finalize_all(sum_count_records(records)?)
}

/// Everything a run produced, stage by stage.
#[derive(Debug, Clone)]
pub struct AverageReport {
    /// Lines read from the input.
    pub record_count: usize,
    /// `(key, (number, 1))` pairs produced by parsing.
    pub pair_count: usize,
    pub sum_counts: HashMap<String, SumCount>,
    pub averages: HashMap<String, f64>,
}

impl AverageReport {
    /// Averages ordered by key, for stable display.
    pub fn sorted_averages(&self) -> Vec<(&str, f64)> {
        let mut averages: Vec<(&str, f64)> = self
            .averages
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        averages.sort_by(|a, b| a.0.cmp(b.0));
        averages
    }

    /// Partial aggregates ordered by key.
    pub fn sorted_sum_counts(&self) -> Vec<(&str, SumCount)> {
        let mut sum_counts: Vec<(&str, SumCount)> = self
            .sum_counts
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        sum_counts.sort_by(|a, b| a.0.cmp(b.0));
        sum_counts
    }

    /// Stage counts followed by one `key<TAB>average` line per key, sorted by key.
    pub fn render_text(&self, input: &Path) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "input_path: {}", input.display());
        let _ = writeln!(out, "records.count(): {}", self.record_count);
        let _ = writeln!(out, "sum_and_freq.count(): {}", self.pair_count);
        let _ = writeln!(out, "sum_count.count(): {}", self.sum_counts.len());
        for (key, agg) in self.sorted_sum_counts() {
            let _ = writeln!(out, "  {key}: (sum = {}, count = {})", agg.sum, agg.count);
        }
        let _ = writeln!(out, "averages.count(): {}", self.averages.len());
        for (key, average) in self.sorted_averages() {
            let _ = writeln!(out, "{key}\t{average}");
        }
        out
    }

    /// A pretty-printed JSON object mapping each key to its average.
    pub fn to_json(&self) -> RddResult<String> {
        let averages: BTreeMap<&str, f64> = self.sorted_averages().into_iter().collect();
        serde_json::to_string_pretty(&averages).map_err(|e| {
            CommonError::internal_error_with_source("failed to encode averages", e).into()
        })
    }
}

/// Parallel averaging on a [`FlowContext`]: parse per partition, combine
/// map-side, shuffle by key hash, merge, then finalize.
#[derive(Debug)]
pub struct AveragePipeline<'a> {
    context: &'a FlowContext,
    reduce_partitions: usize,
}

impl<'a> AveragePipeline<'a> {
    pub fn new(context: &'a FlowContext) -> Self {
        Self {
            context,
            reduce_partitions: context.default_parallelism(),
        }
    }

    /// Number of partitions the keys are hashed into. 0 is treated as 1.
    pub fn with_reduce_partitions(mut self, partitions: usize) -> Self {
        self.reduce_partitions = partitions.max(1);
        self
    }

    /// Parse every line into `(key, (number, 1))`, tagging errors with their line number.
    pub fn parse(records: SimpleRdd<String>) -> SimpleRdd<(String, SumCount)> {
        records
            .zip_with_index()
            .try_map(|(index, line)| parse_record(&line).map_err(|e| e.at_line(index + 1)))
    }

    /// Run the full pipeline over a dataset of lines.
    pub fn run(&self, records: SimpleRdd<String>) -> RddResult<AverageReport> {
        let context = self.context;
        let record_count = context.count(&records)?;

        let pairs = Self::parse(records);
        let pair_count = context.count(&pairs)?;

        let partitioner = Arc::new(HashPartitioner::new(
            u32::try_from(self.reduce_partitions).unwrap_or(u32::MAX),
        ));
        let shuffled = pairs.reduce_by_key(merge, partitioner);
        let sum_counts = context.shuffle(&shuffled)?;
        let averages = sum_counts.clone().try_map_values(finalize);

        let report = AverageReport {
            record_count,
            pair_count,
            sum_counts: context.run(&sum_counts)?.into_iter().collect(),
            averages: context.run(&averages)?.into_iter().collect(),
        };
        info!(
            app_name = context.app_name(),
            records = report.record_count,
            keys = report.averages.len(),
            "average pipeline finished"
        );
        Ok(report)
    }

    /// Run the full pipeline over a text file or a directory of text files.
    pub fn run_path<P: AsRef<Path>>(&self, path: P) -> RddResult<AverageReport> {
        let records = self.context.text_file(path)?;
        self.run(records)
    }

    /// Key to average mapping for in-memory records.
    pub fn averages<S: AsRef<str>>(&self, records: &[S]) -> RddResult<HashMap<String, f64>> {
        let lines: Vec<String> = records.iter().map(|r| r.as_ref().to_string()).collect();
        let records = self.context.parallelize(lines);
        Ok(self.run(records)?.averages)
    }
}
