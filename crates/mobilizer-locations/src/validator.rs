//! Duplicate reporting for delimitation batches.
//!
//! Duplicated delimitation text is reported, never rejected: the validator is
//! a pure function over the batch and never touches a store, so every run is a
//! dry run. Counting goes through a `BTreeMap`, which makes the report
//! independent of input order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{LocationError, Result};
use crate::record::{DelimitationRecord, RawRecord};

/// Maximum rows accepted in one batch unless configured otherwise.
pub const DEFAULT_MAX_ROWS: usize = 100_000;

/// A delimitation value shared by more than one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateValue {
    pub value: String,
    pub count: usize,
}

/// A record that was skipped, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnparseableRow {
    pub line_number: usize,
    pub reason: String,
}

/// Structured result of validating a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateReport {
    /// Every record handed in, parsed or not.
    pub total_rows: usize,
    /// Distinct delimitation values among parsed records.
    pub unique_count: usize,
    /// Distinct values that occur more than once.
    pub duplicate_count: usize,
    /// Duplicated values with their counts, sorted by value.
    pub duplicates: Vec<DuplicateValue>,
    pub unparseable_count: usize,
    pub unparseable: Vec<UnparseableRow>,
}

impl DuplicateReport {
    /// True when no value occurs twice and nothing was skipped.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.duplicate_count == 0 && self.unparseable_count == 0
    }

    /// Pretty JSON for operators.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Count records per delimitation value.
pub fn tally<'a, I>(records: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a DelimitationRecord>,
{
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.delimitation.clone()).or_insert(0) += 1;
    }
    counts
}

/// Validates delimitation batches.
#[derive(Debug, Clone)]
pub struct DelimitationValidator {
    max_rows: usize,
}

impl Default for DelimitationValidator {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

impl DelimitationValidator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_rows(max_rows: usize) -> Self {
        Self { max_rows }
    }

    #[must_use]
    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    /// Produce the duplicate report for a batch.
    pub fn validate(&self, records: &[RawRecord]) -> Result<DuplicateReport> {
        self.partition(records).map(|(report, _)| report)
    }

    /// Produce the report together with the records that parsed.
    ///
    /// Parsed records keep their input order so downstream seeding assigns
    /// ordinals in first-seen order.
    #[instrument(skip(self, records), fields(rows = records.len()))]
    pub fn partition(
        &self,
        records: &[RawRecord],
    ) -> Result<(DuplicateReport, Vec<DelimitationRecord>)> {
        if records.len() > self.max_rows {
            return Err(LocationError::TooManyRows {
                rows: records.len(),
                limit: self.max_rows,
            });
        }

        let mut parsed = Vec::with_capacity(records.len());
        let mut unparseable = Vec::new();
        for raw in records {
            match DelimitationRecord::parse(raw) {
                Ok(record) => parsed.push(record),
                Err(reason) => {
                    tracing::debug!(
                        target: "locations",
                        line = raw.line_number,
                        reason = %reason,
                        "Skipping unparseable record"
                    );
                    unparseable.push(UnparseableRow {
                        line_number: raw.line_number,
                        reason: reason.to_string(),
                    });
                }
            }
        }
        unparseable.sort_by_key(|row| row.line_number);

        let counts = tally(&parsed);
        let duplicates: Vec<DuplicateValue> = counts
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(value, count)| DuplicateValue {
                value: value.clone(),
                count: *count,
            })
            .collect();

        let report = DuplicateReport {
            total_rows: records.len(),
            unique_count: counts.len(),
            duplicate_count: duplicates.len(),
            duplicates,
            unparseable_count: unparseable.len(),
            unparseable,
        };

        tracing::info!(
            target: "locations",
            total_rows = report.total_rows,
            unique = report.unique_count,
            duplicates = report.duplicate_count,
            unparseable = report.unparseable_count,
            "Delimitation batch validated"
        );

        Ok((report, parsed))
    }
}
