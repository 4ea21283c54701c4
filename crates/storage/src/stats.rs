//! Aggregates over the pool.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::record::{ExecutionRecord, ExecutionStatus, IdeaRecord, IdeaStatus, RevenueRecord};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RevenueStats {
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub average: Decimal,
    #[serde(serialize_with = "decimal_map_as_floats")]
    pub by_source: BTreeMap<String, Decimal>,
}

impl RevenueStats {
    pub(crate) fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a RevenueRecord>,
    {
        let mut stats = RevenueStats::default();
        for record in records {
            stats.total += record.amount;
            stats.count += 1;
            *stats
                .by_source
                .entry(record.source.clone())
                .or_insert(Decimal::ZERO) += record.amount;
        }
        if stats.count > 0 {
            stats.average = stats.total / Decimal::from(stats.count);
        }
        stats
    }
}

fn decimal_map_as_floats<S>(map: &BTreeMap<String, Decimal>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(
        map.iter()
            .map(|(source, amount)| (source, amount.to_f64().unwrap_or(0.0))),
    )
}

/// Idea counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IdeaCounts {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub failed: usize,
    pub total: usize,
}

impl IdeaCounts {
    pub(crate) fn from_records(records: &[IdeaRecord]) -> Self {
        let mut counts = IdeaCounts {
            total: records.len(),
            ..IdeaCounts::default()
        };
        for record in records {
            match record.status {
                IdeaStatus::Pending => counts.pending += 1,
                IdeaStatus::InProgress => counts.in_progress += 1,
                IdeaStatus::Completed => counts.completed += 1,
                IdeaStatus::Failed => counts.failed += 1,
            }
        }
        counts
    }

    /// `completed / (completed + failed)`, 0 when neither has happened.
    pub fn success_rate(&self) -> f64 {
        let finished = self.completed + self.failed;
        if finished == 0 {
            0.0
        } else {
            self.completed as f64 / finished as f64
        }
    }
}

/// Execution counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionCounts {
    pub in_progress: usize,
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

impl ExecutionCounts {
    pub(crate) fn from_records(records: &[ExecutionRecord]) -> Self {
        let mut counts = ExecutionCounts {
            total: records.len(),
            ..ExecutionCounts::default()
        };
        for record in records {
            match record.status {
                ExecutionStatus::InProgress => counts.in_progress += 1,
                ExecutionStatus::Success => counts.success += 1,
                ExecutionStatus::Failed => counts.failed += 1,
            }
        }
        counts
    }
}

/// Pool-wide summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub ideas: IdeaCounts,
    pub success_rate: f64,
    pub revenue: RevenueStats,
    pub executions: ExecutionCounts,
}
