//! Stacking priority of event groups within a cluster.
//!
//! Groups are ordered by span length (longest first), then all-day before
//! timed, then user events before holiday-feed events, then start time.
//! The first group in the order is placed first and so claims the lowest row.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveTime;

use super::grouper::EventGroup;
use crate::models::event::{EventRecord, EventSource};

/// Records by id, as seen by the sort policy.
pub type RecordLookup<'a> = HashMap<&'a str, &'a EventRecord>;

pub fn record_lookup(records: &[EventRecord]) -> RecordLookup<'_> {
    records.iter().map(|r| (r.id.as_str(), r)).collect()
}

/// Start time used for records without time data.
pub fn missing_time_sentinel() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN)
}

/// Everything the ordering looks at for one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub span: usize,
    pub all_day: bool,
    pub source: EventSource,
    pub start: NaiveTime,
}

impl SortKey {
    pub fn for_group(group: &EventGroup, lookup: &RecordLookup<'_>) -> Self {
        match lookup.get(group.event_id.as_str()) {
            Some(record) => Self::for_record(record, group.span()),
            None => Self {
                span: group.span(),
                all_day: false,
                source: EventSource::Holiday,
                start: missing_time_sentinel(),
            },
        }
    }

    /// Key of `record` when it covers `span` days.
    pub fn for_record(record: &EventRecord, span: usize) -> Self {
        Self {
            span,
            all_day: record.all_day,
            source: record.source,
            start: record.start_time().unwrap_or_else(missing_time_sentinel),
        }
    }

    /// `Less` means `self` is placed before `other`.
    pub fn priority_cmp(&self, other: &Self) -> Ordering {
        other
            .span
            .cmp(&self.span)
            .then_with(|| other.all_day.cmp(&self.all_day))
            .then_with(|| source_rank(self.source).cmp(&source_rank(other.source)))
            .then_with(|| self.start.cmp(&other.start))
    }
}

fn source_rank(source: EventSource) -> u8 {
    match source {
        EventSource::User => 0,
        EventSource::Holiday => 1,
    }
}

/// Stable sort of `groups` into stacking priority.
pub fn sort_groups(groups: &mut [EventGroup], lookup: &RecordLookup<'_>) {
    groups.sort_by(|a, b| {
        SortKey::for_group(a, lookup).priority_cmp(&SortKey::for_group(b, lookup))
    });
}

/// Move the group of `event_id` to the front, keeping the rest in order.
/// Returns false when the cluster has no such group.
pub fn promote(groups: &mut Vec<EventGroup>, event_id: &str) -> bool {
    match groups.iter().position(|g| g.event_id == event_id) {
        Some(0) => true,
        Some(index) => {
            let group = groups.remove(index);
            groups.insert(0, group);
            true
        }
        None => false,
    }
}
