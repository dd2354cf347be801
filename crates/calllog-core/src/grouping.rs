//! Call-log grouping algorithm.
//!
//! Partitions a call history (most recent first) into call groups, runs of
//! adjacent calls with the same party and account that render as a single
//! row, and tags every call with the day group used for section headers.
//!
//! # Algorithm Summary
//!
//! 1. The first record opens a group and becomes its anchor
//! 2. Each following record joins the open group if it matches the anchor
//!    (see [`should_group`]), otherwise it closes that group and opens a new one
//! 3. The day group is recomputed only when a group opens, so every call in a
//!    group shares the day group of the call that opened it
//! 4. Only groups with more than one call are emitted; singletons are implicit

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::ops::Range;

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::call_type::CallType;
use crate::day_group::{DayGroup, day_group_of};
use crate::number::numbers_equivalent;
use crate::record::CallLogEntry;
use crate::types::CallId;

/// A run of consecutive records rendered as one row.
///
/// Covers positions `[start, start + size)` of the grouped sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallGroup {
    pub start: usize,
    pub size: usize,
}

impl CallGroup {
    pub const fn new(start: usize, size: usize) -> Self {
        Self { start, size }
    }

    /// Exclusive end position.
    pub const fn end(&self) -> usize {
        self.start + self.size
    }

    pub const fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    pub const fn contains(&self, position: usize) -> bool {
        position >= self.start && position < self.end()
    }
}

/// Day group per call id.
///
/// Set-once: the first day group recorded for an id is kept and later
/// assignments for the same id are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayGroups(BTreeMap<CallId, DayGroup>);

impl DayGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the day group for a call unless it already has one.
    ///
    /// Returns `true` if the value was stored.
    pub fn set(&mut self, id: CallId, day_group: DayGroup) -> bool {
        match self.0.entry(id) {
            Entry::Vacant(entry) => {
                entry.insert(day_group);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, id: CallId) -> Option<DayGroup> {
        self.0.get(&id).copied()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (CallId, DayGroup)> + '_ {
        self.0.iter().map(|(id, group)| (*id, *group))
    }
}

/// A day header to render above the row starting at `position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionHeader {
    pub position: usize,
    pub day_group: DayGroup,
}

/// Output of one grouping pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingResult {
    /// Emitted groups in ascending position order.
    pub groups: Vec<CallGroup>,

    pub day_groups: DayGroups,
}

impl GroupingResult {
    /// Returns every row of a `total`-record sequence, filling the gaps
    /// between emitted groups with single-record rows.
    pub fn rows(&self, total: usize) -> Vec<CallGroup> {
        let mut rows = Vec::with_capacity(total);
        let mut position = 0;

        for group in &self.groups {
            while position < group.start {
                rows.push(CallGroup::new(position, 1));
                position += 1;
            }
            rows.push(*group);
            position = group.end();
        }
        while position < total {
            rows.push(CallGroup::new(position, 1));
            position += 1;
        }

        rows
    }

    /// Size of the emitted group starting at `position`, if any.
    pub fn group_size_at(&self, position: usize) -> Option<usize> {
        self.groups
            .binary_search_by_key(&position, |group| group.start)
            .ok()
            .map(|idx| self.groups[idx].size)
    }

    /// Returns the rows that need a day header above them.
    ///
    /// A header goes above a row whose day group differs from the previous
    /// row's; the first row always gets one. `entries` should be the slice
    /// this result was computed from. Groups reaching past its end are
    /// skipped.
    pub fn section_headers<E: CallLogEntry>(&self, entries: &[E]) -> Vec<SectionHeader> {
        let mut headers = Vec::new();
        let mut previous = DayGroup::None;

        for row in self.rows(entries.len()) {
            let Some(entry) = entries.get(row.start) else {
                continue;
            };
            let Some(day_group) = self.day_groups.get(entry.id()) else {
                continue;
            };
            if day_group != previous {
                headers.push(SectionHeader {
                    position: row.start,
                    day_group,
                });
                previous = day_group;
            }
        }

        headers
    }
}

/// How records are turned into rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingMode {
    /// Adjacent matching calls collapse into one row.
    #[default]
    Merged,
    /// One row per call, day headers only.
    Flat,
}

impl GroupingMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Merged => "merged",
            Self::Flat => "flat",
        }
    }
}

/// Runs grouping passes in a fixed mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallLogGrouper {
    mode: GroupingMode,
}

impl CallLogGrouper {
    pub const fn new(mode: GroupingMode) -> Self {
        Self { mode }
    }

    pub const fn mode(&self) -> GroupingMode {
        self.mode
    }

    /// Groups `entries` against the current local time, read once.
    pub fn group<E: CallLogEntry>(&self, entries: &[E]) -> GroupingResult {
        self.group_at(entries, &Local::now())
    }

    /// Groups `entries` against a caller-supplied "now".
    pub fn group_at<E: CallLogEntry, Tz: TimeZone>(
        &self,
        entries: &[E],
        now: &DateTime<Tz>,
    ) -> GroupingResult {
        match self.mode {
            GroupingMode::Merged => compute_groups(entries, now),
            GroupingMode::Flat => compute_single_item_groups(entries, now),
        }
    }
}

/// Returns true if `entry` belongs in the group anchored by `anchor`.
///
/// Requires an equivalent number, identical post-dial digits and via number,
/// and the same account. Voicemails never group, and blocked calls only group
/// with other blocked calls.
pub fn should_group<E: CallLogEntry>(anchor: &E, entry: &E) -> bool {
    numbers_equivalent(anchor.number(), entry.number())
        && anchor.post_dial_digits() == entry.post_dial_digits()
        && anchor.via_number() == entry.via_number()
        && same_account(anchor, entry)
        && call_types_compatible(anchor.call_type(), entry.call_type())
}

fn same_account<E: CallLogEntry>(a: &E, b: &E) -> bool {
    a.account_component_name() == b.account_component_name() && a.account_id() == b.account_id()
}

const fn call_types_compatible(a: CallType, b: CallType) -> bool {
    !a.is_voicemail() && !b.is_voicemail() && a.is_blocked() == b.is_blocked()
}

/// Groups adjacent matching calls and assigns day groups.
///
/// Entries must be sorted by timestamp descending; they are not re-sorted.
/// `now` is used for every day-group computation in the pass.
pub fn compute_groups<E: CallLogEntry, Tz: TimeZone>(
    entries: &[E],
    now: &DateTime<Tz>,
) -> GroupingResult {
    let mut result = GroupingResult::default();
    let Some((first, rest)) = entries.split_first() else {
        return result;
    };

    let mut anchor = first;
    let mut day_group = day_group_of(first.timestamp_ms(), now);
    let mut group_size = 1;
    result.day_groups.set(first.id(), day_group);

    for (offset, entry) in rest.iter().enumerate() {
        let position = offset + 1;

        if should_group(anchor, entry) {
            group_size += 1;
        } else {
            // Group boundary: the day group is only resampled here.
            day_group = day_group_of(entry.timestamp_ms(), now);
            if group_size > 1 {
                result
                    .groups
                    .push(CallGroup::new(position - group_size, group_size));
            }
            group_size = 1;
            anchor = entry;
        }

        result.day_groups.set(entry.id(), day_group);
    }

    if group_size > 1 {
        result
            .groups
            .push(CallGroup::new(entries.len() - group_size, group_size));
    }

    tracing::debug!(
        records = entries.len(),
        groups = result.groups.len(),
        "grouped call log"
    );
    result
}

/// Puts every call in its own group and assigns each its own day group.
pub fn compute_single_item_groups<E: CallLogEntry, Tz: TimeZone>(
    entries: &[E],
    now: &DateTime<Tz>,
) -> GroupingResult {
    let mut result = GroupingResult {
        groups: Vec::with_capacity(entries.len()),
        day_groups: DayGroups::new(),
    };

    for (position, entry) in entries.iter().enumerate() {
        result.groups.push(CallGroup::new(position, 1));
        result
            .day_groups
            .set(entry.id(), day_group_of(entry.timestamp_ms(), now));
    }

    tracing::debug!(records = entries.len(), "grouped call log one call per row");
    result
}
