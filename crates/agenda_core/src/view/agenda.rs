//! Agenda view: date grouping and time ordering of a user's entries.
//!
//! # Invariants
//! - Entries are ordered by `(event_date, start_time)` ascending using
//!   plain string comparison; ISO strings sort chronologically.
//! - The sort is stable, so equal keys keep their input order.
//! - Groups iterate in first-occurrence order of their date, which is
//!   ascending date order once entries are sorted.
//! - Grouping never drops or duplicates entries.

use crate::model::attraction::{Attraction, AttractionId};
use crate::model::membership::{AgendaEntry, Membership};
use std::collections::{HashMap, HashSet};

/// Entries sharing one `event_date`, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaGroup {
    pub event_date: String,
    pub entries: Vec<AgendaEntry>,
}

impl AgendaGroup {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Date-ordered mapping from `event_date` to its entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgendaView {
    groups: Vec<AgendaGroup>,
}

impl AgendaView {
    /// Groups in iteration order.
    pub fn groups(&self) -> &[AgendaGroup] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<AgendaGroup> {
        self.groups
    }

    /// `true` signals the "empty agenda" display state.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(AgendaGroup::len).sum()
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.event_date.as_str())
    }

    pub fn group(&self, event_date: &str) -> Option<&AgendaGroup> {
        self.groups
            .iter()
            .find(|group| group.event_date == event_date)
    }
}

/// Stable in-place sort by `(event_date, start_time)` ascending.
pub fn sort_agenda_entries(entries: &mut [AgendaEntry]) {
    entries.sort_by(|left, right| {
        left.event_date()
            .cmp(right.event_date())
            .then_with(|| left.start_time().cmp(right.start_time()))
    });
}

/// Partitions entries by `event_date`, keeping input order within and
/// across groups.
pub fn group_by_date(entries: Vec<AgendaEntry>) -> AgendaView {
    let mut groups: Vec<AgendaGroup> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        match positions.get(entry.event_date()) {
            Some(&position) => groups[position].entries.push(entry),
            None => {
                positions.insert(entry.event_date().to_string(), groups.len());
                groups.push(AgendaGroup {
                    event_date: entry.event_date().to_string(),
                    entries: vec![entry],
                });
            }
        }
    }

    AgendaView { groups }
}

/// Sorts then groups; the full Agenda view derivation.
pub fn derive_agenda_view(mut entries: Vec<AgendaEntry>) -> AgendaView {
    sort_agenda_entries(&mut entries);
    group_by_date(entries)
}

/// Joins memberships with catalog records into agenda entries.
///
/// Memberships whose attraction is missing from `attractions` are dropped,
/// and a repeated attraction id only yields its first membership.
pub fn join_agenda_entries(attractions: &[Attraction], memberships: &[Membership]) -> Vec<AgendaEntry> {
    let by_id: HashMap<&AttractionId, &Attraction> = attractions
        .iter()
        .map(|attraction| (&attraction.id, attraction))
        .collect();
    let mut seen: HashSet<&AttractionId> = HashSet::new();
    let mut entries = Vec::with_capacity(memberships.len());

    for membership in memberships {
        let Some(attraction) = by_id.get(&membership.attraction_id) else {
            continue;
        };
        if !seen.insert(&membership.attraction_id) {
            continue;
        }
        entries.push(AgendaEntry::new((*attraction).clone(), membership.added_at));
    }

    entries
}
