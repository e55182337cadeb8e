//! Browse view: search and type filtering over the catalog.
//!
//! # Invariants
//! - Output order equals input order (no ranking).
//! - Search is a case-insensitive substring match on title, speaker or
//!   description; matching any one field qualifies.
//! - An empty search string matches every attraction.

use crate::model::attraction::{Attraction, AttractionId, AttractionType};
use std::collections::HashSet;

/// Wire value selecting every type.
pub const TYPE_FILTER_ALL: &str = "all";

/// Type restriction applied by the Browse view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    /// Exact type match, including unknown types.
    Only(AttractionType),
}

impl TypeFilter {
    /// Parses `"all"` or an exact type value.
    pub fn parse(value: &str) -> Self {
        if value == TYPE_FILTER_ALL {
            Self::All
        } else {
            Self::Only(AttractionType::parse(value))
        }
    }

    pub fn matches(&self, kind: &AttractionType) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == kind,
        }
    }
}

/// User-controlled Browse view inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseQuery {
    pub search: String,
    pub type_filter: TypeFilter,
}

impl BrowseQuery {
    pub fn new(search: impl Into<String>, type_filter: TypeFilter) -> Self {
        Self {
            search: search.into(),
            type_filter,
        }
    }
}

/// One Browse view row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseItem<'a> {
    pub attraction: &'a Attraction,
    /// Whether the current user has this attraction in their agenda.
    pub in_agenda: bool,
    /// Whether a toggle for this attraction is outstanding; the trigger
    /// should be disabled while set.
    pub pending: bool,
}

/// Returns the attractions matching `query`, in input order.
pub fn browse_filter<'a>(attractions: &'a [Attraction], query: &BrowseQuery) -> Vec<&'a Attraction> {
    let needle = query.search.to_lowercase();
    attractions
        .iter()
        .filter(|attraction| query.type_filter.matches(&attraction.kind))
        .filter(|attraction| matches_search(attraction, &needle))
        .collect()
}

/// Builds Browse view rows annotated with agenda and pending state.
///
/// Repeated ids in `attractions` keep only their first occurrence.
pub fn derive_browse_view<'a>(
    attractions: &'a [Attraction],
    memberships: &HashSet<AttractionId>,
    pending: &HashSet<AttractionId>,
    query: &BrowseQuery,
) -> Vec<BrowseItem<'a>> {
    let mut seen: HashSet<&AttractionId> = HashSet::new();
    let mut items = Vec::new();

    for attraction in browse_filter(attractions, query) {
        if !seen.insert(&attraction.id) {
            continue;
        }
        items.push(BrowseItem {
            attraction,
            in_agenda: memberships.contains(&attraction.id),
            pending: pending.contains(&attraction.id),
        });
    }

    items
}

fn matches_search(attraction: &Attraction, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    [
        attraction.title.as_str(),
        attraction.speaker.as_str(),
        attraction.description.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}
