#![allow(dead_code)]

use agenda_core::{
    AgendaEntry, Attraction, AttractionId, AttractionRepository, AttractionType, Membership,
    RepoError, RepoResult, UserId,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};

pub fn attraction(id: &str, event_date: &str, start_time: &str, kind: &str, title: &str) -> Attraction {
    Attraction {
        id: AttractionId::new(id),
        title: title.to_string(),
        description: String::new(),
        speaker: String::new(),
        location: "Main hall".to_string(),
        kind: AttractionType::parse(kind),
        event_date: event_date.to_string(),
        start_time: start_time.to_string(),
        end_time: "23:00:00".to_string(),
    }
}

/// The two-attraction catalog used across scenarios.
pub fn scenario_catalog() -> Vec<Attraction> {
    vec![
        attraction("1", "2024-10-10", "09:00:00", "palestra", "Intro AI"),
        attraction("2", "2024-10-10", "08:00:00", "workshop", "Rust 101"),
    ]
}

pub fn entry(id: &str, event_date: &str, start_time: &str) -> AgendaEntry {
    AgendaEntry::new(attraction(id, event_date, start_time, "palestra", id), 0)
}

/// Pauses `create_membership` for one attraction id until released.
pub struct CreateGate {
    pub attraction_id: AttractionId,
    pub entered: Arc<Barrier>,
    pub release: Arc<Barrier>,
}

impl CreateGate {
    pub fn new(attraction_id: &str) -> Self {
        Self {
            attraction_id: AttractionId::new(attraction_id),
            entered: Arc::new(Barrier::new(2)),
            release: Arc::new(Barrier::new(2)),
        }
    }
}

/// Pauses `list_memberships` after it has read the store, until released.
pub struct ListGate {
    pub entered: Arc<Barrier>,
    pub release: Arc<Barrier>,
}

impl ListGate {
    pub fn new() -> Self {
        Self {
            entered: Arc::new(Barrier::new(2)),
            release: Arc::new(Barrier::new(2)),
        }
    }
}

/// In-memory repository with switchable failures and call counters.
#[derive(Default)]
pub struct FakeRepository {
    pub attractions: Vec<Attraction>,
    pub memberships: Mutex<Vec<Membership>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub create_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub gate: Option<CreateGate>,
    pub list_gate: Option<ListGate>,
}

impl FakeRepository {
    pub fn with_catalog(attractions: Vec<Attraction>) -> Self {
        Self {
            attractions,
            ..Self::default()
        }
    }

    pub fn failing_writes(self) -> Self {
        self.fail_writes.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_reads(self) -> Self {
        self.fail_reads.store(true, Ordering::SeqCst);
        self
    }

    pub fn with_gate(mut self, gate: CreateGate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn with_list_gate(mut self, gate: ListGate) -> Self {
        self.list_gate = Some(gate);
        self
    }

    pub fn seed_membership(&self, user_id: &str, attraction_id: &str) {
        let mut memberships = self.memberships.lock().unwrap();
        let added_at = i64::try_from(memberships.len()).unwrap();
        memberships.push(Membership {
            user_id: UserId::new(user_id),
            attraction_id: AttractionId::new(attraction_id),
            added_at,
        });
    }

    pub fn stored_ids(&self, user_id: &str) -> Vec<String> {
        self.memberships
            .lock()
            .unwrap()
            .iter()
            .filter(|membership| membership.user_id.as_str() == user_id)
            .map(|membership| membership.attraction_id.to_string())
            .collect()
    }

    fn check_reads(&self) -> RepoResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepoError::Unavailable("read rejected".to_string()));
        }
        Ok(())
    }

    fn check_writes(&self) -> RepoResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepoError::Unavailable("write rejected".to_string()));
        }
        Ok(())
    }
}

impl AttractionRepository for FakeRepository {
    fn list_attractions(&self) -> RepoResult<Vec<Attraction>> {
        self.check_reads()?;
        let mut attractions = self.attractions.clone();
        attractions.sort_by(|left, right| {
            (&left.event_date, &left.start_time).cmp(&(&right.event_date, &right.start_time))
        });
        Ok(attractions)
    }

    fn list_memberships(&self, user_id: &UserId) -> RepoResult<Vec<Membership>> {
        self.check_reads()?;
        let snapshot: Vec<Membership> = self
            .memberships
            .lock()
            .unwrap()
            .iter()
            .filter(|membership| &membership.user_id == user_id)
            .cloned()
            .collect();
        if let Some(gate) = &self.list_gate {
            gate.entered.wait();
            gate.release.wait();
        }
        Ok(snapshot)
    }

    fn list_agenda_entries(&self, user_id: &UserId) -> RepoResult<Vec<AgendaEntry>> {
        let memberships = self.list_memberships(user_id)?;
        let mut entries = agenda_core::join_agenda_entries(&self.attractions, &memberships);
        entries.reverse();
        Ok(entries)
    }

    fn create_membership(&self, user_id: &UserId, attraction_id: &AttractionId) -> RepoResult<()> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            if &gate.attraction_id == attraction_id {
                gate.entered.wait();
                gate.release.wait();
            }
        }
        self.check_writes()?;

        let mut memberships = self.memberships.lock().unwrap();
        if memberships
            .iter()
            .any(|m| &m.user_id == user_id && &m.attraction_id == attraction_id)
        {
            return Err(RepoError::Conflict {
                user_id: user_id.clone(),
                attraction_id: attraction_id.clone(),
            });
        }
        let added_at = i64::try_from(memberships.len()).unwrap();
        memberships.push(Membership {
            user_id: user_id.clone(),
            attraction_id: attraction_id.clone(),
            added_at,
        });
        Ok(())
    }

    fn delete_membership(&self, user_id: &UserId, attraction_id: &AttractionId) -> RepoResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check_writes()?;
        self.memberships
            .lock()
            .unwrap()
            .retain(|m| !(&m.user_id == user_id && &m.attraction_id == attraction_id));
        Ok(())
    }
}
