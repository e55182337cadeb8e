mod support;

use agenda_core::{
    AttractionId, CatalogService, FetchError, MembershipService, RecordingNotifier, Severity,
    UserContext,
};
use support::{attraction, scenario_catalog, FakeRepository};

#[test]
fn fetch_attractions_returns_schedule_order() {
    let repo = FakeRepository::with_catalog(scenario_catalog());
    let service = CatalogService::new(&repo);
    let notifier = RecordingNotifier::new();

    let attractions = service.fetch_attractions(&notifier).unwrap();
    let ids: Vec<&str> = attractions.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "1"]);
    assert!(notifier.notifications().is_empty());
}

#[test]
fn fetch_attractions_failure_is_notified_and_returned() {
    let repo = FakeRepository::with_catalog(scenario_catalog()).failing_reads();
    let service = CatalogService::new(&repo);
    let notifier = RecordingNotifier::new();

    let err = service.fetch_attractions(&notifier).unwrap_err();
    assert!(matches!(err, FetchError::Attractions(_)));
    let received = notifier.notifications();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].severity, Severity::Error);
}

#[test]
fn fetch_agenda_groups_added_attractions() {
    let mut catalog = scenario_catalog();
    catalog.push(attraction("3", "2024-10-09", "15:00:00", "networking", "Happy hour"));
    let repo = FakeRepository::with_catalog(catalog);
    let notifier = RecordingNotifier::new();
    let user = UserContext::new("user-1");

    let memberships = MembershipService::new(&repo);
    for id in ["1", "3", "2"] {
        memberships
            .add(Some(&user), &AttractionId::new(id), &notifier)
            .unwrap();
    }

    let view = CatalogService::new(&repo)
        .fetch_agenda(Some(&user), &notifier)
        .unwrap()
        .unwrap();
    assert_eq!(view.dates().collect::<Vec<_>>(), vec!["2024-10-09", "2024-10-10"]);
    let day_two: Vec<&str> = view
        .group("2024-10-10")
        .unwrap()
        .entries
        .iter()
        .map(|entry| entry.id().as_str())
        .collect();
    assert_eq!(day_two, vec!["2", "1"]);
}

#[test]
fn fetch_agenda_without_user_is_skipped() {
    let repo = FakeRepository::with_catalog(scenario_catalog()).failing_reads();
    let notifier = RecordingNotifier::new();

    let view = CatalogService::new(&repo)
        .fetch_agenda(None, &notifier)
        .unwrap();
    assert!(view.is_none());
    assert!(notifier.notifications().is_empty());
}

#[test]
fn fetch_agenda_failure_is_notified() {
    let repo = FakeRepository::with_catalog(scenario_catalog()).failing_reads();
    let notifier = RecordingNotifier::new();

    let err = CatalogService::new(&repo)
        .fetch_agenda(Some(&UserContext::new("user-1")), &notifier)
        .unwrap_err();
    assert!(matches!(err, FetchError::Agenda(_)));
    assert_eq!(notifier.error_count(), 1);
}

#[test]
fn empty_agenda_is_a_state_not_an_error() {
    let repo = FakeRepository::with_catalog(scenario_catalog());
    let notifier = RecordingNotifier::new();

    let view = CatalogService::new(&repo)
        .fetch_agenda(Some(&UserContext::new("nobody")), &notifier)
        .unwrap()
        .unwrap();
    assert!(view.is_empty());
    assert!(notifier.notifications().is_empty());
}
