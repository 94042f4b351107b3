use std::collections::BTreeSet;
use std::sync::Arc;

use laundromatic::application::WatcherRepository;
use laundromatic::application::usecases::ResolveWatchersUseCase;
use laundromatic::domain::UserId;
use laundromatic::infrastructure::{fake_chat::FakeChatClient, memory_store::InMemoryWatchRegistry};

fn ids(registry: &InMemoryWatchRegistry) -> Vec<u64> {
    registry.list().unwrap().iter().map(|w| w.id.get()).collect()
}

#[test]
fn add_is_idempotent() {
    let registry = InMemoryWatchRegistry::new();
    let input = [5, 3, 5, 9, 3, 3, 1];

    let mut created = 0;
    for id in input {
        let (watcher, new) = registry.add(UserId::new(id)).unwrap();
        assert_eq!(watcher.id.get(), id);
        if new {
            created += 1;
        }
    }

    let unique: BTreeSet<u64> = input.into_iter().collect();
    assert_eq!(created, unique.len());
    assert_eq!(ids(&registry), vec![5, 3, 9, 1]);
}

#[test]
fn second_remove_is_not_found() {
    let registry = InMemoryWatchRegistry::with_ids([1, 2].map(UserId::new));

    let removed = registry.remove(UserId::new(1)).unwrap();
    assert_eq!(removed.map(|w| w.id.get()), Some(1));
    assert_eq!(registry.list().unwrap().len(), 1);

    assert!(registry.remove(UserId::new(1)).unwrap().is_none());
    assert_eq!(registry.list().unwrap().len(), 1);
}

#[test]
fn add_then_remove_restores_listing() {
    let registry = InMemoryWatchRegistry::with_ids([4, 2, 8].map(UserId::new));
    let before = registry.list().unwrap();

    registry.add(UserId::new(6)).unwrap();
    assert_eq!(ids(&registry), vec![4, 2, 8, 6]);
    registry.remove(UserId::new(6)).unwrap();

    assert_eq!(registry.list().unwrap(), before);
}

#[test]
fn removing_from_the_middle_keeps_order() {
    let registry = InMemoryWatchRegistry::with_ids([4, 2, 8].map(UserId::new));
    registry.remove(UserId::new(2)).unwrap();
    assert_eq!(ids(&registry), vec![4, 8]);
}

#[test]
fn concurrent_adds_register_once() {
    let registry = Arc::new(InMemoryWatchRegistry::new());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || registry.add(UserId::new(7)).unwrap().1)
        })
        .collect();

    let created = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|c| *c)
        .count();
    assert_eq!(created, 1);
    assert_eq!(ids(&registry), vec![7]);
}

#[tokio::test]
async fn failed_resolution_is_retried_next_pass() {
    let registry = InMemoryWatchRegistry::with_ids([1, 2].map(UserId::new));
    let flaky = FakeChatClient::new().with_unknown_user(2);

    let resolver = ResolveWatchersUseCase {
        registry: &registry,
        chat: &flaky,
    };
    assert_eq!(resolver.resolve_all().await.unwrap(), 1);
    assert_eq!(ids(&registry), vec![1, 2]);
    assert_eq!(flaky.fetch_count(1), 1);

    let healthy = FakeChatClient::new().with_member(2, "bea");
    let resolver = ResolveWatchersUseCase {
        registry: &registry,
        chat: &healthy,
    };
    assert_eq!(resolver.resolve_all().await.unwrap(), 1);
    // already-resolved watchers are not fetched again
    assert_eq!(healthy.fetch_count(1), 0);
    assert_eq!(healthy.fetch_count(2), 1);

    let watchers = registry.list().unwrap();
    assert!(watchers.iter().all(|w| w.resolved));
    assert_eq!(watchers[1].display_name.as_deref(), Some("bea"));
}
