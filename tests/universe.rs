//! Set algebra of the universe type.

use coinbasepro_connect::universe::Universe;

fn sorted_snapshot(universe: &Universe) -> Vec<String> {
    let mut snapshot = universe.snapshot();
    snapshot.sort();

    snapshot
}

#[test]
fn insert_remove_clear() {
    let universe = Universe::new();
    assert!(universe.is_empty());

    universe.insert("BTC-USD");
    universe.insert("ETH-USD");
    universe.insert("BTC-USD");
    assert_eq!(universe.len(), 2);
    assert!(universe.contains("BTC-USD"));

    universe.remove("BTC-USD");
    assert!(!universe.contains("BTC-USD"));
    assert_eq!(universe.len(), 1);

    universe.clear();
    assert!(universe.is_empty());
}

#[test]
fn update_replaces_contents() {
    let universe: Universe = ["BTC-USD", "ETH-USD"].into_iter().collect();
    let replacement: Universe = ["SOL-USD"].into_iter().collect();

    universe.update(&replacement);

    assert_eq!(sorted_snapshot(&universe), vec!["SOL-USD".to_owned()]);
}

#[test]
fn merge_unions_contents() {
    let universe: Universe = ["BTC-USD"].into_iter().collect();
    let other: Universe = ["BTC-USD", "ETH-USD"].into_iter().collect();

    universe.merge(&other);

    assert_eq!(
        sorted_snapshot(&universe),
        vec!["BTC-USD".to_owned(), "ETH-USD".to_owned()]
    );
}

#[test]
fn intersection_retains_common_elements() {
    let universe: Universe = ["BTC-USD", "ETH-USD", "SOL-USD"].into_iter().collect();
    let other: Universe = ["ETH-USD", "SOL-USD", "DOGE-USD"].into_iter().collect();

    universe.intersection(&other);

    assert_eq!(
        sorted_snapshot(&universe),
        vec!["ETH-USD".to_owned(), "SOL-USD".to_owned()]
    );
}

#[test]
fn clone_is_a_snapshot() {
    let universe: Universe = ["BTC-USD"].into_iter().collect();
    let copied = universe.clone();

    universe.insert("ETH-USD");

    assert_eq!(copied.len(), 1);
    assert_eq!(universe.len(), 2);
}
