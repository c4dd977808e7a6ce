// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::{Clock, FakeClock};
use crate::identity::{ClientIdentity, Requester};
use chrono::Duration;

fn identity(user: u32, service: u32) -> ClientIdentity {
    ClientIdentity::new(user, format!("user{}", user), service, format!("svc{}", service))
}

fn insert(table: &mut LockTable, app: &str, user: u32, clock: &FakeClock) -> bool {
    let record = LockRecord::new(app, &identity(user, 1), clock.now(), None);
    match table.plan_insert(record) {
        Some(op) => table.apply(&op),
        None => false,
    }
}

fn users(table: &LockTable, app: &str) -> Vec<u32> {
    table
        .queue(app)
        .iter()
        .map(|r| r.requester.user_id.0)
        .collect()
}

#[test]
fn empty_table_has_no_holder() {
    let table = LockTable::new();
    assert!(table.holder("detox").is_none());
    assert!(table.queue("detox").is_empty());
    assert!(table.is_empty());
}

#[test]
fn first_insert_becomes_holder() {
    let clock = FakeClock::new();
    let mut table = LockTable::new();

    assert!(insert(&mut table, "detox", 1, &clock));

    let holder = table.holder("detox").unwrap();
    assert_eq!(holder.requester, Requester::new(1, 1));
    assert_eq!(holder.sequence, 0);
    assert_eq!(table.next_sequence(), 1);
}

#[test]
fn inserts_queue_in_arrival_order() {
    let clock = FakeClock::new();
    let mut table = LockTable::new();

    for user in [3, 1, 2] {
        insert(&mut table, "detox", user, &clock);
        clock.advance(Duration::seconds(1));
    }

    assert_eq!(users(&table, "detox"), vec![3, 1, 2]);
}

#[test]
fn same_tick_inserts_keep_arrival_order() {
    let clock = FakeClock::new();
    let mut table = LockTable::new();

    for user in [9, 4, 6] {
        insert(&mut table, "detox", user, &clock);
    }

    assert_eq!(users(&table, "detox"), vec![9, 4, 6]);
}

#[test]
fn timestamp_is_raised_when_clock_steps_back() {
    let clock = FakeClock::new();
    let mut table = LockTable::new();

    insert(&mut table, "detox", 1, &clock);
    let first_ts = table.holder("detox").unwrap().timestamp;

    clock.advance(Duration::seconds(-30));
    insert(&mut table, "detox", 2, &clock);

    assert_eq!(users(&table, "detox"), vec![1, 2]);
    assert_eq!(table.queue("detox")[1].timestamp, first_ts);
}

#[test]
fn duplicate_key_is_not_planned() {
    let clock = FakeClock::new();
    let mut table = LockTable::new();
    insert(&mut table, "detox", 1, &clock);

    let again = LockRecord::new("detox", &identity(1, 1), clock.now(), Some("x".into()));
    assert!(table.plan_insert(again).is_none());
    assert_eq!(table.len(), 1);
}

#[test]
fn replayed_duplicate_insert_is_ignored() {
    let clock = FakeClock::new();
    let mut table = LockTable::new();
    let record = LockRecord::new("detox", &identity(1, 1), clock.now(), None);
    let op = table.plan_insert(record).unwrap();

    assert!(table.apply(&op));
    assert!(!table.apply(&op));
    assert_eq!(table.len(), 1);
}

#[test]
fn same_user_different_service_is_a_different_key() {
    let clock = FakeClock::new();
    let mut table = LockTable::new();

    let interactive = LockRecord::new("detox", &identity(1, 1), clock.now(), None);
    let automated = LockRecord::new("detox", &identity(1, 2), clock.now(), None);
    let op = table.plan_insert(interactive).unwrap();
    table.apply(&op);
    let op = table.plan_insert(automated).unwrap();
    table.apply(&op);

    assert_eq!(table.queue("detox").len(), 2);
}

#[test]
fn delete_removes_only_that_key() {
    let clock = FakeClock::new();
    let mut table = LockTable::new();
    for user in [1, 2, 3] {
        insert(&mut table, "detox", user, &clock);
        clock.advance(Duration::seconds(1));
    }

    let op = table
        .plan_delete(&LockKey::new("detox", Requester::new(2, 1)))
        .unwrap();
    assert!(table.apply(&op));

    assert_eq!(users(&table, "detox"), vec![1, 3]);
}

#[test]
fn deleting_holder_promotes_next_record() {
    let clock = FakeClock::new();
    let mut table = LockTable::new();
    insert(&mut table, "detox", 1, &clock);
    clock.advance(Duration::seconds(1));
    insert(&mut table, "detox", 2, &clock);

    let op = table
        .plan_delete(&LockKey::new("detox", Requester::new(1, 1)))
        .unwrap();
    table.apply(&op);

    assert_eq!(table.holder("detox").unwrap().requester, Requester::new(2, 1));
}

#[test]
fn delete_of_missing_key_is_not_planned() {
    let table = LockTable::new();
    assert!(table
        .plan_delete(&LockKey::new("detox", Requester::new(1, 1)))
        .is_none());
}

#[test]
fn empty_queues_are_dropped_from_counts() {
    let clock = FakeClock::new();
    let mut table = LockTable::new();
    insert(&mut table, "detox", 1, &clock);
    insert(&mut table, "dealer", 1, &clock);
    insert(&mut table, "dealer", 2, &clock);

    let op = table
        .plan_delete(&LockKey::new("detox", Requester::new(1, 1)))
        .unwrap();
    table.apply(&op);

    let counts = table.counts();
    assert_eq!(counts.get("dealer"), Some(&2));
    assert!(!counts.contains_key("detox"));
    assert_eq!(table.len(), 2);
}

#[test]
fn applications_are_independent() {
    let clock = FakeClock::new();
    let mut table = LockTable::new();
    insert(&mut table, "detox", 1, &clock);
    insert(&mut table, "dealer", 2, &clock);

    assert_eq!(users(&table, "detox"), vec![1]);
    assert_eq!(users(&table, "dealer"), vec![2]);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Step {
        Lock { user: u32, advance: i64 },
        Unlock { user: u32 },
    }

    fn arb_step() -> impl Strategy<Value = Step> {
        prop_oneof![
            (1u32..6, -2i64..3).prop_map(|(user, advance)| Step::Lock { user, advance }),
            (1u32..6).prop_map(|user| Step::Unlock { user }),
        ]
    }

    proptest! {
        #[test]
        fn queue_stays_unique_and_ordered(steps in proptest::collection::vec(arb_step(), 0..40)) {
            let clock = FakeClock::new();
            let mut table = LockTable::new();

            for step in steps {
                match step {
                    Step::Lock { user, advance } => {
                        clock.advance(Duration::seconds(advance));
                        insert(&mut table, "detox", user, &clock);
                    }
                    Step::Unlock { user } => {
                        if let Some(op) = table.plan_delete(&LockKey::new("detox", Requester::new(user, 1))) {
                            table.apply(&op);
                        }
                    }
                }

                let queue = table.queue("detox");
                let mut seen = std::collections::HashSet::new();
                for record in queue {
                    prop_assert!(seen.insert(record.requester), "duplicate record for {}", record.requester);
                }
                for pair in queue.windows(2) {
                    prop_assert!(pair[0].timestamp <= pair[1].timestamp, "timestamps out of order");
                    prop_assert!(pair[0].sequence < pair[1].sequence, "sequence out of order");
                }
            }
        }
    }
}

#[test]
fn replayed_max_sequence_does_not_overflow() {
    let clock = FakeClock::new();
    let mut table = LockTable::new();
    let mut record = LockRecord::new("detox", &identity(1, 1), clock.now(), None);
    record.sequence = u64::MAX;

    assert!(table.apply(&Operation::LockInsert { record }));
    assert_eq!(table.next_sequence(), u64::MAX);
    assert_eq!(users(&table, "detox"), vec![1]);
}
