//! Tests for InjectedValues: defaults, overrides and concurrent access

use std::sync::Arc;
use std::thread;

use rstest::rstest;

use injected::{injection_key, InjectedValues, InjectionKey};

injection_key! {
    Untouched: u32 = 42;
    Replaced: &'static str = "default";
    Updated: Vec<u32> = vec![1];
    Raced: usize = 0;
    Tracked: bool = false;
}

/// Service trait swapped out by tests.
trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        1_700_000_000
    }
}

struct FixedClock(u64);

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0
    }
}

struct CurrentClock;

impl InjectionKey for CurrentClock {
    type Value = Arc<dyn Clock>;

    fn default_value() -> Self::Value {
        Arc::new(SystemClock)
    }
}

#[test]
fn given_never_written_slot_when_read_then_returns_declared_default() {
    assert_eq!(InjectedValues::get::<Untouched>(), 42);
    assert!(!InjectedValues::is_overridden::<Untouched>());
}

#[test]
fn given_slot_when_replaced_twice_then_returns_default_then_previous() {
    assert_eq!(InjectedValues::replace::<Replaced>("first"), "default");
    assert_eq!(InjectedValues::replace::<Replaced>("second"), "first");
    assert_eq!(InjectedValues::get::<Replaced>(), "second");
}

#[test]
fn given_default_slot_when_updated_then_mutation_starts_from_default() {
    InjectedValues::update::<Updated>(|v| v.push(2));
    InjectedValues::update::<Updated>(|v| v.push(3));

    assert_eq!(InjectedValues::get::<Updated>(), vec![1, 2, 3]);
}

#[test]
fn given_service_slot_when_test_double_injected_then_consumers_use_double() {
    assert_eq!(InjectedValues::get::<CurrentClock>().now(), 1_700_000_000);

    InjectedValues::set::<CurrentClock>(Arc::new(FixedClock(7)));

    assert_eq!(InjectedValues::get::<CurrentClock>().now(), 7);
}

#[test]
fn given_many_writers_when_racing_then_final_value_is_one_written_value() {
    let handles: Vec<_> = (1..=8)
        .map(|n| {
            thread::spawn(move || {
                for _ in 0..100 {
                    InjectedValues::set::<Raced>(n);
                    let seen = InjectedValues::get::<Raced>();
                    assert!((1..=8).contains(&seen));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!((1..=8).contains(&InjectedValues::get::<Raced>()));
}

#[rstest]
#[case(false)]
#[case(true)]
fn given_isolated_registry_when_written_then_override_state_tracks_writes(#[case] write: bool) {
    let values = InjectedValues::new();

    if write {
        values.set_value::<Tracked>(true);
    }

    assert_eq!(values.contains_override::<Tracked>(), write);
    assert_eq!(values.value::<Tracked>(), write);
    assert_eq!(values.override_count(), usize::from(write));
}

#[test]
fn given_isolated_registry_when_updates_race_then_no_increment_is_lost() {
    let values = Arc::new(InjectedValues::new());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let values = Arc::clone(&values);
            thread::spawn(move || {
                for _ in 0..250 {
                    values.update_value::<Raced>(|v| *v += 1);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(values.value::<Raced>(), 1000);
}
