//! Integration Tests for Memoization
//!
//! Exercises the public API end to end: cache scenarios, key derivation and
//! memoized calls with repeating, mutated and keyword arguments.

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use memo_cache::{
    memoize, BoundedCache, CallArgs, FnId, KeyDeriver, MemoError, Memoizer, SharedMemoizer,
    ToCallArgs,
};
use serde::Serialize;

// == Helper Functions ==

fn present<V>(cache: &BoundedCache<&'static str, V>) -> HashSet<&'static str> {
    cache.keys().copied().collect()
}

/// Counter shared between a test and the function it memoizes
fn counter() -> (Rc<Cell<u32>>, Rc<Cell<u32>>) {
    let calls = Rc::new(Cell::new(0));
    (calls.clone(), calls)
}

mod func_set1 {
    pub fn func_for_test(&(a,): &(&'static str,)) -> String {
        a.to_uppercase()
    }
}

mod func_set2 {
    pub fn func_for_test(&(a,): &(&'static str,)) -> String {
        a.to_lowercase()
    }
}

// == Cache Scenarios ==

#[test]
fn test_scenario_a_third_insert_evicts_first() {
    let mut cache = BoundedCache::new(2).unwrap();

    cache.put("A", 1);
    cache.put("B", 2);
    cache.put("C", 3);

    assert_eq!(present(&cache), HashSet::from(["B", "C"]));
}

#[test]
fn test_scenario_b_update_keeps_eviction_position() {
    let mut cache = BoundedCache::new(2).unwrap();

    cache.put("A", 1);
    cache.put("B", 2);
    cache.put("A", 100);
    assert_eq!(cache.len(), 2);

    cache.put("C", 3);

    assert_eq!(present(&cache), HashSet::from(["B", "C"]));
    assert!(matches!(cache.get(&"A"), Err(MemoError::KeyNotFound(_))));
}

#[test]
fn test_scenario_c_miss_leaves_state_unchanged() {
    let mut cache = BoundedCache::new(3).unwrap();
    cache.put("A", 1);
    cache.put("B", 2);

    let stats_before = cache.stats();
    let err = cache.get(&"Z").unwrap_err();

    assert!(err.is_miss());
    assert_eq!(cache.stats(), stats_before);
    assert_eq!(cache.keys().copied().collect::<Vec<_>>(), vec!["A", "B"]);
}

#[test]
fn test_scenario_d_non_positive_capacity_rejected() {
    for capacity in [0, -1, i64::MIN] {
        let result: Result<BoundedCache<u8, u8>, _> = BoundedCache::new(capacity);
        assert_eq!(result.unwrap_err(), MemoError::InvalidCapacity(capacity));
    }
}

// == Key Derivation ==

#[test]
fn test_keys_follow_argument_values() {
    fn f(_: &(i32, i32)) {}
    let id = FnId::of_val(&f);

    let derive = |a: i32, b: i32| KeyDeriver::derive(&id, &(a, b).to_call_args()).unwrap();

    assert_eq!(derive(1, 2), derive(1, 2));
    assert_ne!(derive(1, 2), derive(2, 1));
}

#[test]
fn test_keys_for_values_outside_json_numbers() {
    let id = FnId::named("f");
    let derive = |args: CallArgs| KeyDeriver::derive(&id, &args);

    assert!(derive(CallArgs::new().arg(&u128::MAX)).is_ok());
    assert!(derive(CallArgs::new().arg(&i128::MIN)).is_ok());
    assert_ne!(
        derive(CallArgs::new().arg(&f64::INFINITY)).unwrap(),
        derive(CallArgs::new().arg(&f64::NEG_INFINITY)).unwrap()
    );
    assert_ne!(
        derive(CallArgs::new().arg(&f64::NAN)).unwrap(),
        derive(CallArgs::new().arg(&Option::<f64>::None)).unwrap()
    );
}

#[test]
fn test_same_function_name_in_different_modules() {
    let mut first = memoize(func_set1::func_for_test, 2).unwrap();
    let mut second = memoize(func_set2::func_for_test, 2).unwrap();

    assert_ne!(first.id(), second.id());
    assert_eq!(first.call(("abc",)).unwrap(), "ABC");
    assert_eq!(second.call(("CBA",)).unwrap(), "cba");
}

// == Memoized Calls ==

#[test]
fn test_multiple_arguments_with_keyword() {
    struct Args {
        arg1: i32,
        arg2: i32,
        arg3: i32,
    }

    impl ToCallArgs for Args {
        fn to_call_args(&self) -> CallArgs {
            CallArgs::new()
                .arg(&self.arg1)
                .kwarg("arg2", &self.arg2)
                .kwarg("arg3", &self.arg3)
        }
    }

    let args = |arg1, arg2| Args { arg1, arg2, arg3: 5 };
    let mut sum = memoize(|a: &Args| a.arg1 + a.arg2 + a.arg3, 2).unwrap();

    assert_eq!(sum.call(args(1, 2)).unwrap(), 8);
    assert_eq!(sum.call(args(2, 3)).unwrap(), 10);
    assert_eq!(sum.len(), 2);

    // New key while full: (1, 2) is evicted, (2, 3) becomes oldest
    assert_eq!(sum.call(args(2, 6)).unwrap(), 13);
    assert_eq!(sum.len(), 2);
    assert_eq!(sum.stats().evictions, 1);

    // Still resident
    assert_eq!(sum.call(args(2, 6)).unwrap(), 13);
    assert_eq!(sum.call(args(2, 3)).unwrap(), 10);
    assert_eq!(sum.stats().hits, 2);
    assert_eq!(sum.stats().evictions, 1);
}

#[test]
fn test_mutated_argument_gets_new_key() {
    let (calls, seen) = counter();
    let mut total = memoize(
        move |(values,): &(Vec<i32>,)| {
            calls.set(calls.get() + 1);
            values.iter().sum::<i32>()
        },
        2,
    )
    .unwrap();

    let mut arg = vec![1, 2, 3];
    assert_eq!(total.call((arg.clone(),)).unwrap(), 6);
    assert_eq!(seen.get(), 1);

    let old_arg = arg.clone();
    arg[0] = 9;
    assert_eq!(total.call((arg.clone(),)).unwrap(), 14);
    assert_eq!(seen.get(), 2);
    assert_eq!(total.len(), 2);

    assert_eq!(total.call((old_arg,)).unwrap(), 6);
    assert_eq!(total.call((arg,)).unwrap(), 14);
    assert_eq!(seen.get(), 2);
}

#[test]
fn test_custom_struct_arguments() {
    #[derive(Clone, Serialize)]
    struct Holder {
        data: i32,
    }

    let (calls, seen) = counter();
    let mut extract = memoize(
        move |(holder,): &(Holder,)| {
            calls.set(calls.get() + 1);
            holder.data
        },
        2,
    )
    .unwrap();

    let one = Holder { data: 1 };
    let mut nine = one.clone();
    nine.data = 9;

    assert_eq!(extract.call((one.clone(),)).unwrap(), 1);
    assert_eq!(extract.call((nine.clone(),)).unwrap(), 9);
    assert_eq!(seen.get(), 2);

    assert_eq!(extract.call((one,)).unwrap(), 1);
    assert_eq!(extract.call((nine,)).unwrap(), 9);
    assert_eq!(seen.get(), 2);
}

#[test]
fn test_non_finite_float_arguments_compute_separately() {
    let (calls, seen) = counter();
    let mut negate = memoize(
        move |&(x,): &(f64,)| {
            seen.set(seen.get() + 1);
            -x
        },
        4,
    )
    .unwrap();

    assert_eq!(negate.call((f64::INFINITY,)).unwrap(), f64::NEG_INFINITY);
    assert_eq!(negate.call((f64::NEG_INFINITY,)).unwrap(), f64::INFINITY);
    assert!(negate.call((f64::NAN,)).unwrap().is_nan());
    assert_eq!(calls.get(), 3);

    assert_eq!(negate.call((f64::INFINITY,)).unwrap(), f64::NEG_INFINITY);
    assert_eq!(calls.get(), 3);

    let stats = negate.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 3);
    assert_eq!(stats.hit_rate(), 0.25);
}

#[test]
fn test_instances_are_isolated() {
    let mut a = memoize(|&(x,): &(i32,)| x, 1).unwrap();
    let mut b = memoize(|&(x,): &(i32,)| x * 2, 1).unwrap();

    a.call((1,)).unwrap();
    b.call((1,)).unwrap();
    a.reset();

    assert!(a.is_empty());
    assert_eq!(b.len(), 1);
}

#[test]
fn test_explicit_identity_for_boxed_functions() {
    let boxed: Box<dyn FnMut(&(u8,)) -> u8> = Box::new(|&(x,)| x + 1);

    let mut memo = Memoizer::with_id(FnId::named("increment"), boxed, 3).unwrap();

    assert_eq!(memo.call((1,)).unwrap(), 2);
    assert_eq!(memo.call((1,)).unwrap(), 2);
    assert_eq!(memo.stats().hits, 1);
}

#[test]
fn test_shared_memoizer_across_threads() {
    let shared = SharedMemoizer::new(|&(n,): &(u64,)| (1..=n).product::<u64>(), 4).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            std::thread::spawn(move || {
                (1..=6u64)
                    .map(|n| shared.call((n,)).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        let results = handle.join().expect("worker should not panic");
        assert_eq!(results, vec![1, 2, 6, 24, 120, 720]);
    }

    let stats = shared.stats();
    assert!(stats.total_entries <= 4);
    assert_eq!(stats.hits + stats.misses, 24);
}
