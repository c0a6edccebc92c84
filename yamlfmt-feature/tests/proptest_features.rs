//! Property-based tests for feature chains.
//!
//! - Copy safety: the caller's buffer is never mutated by hooks
//! - Ordering: each hook sees exactly the buffer the previous hook produced
//! - Error naming: a failing hook is reported with its feature and mode

use proptest::prelude::*;
use std::sync::{Arc, Mutex};
use yamlfmt_feature::{Feature, FeatureApplyMode, FeatureContext, FeatureList};

fn arb_mode() -> impl Strategy<Value = FeatureApplyMode> {
    prop_oneof![Just(FeatureApplyMode::Before), Just(FeatureApplyMode::After)]
}

fn destructive(name: &str) -> Feature {
    let wipe = |_ctx: &mut FeatureContext, mut buf: Vec<u8>| -> anyhow::Result<Vec<u8>> {
        for b in buf.iter_mut() {
            *b = b'#';
        }
        buf.reverse();
        Ok(buf)
    };
    Feature::new(name).with_before(wipe).with_after(wipe)
}

#[derive(Debug, thiserror::Error)]
#[error("hook failed: {0}")]
struct HookFailure(String);

proptest! {
    #[test]
    fn caller_buffer_is_never_mutated(
        input in prop::collection::vec(any::<u8>(), 0..64),
        mode in arb_mode(),
        count in 1usize..4,
    ) {
        let list: FeatureList = (0..count).map(|i| destructive(&format!("f{}", i))).collect();
        let original = input.clone();
        let mut ctx = FeatureContext::new();

        let _ = list.apply_features(&mut ctx, &input, mode).unwrap();
        prop_assert_eq!(input, original);
    }

    #[test]
    fn second_hook_sees_first_hook_output(
        input in prop::string::string_regex("[a-z: \n]{0,40}").unwrap(),
        mode in arb_mode(),
    ) {
        let observed = Arc::new(Mutex::new(Vec::new()));
        let sink = observed.clone();
        let upper = |_ctx: &mut FeatureContext, buf: Vec<u8>| -> anyhow::Result<Vec<u8>> {
            Ok(buf.to_ascii_uppercase())
        };
        let record = move |_ctx: &mut FeatureContext, buf: Vec<u8>| -> anyhow::Result<Vec<u8>> {
            *sink.lock().unwrap() = buf.clone();
            Ok(buf)
        };
        let list: FeatureList = vec![
            Feature::new("A").with_before(upper).with_after(upper),
            Feature::new("B").with_before(record.clone()).with_after(record),
        ]
        .into();

        let mut ctx = FeatureContext::new();
        let out = list.apply_features(&mut ctx, input.as_bytes(), mode).unwrap();

        let expected = input.as_bytes().to_ascii_uppercase();
        prop_assert_eq!(observed.lock().unwrap().clone(), expected.clone());
        prop_assert_eq!(out, expected);
    }

    #[test]
    fn failing_hook_is_named(name in "[a-z]{1,12}", mode in arb_mode()) {
        let fail_name = name.clone();
        let fail = move |_ctx: &mut FeatureContext, _buf: Vec<u8>| -> anyhow::Result<Vec<u8>> {
            Err(HookFailure(fail_name.clone()).into())
        };
        let list: FeatureList = vec![
            Feature::new(name.clone()).with_before(fail.clone()).with_after(fail),
        ]
        .into();

        let mut ctx = FeatureContext::new();
        let err = list.apply_features(&mut ctx, b"k: v\n", mode).unwrap_err();
        let prefix = format!("Feature {} {}Action failed", name, mode);
        prop_assert!(err.to_string().starts_with(&prefix));
        let cause = err.cause().downcast_ref::<HookFailure>();
        prop_assert!(cause.is_some());
        prop_assert_eq!(&cause.unwrap().0, &name);
    }
}
