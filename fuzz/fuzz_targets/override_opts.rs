#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use metatrain::config::{apply_overrides, ConfigValue};
use metatrain::Error;

/// Fuzz target for command-line override resolution
///
/// Arbitrary token lists must either resolve or fail with InvalidArgument,
/// and the base config must never change.

#[derive(Arbitrary, Debug)]
struct OverrideInput {
    base_yaml: String,
    opts: Vec<String>,
}

fuzz_target!(|input: OverrideInput| {
    let base = match ConfigValue::from_yaml_str(&input.base_yaml) {
        Ok(cfg) => cfg,
        Err(_) => ConfigValue::map(),
    };
    let snapshot = base.clone();

    match apply_overrides(&base, &input.opts) {
        Ok(cfg) => {
            // Invariant 1: only even-length token lists resolve
            assert_eq!(input.opts.len() % 2, 0);

            // Invariant 2: every path of the last pair is reachable
            if let Some(pair) = input.opts.chunks_exact(2).last() {
                assert!(cfg.get_path(&pair[0]).is_some());
            }
        }
        Err(Error::InvalidArgument(_)) => {}
        Err(other) => panic!("unexpected error kind: {other:?}"),
    }

    // Invariant 3: the base is untouched
    if !contains_nan(&snapshot) {
        assert_eq!(base, snapshot);
    }
});

fn contains_nan(value: &ConfigValue) -> bool {
    match value {
        ConfigValue::Float(v) => v.is_nan(),
        ConfigValue::List(items) => items.iter().any(contains_nan),
        ConfigValue::Map(map) => map.values().any(contains_nan),
        _ => false,
    }
}
