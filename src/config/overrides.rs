//! Dotted-path configuration overrides
//!
//! Overrides arrive as a flat list of `path value` tokens, e.g.
//! `["optimizer.lr", "0.001", "training.max_epoch", "50"]`. Each pair is coerced,
//! expanded into a single-branch tree and merged into the accumulated config.
//!
//! # Example
//!
//! ```
//! use metatrain::config::{apply_overrides, ConfigValue};
//!
//! let base = ConfigValue::from_yaml_str("optimizer:\n  name: sgd\n  lr: 0.1\n").unwrap();
//! let cfg = apply_overrides(&base, &["optimizer.lr", "0.001"]).unwrap();
//!
//! assert_eq!(cfg.get_path("optimizer.lr"), Some(&ConfigValue::Float(0.001)));
//! assert_eq!(cfg.get_path("optimizer.name"), Some(&ConfigValue::from("sgd")));
//! ```

use super::value::{ConfigMap, ConfigValue};
use crate::error::{Error, Result};

/// Coerce a raw token into the most specific scalar it represents
///
/// Tried in order: integer (`i64`, then `u64`), boolean (`true`/`false`, any
/// case), float. Numbers may use `_` between digits (`1_000`). Anything else
/// stays a string.
pub fn coerce_scalar(raw: &str) -> ConfigValue {
    let trimmed = raw.trim();
    let digits = strip_digit_separators(trimmed);
    let number = digits.as_deref().unwrap_or(trimmed);

    if let Ok(v) = number.parse::<i64>() {
        return ConfigValue::Int(v);
    }
    if let Ok(v) = number.parse::<u64>() {
        return ConfigValue::UInt(v);
    }

    match raw.to_lowercase().as_str() {
        "true" => return ConfigValue::Bool(true),
        "false" => return ConfigValue::Bool(false),
        _ => {}
    }

    if let Ok(v) = number.parse::<f64>() {
        return ConfigValue::Float(v);
    }

    ConfigValue::Str(raw.to_string())
}

/// Drop `_` separators; `None` unless every `_` sits between two digits
fn strip_digit_separators(token: &str) -> Option<String> {
    if !token.contains('_') {
        return None;
    }

    let bytes = token.as_bytes();
    let mut out = String::with_capacity(token.len());
    for (i, c) in token.char_indices() {
        if c != '_' {
            out.push(c);
            continue;
        }
        let before = i > 0 && bytes[i - 1].is_ascii_digit();
        let after = bytes.get(i + 1).is_some_and(u8::is_ascii_digit);
        if !(before && after) {
            return None;
        }
    }
    Some(out)
}

/// Coerce string leaves; every other value passes through unchanged
pub fn coerce_value(value: ConfigValue) -> ConfigValue {
    match value {
        ConfigValue::Str(raw) => coerce_scalar(&raw),
        other => other,
    }
}

/// Expand `a.b.c` and a value into `{a: {b: {c: value}}}`
///
/// Empty paths and empty segments (`.a`, `a.`, `a..b`) are rejected.
pub fn expand_path(path: &str, value: ConfigValue) -> Result<ConfigValue> {
    let keys: Vec<&str> = path.split('.').collect();
    if keys.iter().any(|key| key.is_empty()) {
        return Err(Error::InvalidArgument(format!(
            "Override path '{path}' contains an empty key segment"
        )));
    }

    Ok(keys.iter().rev().fold(value, |inner, key| {
        let mut map = ConfigMap::new();
        map.insert((*key).to_string(), inner);
        ConfigValue::Map(map)
    }))
}

/// Right-biased recursive merge
///
/// Mappings present on both sides merge key-wise; on any other conflict the
/// override wins. Neither input is modified.
pub fn merge(base: &ConfigValue, overlay: &ConfigValue) -> ConfigValue {
    match (base, overlay) {
        (ConfigValue::Map(base_map), ConfigValue::Map(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in overlay_map {
                let next = match base_map.get(key) {
                    Some(existing) => merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            ConfigValue::Map(merged)
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Apply `path value` override pairs to a base configuration
///
/// Fails with [`Error::InvalidArgument`] on an odd number of tokens or a
/// malformed path; all pairs are checked before anything is merged.
pub fn apply_overrides<S: AsRef<str>>(base: &ConfigValue, opts: &[S]) -> Result<ConfigValue> {
    if opts.len() % 2 != 0 {
        let tokens: Vec<&str> = opts.iter().map(AsRef::as_ref).collect();
        return Err(Error::InvalidArgument(format!(
            "Paired input must be provided to override config, opts: {tokens:?}"
        )));
    }

    let patches = opts
        .chunks_exact(2)
        .map(|pair| expand_path(pair[0].as_ref(), coerce_scalar(pair[1].as_ref())))
        .collect::<Result<Vec<_>>>()?;

    Ok(patches
        .iter()
        .fold(base.clone(), |cfg, patch| merge(&cfg, patch)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> ConfigValue {
        ConfigValue::from_yaml_str(s).unwrap()
    }

    #[test]
    fn test_coerce_int() {
        assert_eq!(coerce_scalar("5"), ConfigValue::Int(5));
        assert_eq!(coerce_scalar("-12"), ConfigValue::Int(-12));
        assert_eq!(coerce_scalar("+7"), ConfigValue::Int(7));
        assert_eq!(coerce_scalar(" 3 "), ConfigValue::Int(3));
    }

    #[test]
    fn test_coerce_int_beyond_i64() {
        assert_eq!(
            coerce_scalar("9223372036854775807"),
            ConfigValue::Int(i64::MAX)
        );
        assert_eq!(
            coerce_scalar("18446744073709551615"),
            ConfigValue::UInt(u64::MAX)
        );
        // Past u64 precision is lost to a float
        assert!(matches!(
            coerce_scalar("18446744073709551616"),
            ConfigValue::Float(_)
        ));
    }

    #[test]
    fn test_coerce_digit_separators() {
        assert_eq!(coerce_scalar("1_000"), ConfigValue::Int(1000));
        assert_eq!(coerce_scalar("-2_500_000"), ConfigValue::Int(-2_500_000));
        assert_eq!(coerce_scalar("1_0.2_5"), ConfigValue::Float(10.25));
        assert_eq!(coerce_scalar("1e1_0"), ConfigValue::Float(1e10));

        for raw in ["_1", "1_", "1__0", "1_.5", "a_1", "_"] {
            assert_eq!(coerce_scalar(raw), ConfigValue::from(raw), "{raw}");
        }
    }

    #[test]
    fn test_coerce_bool_case_insensitive() {
        assert_eq!(coerce_scalar("true"), ConfigValue::Bool(true));
        assert_eq!(coerce_scalar("True"), ConfigValue::Bool(true));
        assert_eq!(coerce_scalar("FALSE"), ConfigValue::Bool(false));
    }

    #[test]
    fn test_coerce_float() {
        assert_eq!(coerce_scalar("5.5"), ConfigValue::Float(5.5));
        assert_eq!(coerce_scalar("1e-4"), ConfigValue::Float(1e-4));
        assert_eq!(coerce_scalar("-0.25"), ConfigValue::Float(-0.25));
        assert!(matches!(coerce_scalar("inf"), ConfigValue::Float(v) if v.is_infinite()));
    }

    #[test]
    fn test_coerce_falls_back_to_string() {
        assert_eq!(coerce_scalar("abc"), ConfigValue::from("abc"));
        assert_eq!(coerce_scalar("resnet12"), ConfigValue::from("resnet12"));
        assert_eq!(coerce_scalar(""), ConfigValue::from(""));
        // bool matching does not trim
        assert_eq!(coerce_scalar(" true"), ConfigValue::from(" true"));
    }

    #[test]
    fn test_coerce_value_passes_non_strings_through() {
        assert_eq!(coerce_value(ConfigValue::Int(3)), ConfigValue::Int(3));
        assert_eq!(coerce_value(ConfigValue::Null), ConfigValue::Null);
        assert_eq!(coerce_value(ConfigValue::from("2")), ConfigValue::Int(2));
    }

    #[test]
    fn test_expand_path() {
        let v = expand_path("a.b", ConfigValue::Int(3)).unwrap();
        assert_eq!(v, yaml("a:\n  b: 3\n"));

        let single = expand_path("lr", ConfigValue::Float(0.1)).unwrap();
        assert_eq!(single, ConfigValue::map().with("lr", 0.1));
    }

    #[test]
    fn test_expand_path_rejects_empty_segments() {
        for path in ["", ".a", "a.", "a..b", "."] {
            let result = expand_path(path, ConfigValue::Int(1));
            assert!(
                matches!(result, Err(Error::InvalidArgument(_))),
                "path {path:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_merge_preserves_siblings() {
        let base = yaml("a: {x: 1, y: 2}");
        let over = yaml("a: {y: 9}");
        assert_eq!(merge(&base, &over), yaml("a: {x: 1, y: 9}"));
    }

    #[test]
    fn test_merge_union_of_keys() {
        let base = yaml("a: 1\nshared: {p: 1}");
        let over = yaml("b: 2\nshared: {q: 2}");
        assert_eq!(merge(&base, &over), yaml("a: 1\nb: 2\nshared: {p: 1, q: 2}"));
    }

    #[test]
    fn test_merge_scalar_replaces_map_and_back() {
        let base = yaml("a: {b: 1}");
        assert_eq!(merge(&base, &yaml("a: 5")), yaml("a: 5"));

        let base = yaml("a: 5");
        assert_eq!(merge(&base, &yaml("a: {b: 1}")), yaml("a: {b: 1}"));
    }

    #[test]
    fn test_merge_lists_are_leaves() {
        let base = yaml("milestones: [10, 20, 30]");
        let over = yaml("milestones: [5]");
        assert_eq!(merge(&base, &over), over);
    }

    #[test]
    fn test_merge_does_not_mutate_inputs() {
        let base = yaml("a: {x: 1}");
        let over = yaml("a: {y: 2}");
        let (base_snapshot, over_snapshot) = (base.clone(), over.clone());
        let _ = merge(&base, &over);
        assert_eq!(base, base_snapshot);
        assert_eq!(over, over_snapshot);
    }

    #[test]
    fn test_apply_overrides_empty_is_identity() {
        let base = yaml("model: {encoder: resnet12}\ntrain: {max_epoch: 100}");
        let empty: [&str; 0] = [];
        assert_eq!(apply_overrides(&base, &empty).unwrap(), base);
    }

    #[test]
    fn test_apply_overrides_later_wins() {
        let base = ConfigValue::map();
        let cfg = apply_overrides(&base, &["a", "1", "a", "2"]).unwrap();
        assert_eq!(cfg, ConfigValue::map().with("a", 2));
    }

    #[test]
    fn test_apply_overrides_scalar_replaces_subtree() {
        let base = yaml("a: {b: 1}");
        let cfg = apply_overrides(&base, &["a", "5"]).unwrap();
        assert_eq!(cfg, yaml("a: 5"));
    }

    #[test]
    fn test_apply_overrides_odd_length() {
        let base = yaml("a: {b: 1}");
        let snapshot = base.clone();

        let err = apply_overrides(&base, &["a.b"]).unwrap_err();
        match err {
            Error::InvalidArgument(msg) => assert!(msg.contains("a.b"), "{msg}"),
            other => panic!("Expected InvalidArgument, got {other:?}"),
        }
        assert_eq!(base, snapshot);
    }

    #[test]
    fn test_apply_overrides_bad_path_is_all_or_nothing() {
        let base = yaml("a: 1");
        let result = apply_overrides(&base, &["b", "2", "c..d", "3"]);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_apply_overrides_realistic() {
        let base = yaml(
            r#"
model:
  encoder: resnet12
  encoder_args: {drop_rate: 0.1}
optimizer:
  name: sgd
  lr: 0.1
  milestones: [90]
train:
  max_epoch: 100
"#,
        );
        let opts = vec![
            "optimizer.lr".to_string(),
            "0.001".to_string(),
            "train.max_epoch".to_string(),
            "50".to_string(),
            "model.encoder_args.use_bn".to_string(),
            "True".to_string(),
            "optimizer.name".to_string(),
            "adamw".to_string(),
        ];
        let cfg = apply_overrides(&base, &opts).unwrap();

        assert_eq!(cfg.get_path("optimizer.lr"), Some(&ConfigValue::Float(0.001)));
        assert_eq!(cfg.get_path("optimizer.name"), Some(&ConfigValue::from("adamw")));
        assert_eq!(cfg.get_path("train.max_epoch"), Some(&ConfigValue::Int(50)));
        assert_eq!(
            cfg.get_path("model.encoder_args.use_bn"),
            Some(&ConfigValue::Bool(true))
        );
        assert_eq!(
            cfg.get_path("model.encoder_args.drop_rate"),
            Some(&ConfigValue::Float(0.1))
        );
        assert_eq!(
            cfg.get_path("optimizer.milestones"),
            Some(&ConfigValue::List(vec![90.into()]))
        );
    }
}
