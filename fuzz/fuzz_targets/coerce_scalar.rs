#![no_main]

use libfuzzer_sys::fuzz_target;
use metatrain::config::{coerce_scalar, ConfigValue};

// Coercion never panics and only falls back to a string when nothing parses
fuzz_target!(|raw: &str| {
    let number = raw.trim().replace('_', "");
    match coerce_scalar(raw) {
        ConfigValue::Int(v) => assert_eq!(number.parse::<i64>().ok(), Some(v)),
        ConfigValue::UInt(v) => {
            assert!(v > i64::MAX as u64);
            assert_eq!(number.parse::<u64>().ok(), Some(v));
        }
        ConfigValue::Bool(v) => assert_eq!(raw.to_lowercase(), v.to_string()),
        ConfigValue::Float(_) => assert!(number.parse::<f64>().is_ok()),
        ConfigValue::Str(s) => {
            assert_eq!(s, raw);
            assert!(raw.trim().parse::<f64>().is_err());
        }
        other => panic!("scalar coercion produced {other:?}"),
    }
});
