//! Config overrides through the public API: file on disk, CLI parsing, typed spec

use metatrain::config::{
    apply_overrides, load_config, load_spec, parse_args, resolve_config, Command, ConfigValue,
};
use metatrain::Error;
use std::fs;
use tempfile::TempDir;

const CONFIG: &str = r#"
model:
  encoder: conv4
  metric: cos
  temperature: 10.0

data:
  dataset: omniglot
  n_way: 20
  n_shot: 1
  batch_size: 8

optimizer:
  name: adam
  lr: 0.001
  scheduler: step
"#;

fn config_dir() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("omniglot.yaml");
    fs::write(&path, CONFIG).unwrap();
    (dir, path)
}

#[test]
fn cli_opts_feed_apply_overrides() {
    let (_dir, path) = config_dir();
    let path_str = path.to_str().unwrap();

    let cli = parse_args([
        "metatrain",
        "show",
        path_str,
        "data.n_way",
        "5",
        "model.temperature",
        "-1.5",
        "model.normalize",
        "True",
        "data.split",
        "train_phase",
    ])
    .unwrap();
    let Command::Show(args) = cli.command else {
        panic!("expected show");
    };

    let cfg = resolve_config(&args.config, &args.opts).unwrap();
    assert_eq!(cfg.get_path("data.n_way"), Some(&ConfigValue::Int(5)));
    assert_eq!(cfg.get_path("model.temperature"), Some(&ConfigValue::Float(-1.5)));
    assert_eq!(cfg.get_path("model.normalize"), Some(&ConfigValue::Bool(true)));
    assert_eq!(cfg.get_path("data.split"), Some(&ConfigValue::from("train_phase")));
    assert_eq!(cfg.get_path("model.metric"), Some(&ConfigValue::from("cos")));
}

#[test]
fn typed_spec_sees_overrides() {
    let (_dir, path) = config_dir();
    let spec = load_spec(&path, &["data.n_shot", "5", "optimizer.name", "SGD"]).unwrap();

    assert_eq!(spec.data.n_way, 20);
    assert_eq!(spec.data.n_shot, 5);
    assert_eq!(spec.optimizer.name, "SGD");
    assert_eq!(spec.model.temperature, 10.0);
}

#[test]
fn odd_opts_are_rejected_before_loading_anything_else() {
    let (_dir, path) = config_dir();
    let err = resolve_config(&path, &["data.n_way"]).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert!(err.to_string().contains("data.n_way"));
}

#[test]
fn empty_path_segment_is_rejected() {
    let (_dir, path) = config_dir();
    let base = load_config(&path).unwrap();
    for bad in ["", "data..n_way", ".data", "data."] {
        let result = apply_overrides(&base, &[bad, "1"]);
        assert!(matches!(result, Err(Error::InvalidArgument(_))), "{bad:?}");
    }
}

#[test]
fn repeated_overrides_apply_left_to_right() {
    let (_dir, path) = config_dir();
    let base = load_config(&path).unwrap();
    let cfg = apply_overrides(
        &base,
        &["optimizer", "frozen", "optimizer.lr", "0.5", "optimizer.lr", "7"],
    )
    .unwrap();

    // The scalar replaced the whole section, then the later pairs rebuilt it
    let optimizer = cfg.get_path("optimizer").unwrap().as_map().unwrap();
    assert_eq!(optimizer.len(), 1);
    assert_eq!(optimizer.get("lr"), Some(&ConfigValue::Int(7)));
}

#[test]
fn missing_config_file() {
    let dir = TempDir::new().unwrap();
    let result = load_spec::<_, &str>(dir.path().join("absent.yaml"), &[]);
    assert!(matches!(result, Err(Error::ConfigError(_))));
}
