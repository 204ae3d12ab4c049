//! End-to-end tests for the config module: file, overrides, typed spec, optimizer

use super::*;
use crate::error::Error;
use crate::optim::Parameter;
use approx::assert_abs_diff_eq;
use std::io::Write;
use tempfile::NamedTempFile;

const PROTONET: &str = r#"
model:
  encoder: resnet12
  encoder_args:
    drop_rate: 0.1
  classifier: protonet
  metric: sqr

data:
  dataset: mini-imagenet
  root: ./materials/mini-imagenet
  n_way: 5
  n_shot: 1
  n_query: 15
  batch_size: 4

optimizer:
  name: sgd
  lr: 0.1
  weight_decay: 0.0005
  milestones: [60, 90]

training:
  max_epoch: 100
  save_epoch: 5
  save_dir: ./save/protonet_1shot
  seed: 42
"#;

fn write_config(yaml: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(yaml.as_bytes()).unwrap();
    temp_file
}

#[test]
fn test_end_to_end_config_loading() {
    let file = write_config(PROTONET);
    let spec = load_spec::<_, &str>(file.path(), &[]).unwrap();

    assert_eq!(spec.model.encoder, "resnet12");
    assert_eq!(
        spec.model.encoder_args.get("drop_rate"),
        Some(&ConfigValue::Float(0.1))
    );
    assert_eq!(spec.data.n_query, 15);
    assert_eq!(spec.data.num_workers, 8);
    assert_eq!(spec.optimizer.milestones, Some(vec![60, 90]));
    assert_eq!(spec.training.seed, Some(42));

    let setup = make_optimizer(&spec.optimizer, spec.training.max_steps).unwrap();
    assert!(setup.scheduler.is_some());
    assert!(setup.update_lr_every_epoch);
}

#[test]
fn test_overrides_switch_to_five_shot() {
    let file = write_config(PROTONET);
    let spec = load_spec(
        file.path(),
        &[
            "data.n_shot",
            "5",
            "training.save_dir",
            "./save/protonet_5shot",
        ],
    )
    .unwrap();

    assert_eq!(spec.data.n_shot, 5);
    assert_eq!(
        spec.training.save_dir,
        std::path::PathBuf::from("./save/protonet_5shot")
    );
    // Untouched siblings survive
    assert_eq!(spec.data.n_way, 5);
    assert_eq!(spec.data.dataset, "mini-imagenet");
}

#[test]
fn test_override_new_encoder_argument() {
    let file = write_config(PROTONET);
    let spec = load_spec(file.path(), &["model.encoder_args.avg_pool", "False"]).unwrap();

    assert_eq!(
        spec.model.encoder_args.get("avg_pool"),
        Some(&ConfigValue::Bool(false))
    );
    assert_eq!(
        spec.model.encoder_args.get("drop_rate"),
        Some(&ConfigValue::Float(0.1))
    );
}

#[test]
fn test_integer_override_for_float_field() {
    let file = write_config(PROTONET);
    let spec = load_spec(file.path(), &["optimizer.lr", "1"]).unwrap();
    assert_abs_diff_eq!(spec.optimizer.lr, 1.0);
}

#[test]
fn test_override_enables_sam() {
    let file = write_config(PROTONET);
    let spec = load_spec(
        file.path(),
        &["optimizer.use_sam", "TRUE", "optimizer.sam_rho", "0.05"],
    )
    .unwrap();
    assert!(spec.optimizer.use_sam);

    let mut setup = make_optimizer(&spec.optimizer, 0).unwrap();
    let mut params = vec![Parameter::from_vec("w", vec![1.0])];
    params[0].set_grad(ndarray::arr1(&[2.0])).unwrap();

    setup.optimizer.first_step(&mut params);
    assert_abs_diff_eq!(params[0].data()[0], 1.05, epsilon = 1e-6);
    setup.optimizer.step(&mut params);
    // Restored before the base step, so the update starts from 1.0
    assert!(params[0].data()[0] < 1.0);
}

#[test]
fn test_override_switches_to_onecycle() {
    let file = write_config(PROTONET);
    let spec = load_spec(
        file.path(),
        &[
            "optimizer.name",
            "adamw",
            "optimizer.scheduler",
            "onecycle",
            "training.max_steps",
            "900",
        ],
    )
    .unwrap();

    let setup = make_optimizer(&spec.optimizer, spec.training.max_steps).unwrap();
    assert!(!setup.update_lr_every_epoch);
    assert_abs_diff_eq!(setup.scheduler.unwrap().get_lr(), 0.1 / 25.0, epsilon = 1e-7);
}

#[test]
fn test_override_with_wrong_type_fails_typing() {
    let file = write_config(PROTONET);
    let result = load_spec(file.path(), &["data.batch_size", "four"]);
    match result {
        Err(Error::ConfigError(msg)) => assert!(msg.contains("schema"), "{msg}"),
        other => panic!("expected a schema error, got {other:?}"),
    }
}

#[test]
fn test_scalar_override_replaces_section() {
    let file = write_config(PROTONET);
    let resolved = resolve_config(file.path(), &["optimizer", "none"]).unwrap();
    assert_eq!(resolved.get_path("optimizer"), Some(&ConfigValue::from("none")));
    assert!(spec_from_value(&resolved).is_err());
}

#[test]
fn test_override_fails_validation() {
    let file = write_config(PROTONET);
    let result = load_spec(file.path(), &["model.metric", "euclidean"]);
    match result {
        Err(Error::ConfigError(msg)) => assert!(msg.contains("Invalid config"), "{msg}"),
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
fn test_odd_overrides_report_tokens() {
    let file = write_config(PROTONET);
    match resolve_config(file.path(), &["data.n_shot", "5", "optimizer.lr"]) {
        Err(Error::InvalidArgument(msg)) => {
            assert!(msg.contains("Paired input"));
            assert!(msg.contains("optimizer.lr"));
        }
        other => panic!("expected InvalidArgument, got {other:?}"),
    }
}

#[test]
fn test_resolved_config_survives_yaml_roundtrip() {
    let file = write_config(PROTONET);
    let resolved = resolve_config(file.path(), &["optimizer.lr", "0.05", "training.seed", "7"]).unwrap();

    let yaml = resolved.to_yaml_string().unwrap();
    let reloaded = ConfigValue::from_yaml_str(&yaml).unwrap();
    assert_eq!(reloaded, resolved);

    let spec = spec_from_value(&reloaded).unwrap();
    assert_eq!(spec.training.seed, Some(7));
}

#[test]
fn test_resolved_config_to_json() {
    let file = write_config(PROTONET);
    let resolved = resolve_config(file.path(), &["data.n_shot", "5"]).unwrap();

    let json: serde_json::Value = serde_json::from_str(&resolved.to_json_string().unwrap()).unwrap();
    assert_eq!(json["data"]["n_shot"], 5);
    assert_eq!(json["optimizer"]["milestones"][1], 90);
}

#[test]
fn test_base_config_not_modified_by_overrides() {
    let file = write_config(PROTONET);
    let base = load_config(file.path()).unwrap();
    let snapshot = base.clone();

    let _ = apply_overrides(&base, &["optimizer.lr", "0.5", "model", "x"]).unwrap();
    assert_eq!(base, snapshot);
}

#[test]
fn test_full_range_seed_override() {
    let file = write_config(PROTONET);
    let resolved = resolve_config(file.path(), &["training.seed", "18446744073709551615"]).unwrap();
    assert_eq!(
        resolved.get_path("training.seed"),
        Some(&ConfigValue::UInt(u64::MAX))
    );

    let reloaded = ConfigValue::from_yaml_str(&resolved.to_yaml_string().unwrap()).unwrap();
    let spec = spec_from_value(&reloaded).unwrap();
    assert_eq!(spec.training.seed, Some(u64::MAX));
}

#[test]
fn test_numeric_mapping_keys_load_and_override() {
    let yaml = format!("{PROTONET}\nlabel_map:\n  0: cat\n  1: dog\n");
    let file = write_config(&yaml);

    let resolved = resolve_config(file.path(), &["label_map.1", "wolf"]).unwrap();
    assert_eq!(resolved.get_path("label_map.0"), Some(&ConfigValue::from("cat")));
    assert_eq!(resolved.get_path("label_map.1"), Some(&ConfigValue::from("wolf")));
    assert!(spec_from_value(&resolved).is_ok());
}
