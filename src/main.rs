//! Metatrain CLI
//!
//! Resolves few-shot training configs with command-line overrides.
//!
//! # Usage
//!
//! ```bash
//! # Print the merged config
//! metatrain show configs/protonet.yaml optimizer.lr 0.01 data.n_shot 5
//!
//! # Validate against the training schema
//! metatrain validate configs/protonet.yaml --detailed
//!
//! # Inspect the learning rate schedule
//! metatrain schedule configs/protonet.yaml --epochs 20
//!
//! # Create the run directory and write config.yaml
//! metatrain prepare configs/protonet.yaml --save-dir ./save/_debug
//! ```

use clap::Parser;
use metatrain::config::{
    expand_path, make_optimizer, merge, resolve_config, spec_from_value, Cli, Command,
    ConfigValue, OutputFormat, PrepareArgs, ScheduleArgs, ShowArgs, ValidateArgs,
};
use metatrain::dist::{set_visible_devices, DistContext};
use metatrain::io::{ensure_path, read_confirmation, PathAction};
use metatrain::train::{time_str, FileMode, LogSink, Logger, Timer};
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Configure output based on verbose/quiet flags
    let log_level = if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Verbose
    } else {
        LogLevel::Normal
    };

    let result = match cli.command {
        Command::Show(args) => run_show(args, log_level),
        Command::Validate(args) => run_validate(args, log_level),
        Command::Schedule(args) => run_schedule(args, log_level),
        Command::Prepare(args) => run_prepare(args, log_level),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum LogLevel {
    Quiet,
    Normal,
    Verbose,
}

fn log(level: LogLevel, required: LogLevel, msg: &str) {
    if level != LogLevel::Quiet && (level == required || required == LogLevel::Normal) {
        println!("{msg}");
    }
}

fn resolve(config: &Path, opts: &[String], level: LogLevel) -> Result<ConfigValue, String> {
    log(
        level,
        LogLevel::Verbose,
        &format!(
            "Loading {} with {} override(s)",
            config.display(),
            opts.len() / 2
        ),
    );
    resolve_config(config, opts).map_err(|e| format!("Config error: {e}"))
}

fn run_show(args: ShowArgs, level: LogLevel) -> Result<(), String> {
    let config = resolve(&args.config, &args.opts, level)?;

    let rendered = match args.format {
        OutputFormat::Yaml => config
            .to_yaml_string()
            .map_err(|e| format!("YAML serialization error: {e}"))?,
        OutputFormat::Json => config
            .to_json_string()
            .map_err(|e| format!("JSON serialization error: {e}"))?,
    };

    // The merged config is the command's output, so it prints even when quiet
    println!("{}", rendered.trim_end());
    Ok(())
}

fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Validating config: {}", args.config.display()),
    );

    let config = resolve(&args.config, &args.opts, level)?;
    let spec = spec_from_value(&config).map_err(|e| format!("Validation failed: {e}"))?;

    log(level, LogLevel::Normal, "Configuration is valid");

    if args.detailed {
        println!();
        println!("Configuration Summary:");
        println!("  Encoder: {}", spec.model.encoder);
        println!("  Classifier: {}", spec.model.classifier);
        println!(
            "  Metric: {} (temperature {})",
            spec.model.metric, spec.model.temperature
        );
        println!();
        println!("  Dataset: {}", spec.data.dataset);
        if let Some(root) = &spec.data.root {
            println!("  Root: {}", root.display());
        }
        println!(
            "  Episode: {}-way {}-shot, {} queries",
            spec.data.n_way, spec.data.n_shot, spec.data.n_query
        );
        println!("  Batch size: {}", spec.data.batch_size);
        println!();
        println!("  Optimizer: {}", spec.optimizer.name);
        println!("  Learning rate: {}", spec.optimizer.lr);
        if let Some(wd) = spec.optimizer.weight_decay {
            println!("  Weight decay: {wd}");
        }
        println!("  Scheduler: {}", spec.optimizer.scheduler);
        if let Some(milestones) = &spec.optimizer.milestones {
            println!("  Milestones: {milestones:?}");
        }
        if spec.optimizer.use_sam {
            println!("  SAM rho: {}", spec.optimizer.sam_rho);
        }
        println!();
        println!("  Epochs: {}", spec.training.max_epoch);
        println!("  Save every: {}", spec.training.save_epoch);
        println!("  Save dir: {}", spec.training.save_dir.display());
        if let Some(seed) = spec.training.seed {
            println!("  Seed: {seed}");
        }
    }

    Ok(())
}

fn run_schedule(args: ScheduleArgs, level: LogLevel) -> Result<(), String> {
    let config = resolve(&args.config, &args.opts, level)?;
    let spec = spec_from_value(&config).map_err(|e| format!("Validation failed: {e}"))?;

    let mut setup = make_optimizer(&spec.optimizer, spec.training.max_steps)
        .map_err(|e| format!("Optimizer error: {e}"))?;
    log(level, LogLevel::Verbose, &format!("{setup:?}"));

    let rows = args.epochs.unwrap_or(spec.training.max_epoch);
    let unit = if setup.update_lr_every_epoch {
        "epoch"
    } else {
        log(
            level,
            LogLevel::Normal,
            &format!(
                "Scheduler '{}' steps once per batch; showing the first {rows} steps",
                spec.optimizer.scheduler
            ),
        );
        "step"
    };

    for i in 1..=rows {
        let lr = match setup.scheduler.as_mut() {
            Some(scheduler) => {
                let lr = scheduler.get_lr();
                scheduler.step();
                lr
            }
            None => setup.optimizer.lr(),
        };
        println!("{unit} {i}: lr {lr:.6e}");
    }

    Ok(())
}

fn run_prepare(args: PrepareArgs, level: LogLevel) -> Result<(), String> {
    let timer = Timer::new();

    let dist = DistContext::from_env().map_err(|e| format!("Distributed setup error: {e}"))?;
    if !dist.is_main_process() {
        log(
            level,
            LogLevel::Verbose,
            &format!("Rank {} is not the main process; nothing to do", dist.get_rank()),
        );
        return Ok(());
    }

    if let Some(gpus) = &args.gpu {
        set_visible_devices(gpus);
        log(level, LogLevel::Normal, &format!("set gpu: {gpus}"));
    }

    let mut config = resolve(&args.config, &args.opts, level)?;
    if let Some(save_dir) = &args.save_dir {
        let value = ConfigValue::from(save_dir.to_string_lossy().into_owned());
        let patch =
            expand_path("training.save_dir", value).map_err(|e| format!("Config error: {e}"))?;
        config = merge(&config, &patch);
    }
    let spec = spec_from_value(&config).map_err(|e| format!("Validation failed: {e}"))?;
    let save_dir = spec.training.save_dir.clone();

    let force = args.force;
    let action = ensure_path(&save_dir, true, |path| force || confirm_removal(path))
        .map_err(|e| format!("Failed to prepare {}: {e}", save_dir.display()))?;
    let verb = match action {
        PathAction::Created => "Created",
        PathAction::Recreated => "Recreated",
        PathAction::Kept => "Reusing",
    };
    log(
        level,
        LogLevel::Normal,
        &format!("{verb} run directory {}", save_dir.display()),
    );

    let yaml = config
        .to_yaml_string()
        .map_err(|e| format!("YAML serialization error: {e}"))?;
    std::fs::write(save_dir.join("config.yaml"), &yaml)
        .map_err(|e| format!("Failed to write config.yaml: {e}"))?;

    let console: Box<dyn Write + Send> = if level == LogLevel::Quiet {
        Box::new(io::sink())
    } else {
        Box::new(io::stdout())
    };
    let mut logger = Logger::new(true)
        .with_console(console)
        .with_file(save_dir.join(LogSink::DEFAULT_FILE), FileMode::Append)
        .map_err(|e| format!("Failed to open log: {e}"))?;
    let line = format!(
        "{} {}-way {}-shot on {}, {} epochs",
        spec.model.encoder,
        spec.data.n_way,
        spec.data.n_shot,
        spec.data.dataset,
        spec.training.max_epoch
    );
    logger
        .log_line(line)
        .map_err(|e| format!("Failed to write log: {e}"))?;
    logger
        .close()
        .map_err(|e| format!("Failed to close log: {e}"))?;

    log(
        level,
        LogLevel::Verbose,
        &format!("Prepared in {}", time_str(timer.elapsed())),
    );
    Ok(())
}

/// Ask on stdin; anything but "n" means yes, closed stdin means no
fn confirm_removal(path: &Path) -> bool {
    print!("{} exists, remove? ([y]/n): ", path.display());
    let _ = io::stdout().flush();

    read_confirmation(&mut io::stdin().lock())
}
