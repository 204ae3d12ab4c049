//! Training loop support
//!
//! Everything a training script keeps around its loop:
//! - Running averages of losses and accuracies
//! - Wall-clock timers with compact formatting
//! - A logger that mirrors console output into the run directory
//!
//! # Example
//!
//! ```no_run
//! use metatrain::train::{time_str, Averager, LogSink, Timer};
//!
//! let sink = LogSink::in_dir("./save/_debug");
//! let timer = Timer::new();
//! let mut loss = Averager::new();
//!
//! for batch_loss in [0.9, 0.7, 0.6] {
//!     loss.add(batch_loss, 1.0);
//! }
//! sink.log(format!("epoch 1, loss {:.4}, {}", loss.item(), time_str(timer.elapsed())))?;
//! # Ok::<(), metatrain::Error>(())
//! ```

mod logger;
mod meters;

pub use logger::{FileMode, LogSink, Logger};
pub use meters::{time_str, AverageMeter, Averager, Timer};
