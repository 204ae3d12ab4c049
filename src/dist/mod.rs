//! Process-group queries for multi-process training
//!
//! A [`DistContext`] carries the rank layout of the current process. It is
//! built from the launcher's environment (`RANK`, `WORLD_SIZE`, `LOCAL_RANK`,
//! `LOCAL_WORLD_SIZE`) and, when a [`ProcessGroup`] is attached, can block on
//! a barrier across all ranks. Without a group every query answers as a
//! single process.

use crate::error::{Error, Result};
use std::fmt;
use std::net::TcpListener;
use std::sync::{Arc, Barrier};

/// Collective operations shared by all ranks
pub trait ProcessGroup: Send + Sync {
    /// Block until every rank has reached the barrier
    fn barrier(&self) -> Result<()>;
}

/// Threads of one process acting as ranks
#[derive(Debug)]
pub struct LocalProcessGroup {
    barrier: Barrier,
}

impl LocalProcessGroup {
    /// One context per rank, all sharing a group of `world_size` threads
    pub fn spawn(world_size: usize) -> Vec<DistContext> {
        let group: Arc<dyn ProcessGroup> = Arc::new(Self {
            barrier: Barrier::new(world_size),
        });

        (0..world_size)
            .map(|rank| DistContext {
                rank,
                world_size,
                local_rank: rank,
                local_size: world_size,
                group: Some(Arc::clone(&group)),
            })
            .collect()
    }
}

impl ProcessGroup for LocalProcessGroup {
    fn barrier(&self) -> Result<()> {
        self.barrier.wait();
        Ok(())
    }
}

/// Rank layout of the current process
#[derive(Clone)]
pub struct DistContext {
    rank: usize,
    world_size: usize,
    local_rank: usize,
    local_size: usize,
    group: Option<Arc<dyn ProcessGroup>>,
}

impl Default for DistContext {
    fn default() -> Self {
        Self::single()
    }
}

impl fmt::Debug for DistContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistContext")
            .field("rank", &self.rank)
            .field("world_size", &self.world_size)
            .field("local_rank", &self.local_rank)
            .field("local_size", &self.local_size)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl DistContext {
    /// A lone process: rank 0 of 1
    pub fn single() -> Self {
        Self {
            rank: 0,
            world_size: 1,
            local_rank: 0,
            local_size: 1,
            group: None,
        }
    }

    /// Read the rank layout from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the rank layout through `lookup`
    ///
    /// Missing variables fall back to a single process; values that are not
    /// non-negative integers, or a rank outside the world, are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str, default: usize| -> Result<usize> {
            match lookup(key) {
                None => Ok(default),
                Some(raw) => raw.trim().parse().map_err(|_| {
                    Error::ConfigError(format!("{key} must be a non-negative integer, got {raw:?}"))
                }),
            }
        };

        let rank = read("RANK", 0)?;
        let world_size = read("WORLD_SIZE", 1)?;
        let local_rank = read("LOCAL_RANK", 0)?;
        let local_size = read("LOCAL_WORLD_SIZE", 1)?;

        if world_size == 0 || rank >= world_size {
            return Err(Error::ConfigError(format!(
                "RANK {rank} is outside WORLD_SIZE {world_size}"
            )));
        }
        if local_size == 0 || local_rank >= local_size {
            return Err(Error::ConfigError(format!(
                "LOCAL_RANK {local_rank} is outside LOCAL_WORLD_SIZE {local_size}"
            )));
        }

        Ok(Self {
            rank,
            world_size,
            local_rank,
            local_size,
            group: None,
        })
    }

    /// Attach the group used by [`DistContext::synchronize`]
    pub fn with_group(mut self, group: Arc<dyn ProcessGroup>) -> Self {
        self.group = Some(group);
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.group.is_some()
    }

    pub fn get_rank(&self) -> usize {
        self.rank
    }

    pub fn get_world_size(&self) -> usize {
        self.world_size
    }

    /// Rank within the current machine
    pub fn get_local_rank(&self) -> usize {
        self.local_rank
    }

    /// Number of processes on the current machine
    pub fn get_local_size(&self) -> usize {
        self.local_size
    }

    pub fn is_main_process(&self) -> bool {
        self.rank == 0
    }

    /// Barrier across all ranks; returns immediately for a single process
    pub fn synchronize(&self) -> Result<()> {
        match &self.group {
            Some(group) if self.world_size > 1 => group.barrier(),
            _ => Ok(()),
        }
    }
}

/// Ask the OS for a currently unused TCP port
///
/// The port is released before returning, so another process may still
/// claim it first.
pub fn find_free_port() -> Result<u16> {
    let listener = TcpListener::bind(("0.0.0.0", 0))?;
    Ok(listener.local_addr()?.port())
}

/// Restrict the GPUs visible to this process (`CUDA_VISIBLE_DEVICES`)
pub fn set_visible_devices(gpus: &str) {
    std::env::set_var("CUDA_VISIBLE_DEVICES", gpus);
}
