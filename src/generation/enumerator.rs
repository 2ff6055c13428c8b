//! Size-by-size enumeration with resumable checkpoints

use super::{expand_with, Generation};
use crate::checkpoint::CheckpointStore;
use crate::config::EnumerationConfig;
use crate::{Error, Result};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// One completed expansion
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    /// Node count of the new generation
    pub size: usize,
    /// Number of isomers of that size
    pub count: usize,
    /// Wall time spent expanding and saving
    pub elapsed: Duration,
}

/// Outcome of [`Enumerator::run`]
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Requested carbon count
    pub target: usize,
    /// Size of the checkpoint the run resumed from, if any
    pub resumed_from: Option<usize>,
    /// Expansions performed, in order
    pub steps: Vec<StepReport>,
    /// Generation of the target size
    pub generation: Generation,
}

impl RunReport {
    /// Number of structural isomers of the target size
    pub fn count(&self) -> usize {
        self.generation.len()
    }
}

/// Drives expansion from a starting generation up to a target size,
/// checkpointing every completed size
pub struct Enumerator<S> {
    store: S,
    config: EnumerationConfig,
}

impl<S: CheckpointStore> Enumerator<S> {
    /// Create an enumerator over `store`
    pub fn new(store: S, config: EnumerationConfig) -> Self {
        Enumerator { store, config }
    }

    /// Active configuration
    pub fn config(&self) -> &EnumerationConfig {
        &self.config
    }

    /// Borrow the checkpoint store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the enumerator, returning its store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Enumerate all isomers with `target` carbons
    pub fn run(&mut self, target: usize) -> Result<RunReport> {
        self.run_with_progress(target, |_| {})
    }

    /// Enumerate, calling `on_step` after every completed size
    pub fn run_with_progress<F>(&mut self, target: usize, mut on_step: F) -> Result<RunReport>
    where
        F: FnMut(&StepReport),
    {
        if target < 1 {
            return Err(Error::InvalidTarget(target));
        }

        let (mut current, resumed_from) = self.starting_point(target)?;
        if resumed_from.is_none() {
            self.store.save(&current)?;
            info!("starting from size 1");
        }

        let mut steps = Vec::with_capacity(target.saturating_sub(current.size()));
        while current.size() < target {
            let started = Instant::now();
            let next = expand_with(&current, &self.config.expand);
            self.store.save(&next)?;

            let step = StepReport {
                size: next.size(),
                count: next.len(),
                elapsed: started.elapsed(),
            };
            info!(
                size = step.size,
                count = step.count,
                elapsed_ms = step.elapsed.as_millis() as u64,
                "generation complete"
            );
            on_step(&step);
            steps.push(step);
            current = next;
        }

        Ok(RunReport {
            target,
            resumed_from,
            steps,
            generation: current,
        })
    }

    /// Highest stored generation below `target`, or the base case
    ///
    /// Missing checkpoints are skipped; unreadable or invalid ones abort the run.
    fn starting_point(&self, target: usize) -> Result<(Generation, Option<usize>)> {
        if self.config.resume {
            for size in (1..target).rev() {
                match self.store.load(size)? {
                    Some(generation) => {
                        info!(size, trees = generation.len(), "resuming from checkpoint");
                        return Ok((generation, Some(size)));
                    }
                    None => debug!(size, "no checkpoint"),
                }
            }
        }
        Ok((Generation::base(), None))
    }
}
