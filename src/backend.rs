//! Execution backends
//!
//! A backend runs circuits for a number of shots and hands back counts.
//! Jobs can be run immediately or submitted and collected later by id.
//! [`StatevectorBackend`] is the local implementation; jobs queued on it are
//! executed when their result is requested and then forgotten, so each job's
//! counts can be collected exactly once.

use std::collections::BTreeMap;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::EvaluatorConfig;
use crate::error::{KetError, Result};
use crate::quantum::circuit::QuantumCircuit;
use crate::simulators::{Counts, Evaluator};

/// Identifier handed out by [`Backend::submit`]
pub type JobId = u64;

/// Something that executes circuits and reports counts
pub trait Backend {
    fn name(&self) -> &str;

    /// Jobs submitted but not yet executed
    fn pending_jobs(&self) -> usize;

    /// Execute `circuit` now
    fn run(&mut self, circuit: &QuantumCircuit, shots: usize) -> Result<Counts>;

    /// Queue `circuit` for later execution
    fn submit(&mut self, circuit: &QuantumCircuit, shots: usize) -> Result<JobId>;

    /// Counts for a submitted job; a job's counts can be taken only once
    fn result(&mut self, job: JobId) -> Result<Counts>;
}

/// Local backend sampling from an exact statevector
pub struct StatevectorBackend {
    name: String,
    evaluator: Evaluator,
    rng: StdRng,
    next_job: JobId,
    queued: BTreeMap<JobId, (QuantumCircuit, usize)>,
}

impl StatevectorBackend {
    /// Backend with a seeded random source; `None` seeds from entropy
    pub fn new(name: impl Into<String>, config: EvaluatorConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        StatevectorBackend {
            name: name.into(),
            evaluator: Evaluator::new(config),
            rng,
            next_job: 0,
            queued: BTreeMap::new(),
        }
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }
}

impl Default for StatevectorBackend {
    fn default() -> Self {
        Self::new("statevector", EvaluatorConfig::default(), None)
    }
}

impl Backend for StatevectorBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn pending_jobs(&self) -> usize {
        self.queued.len()
    }

    fn run(&mut self, circuit: &QuantumCircuit, shots: usize) -> Result<Counts> {
        self.evaluator.sample(circuit, shots, &mut self.rng)
    }

    fn submit(&mut self, circuit: &QuantumCircuit, shots: usize) -> Result<JobId> {
        if shots == 0 {
            return Err(KetError::InvalidShots(shots));
        }
        let job = self.next_job;
        self.next_job += 1;
        self.queued.insert(job, (circuit.clone(), shots));
        info!(backend = self.name.as_str(), job = job, shots = shots; "Job submitted");
        Ok(job)
    }

    fn result(&mut self, job: JobId) -> Result<Counts> {
        let (circuit, shots) = self.queued.remove(&job).ok_or(KetError::UnknownJob(job))?;
        let counts = self.run(&circuit, shots)?;
        debug!(backend = self.name.as_str(), job = job; "Job finished");
        Ok(counts)
    }
}

/// Index of the backend with the fewest pending jobs; ties go to the earliest
pub fn least_busy(backends: &[&dyn Backend]) -> Option<usize> {
    backends
        .iter()
        .enumerate()
        .min_by_key(|(_, backend)| backend.pending_jobs())
        .map(|(i, _)| i)
}
