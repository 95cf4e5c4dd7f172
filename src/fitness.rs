//! Fitness objectives and the external evaluator contract

use serde::{Deserialize, Serialize};

use crate::error::EvoResult;
use crate::organism::Organism;

/// The direction of optimization.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitnessObjective {
    /// Drive the absolute fitness toward zero.
    #[default]
    Nullify,
    /// Drive fitness up toward the goal.
    Maximize,
    /// Drive fitness down toward the goal.
    Minimize,
}

impl FitnessObjective {
    /// Sort key under this objective; lower keys are better.
    pub fn sort_key(self, fitness: f64) -> f64 {
        match self {
            FitnessObjective::Nullify => fitness.abs(),
            FitnessObjective::Maximize => -fitness,
            FitnessObjective::Minimize => fitness,
        }
    }

    /// Whether fitness `a` beats fitness `b` under this objective.
    pub fn is_better(self, a: f64, b: f64) -> bool {
        self.sort_key(a) < self.sort_key(b)
    }

    /// Whether a best member with `best_fitness` has reached `goal`.
    pub fn goal_attained(self, best_fitness: f64, goal: f64) -> bool {
        match self {
            FitnessObjective::Nullify => best_fitness.abs() <= goal,
            FitnessObjective::Maximize => best_fitness >= goal,
            FitnessObjective::Minimize => best_fitness <= goal,
        }
    }
}

/// External fitness evaluator.
///
/// Invoked once per unscored member during a scoring pass; under the
/// `parallel` feature it may be called from multiple worker threads
/// concurrently. Any error aborts the whole pass, so a member is never
/// left with a silently missing fitness.
pub trait FitnessEvaluator<O: Organism>: Send + Sync {
    /// Compute the scalar fitness of one organism.
    fn score(&self, organism: &O) -> EvoResult<f64>;
}

impl<O, F> FitnessEvaluator<O> for F
where
    O: Organism,
    F: Fn(&O) -> EvoResult<f64> + Send + Sync,
{
    fn score(&self, organism: &O) -> EvoResult<f64> {
        self(organism)
    }
}
