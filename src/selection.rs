//! Fitness normalization and roulette-wheel selection
//!
//! [`normalized_weights`] turns a population's raw fitness values into a
//! discrete probability distribution favoring members closer to the goal;
//! [`RouletteWheel`] draws weighted random picks from it.

use rand::Rng;

use crate::fitness::FitnessObjective;

/// Normalize raw fitness values into selection probabilities.
///
/// Returns one weight per input value, in input order, summing to 1.0.
/// Members at or past the goal dominate: if any member has met the goal,
/// the whole distribution collapses to a uniform split among the goal-met
/// members and zero everywhere else. An infinite `goal` under maximize or
/// minimize is replaced by an adaptive goal at twice the observed fitness
/// spread past the best value, so a literal infinity never starves
/// selection.
pub fn normalized_weights(fitness: &[f64], objective: FitnessObjective, goal: f64) -> Vec<f64> {
    if fitness.is_empty() {
        return Vec::new();
    }

    // Identical fitness across the board would normalize to 0/0; hand out
    // uniform weight instead.
    if fitness.iter().all(|f| *f == fitness[0]) {
        return vec![1.0 / fitness.len() as f64; fitness.len()];
    }

    let raw: Vec<f64> = match objective {
        FitnessObjective::Nullify => fitness
            .iter()
            .map(|f| {
                let distance = f.abs();
                if distance <= goal {
                    f64::INFINITY
                } else {
                    1.0 / (distance - goal)
                }
            })
            .collect(),
        FitnessObjective::Maximize => {
            let goal = if goal == f64::INFINITY {
                let best = fitness.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                let worst = fitness.iter().cloned().fold(f64::INFINITY, f64::min);
                best + (best - worst)
            } else {
                goal
            };
            fitness
                .iter()
                .map(|f| {
                    if *f >= goal {
                        f64::INFINITY
                    } else {
                        1.0 / (goal - f)
                    }
                })
                .collect()
        }
        FitnessObjective::Minimize => {
            let goal = if goal == f64::NEG_INFINITY {
                let best = fitness.iter().cloned().fold(f64::INFINITY, f64::min);
                let worst = fitness.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                best - (worst - best)
            } else {
                goal
            };
            fitness
                .iter()
                .map(|f| {
                    if *f <= goal {
                        f64::INFINITY
                    } else {
                        1.0 / (f - goal)
                    }
                })
                .collect()
        }
    };

    // Goal-met members always dominate selection.
    let raw: Vec<f64> = if raw.iter().any(|w| w.is_infinite()) {
        raw.iter()
            .map(|w| if w.is_infinite() { 1.0 } else { 0.0 })
            .collect()
    } else {
        raw
    };

    let sum: f64 = raw.iter().sum();
    raw.iter().map(|w| w / sum).collect()
}

/// Weighted (roulette-wheel) selector over a normalized distribution.
///
/// Each pick is independent; there is no without-replacement guarantee,
/// so the same member may be drawn as both parents of a pair.
#[derive(Clone, Debug)]
pub struct RouletteWheel {
    cumulative: Vec<f64>,
}

impl RouletteWheel {
    /// Build the cumulative distribution from normalized weights.
    ///
    /// The final cumulative value is forced to exactly 1.0 to guard
    /// against floating-point drift.
    pub fn new(weights: &[f64]) -> Self {
        assert!(!weights.is_empty(), "Roulette wheel needs at least one weight");

        let mut cumulative = Vec::with_capacity(weights.len());
        let mut acc = 0.0;
        for weight in weights {
            acc += weight;
            cumulative.push(acc);
        }
        *cumulative.last_mut().unwrap() = 1.0;

        Self { cumulative }
    }

    /// Index of the first slot whose cumulative weight exceeds `cut`.
    pub fn pick(&self, cut: f64) -> usize {
        self.cumulative
            .iter()
            .position(|c| cut < *c)
            .unwrap_or(self.cumulative.len() - 1)
    }

    /// Draw a uniform cut in `[0, 1)` and return the selected index.
    pub fn spin<R: Rng>(&self, rng: &mut R) -> usize {
        self.pick(rng.gen::<f64>())
    }
}
