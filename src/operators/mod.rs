//! Evolution operators
//!
//! Two operator variants exist: pairwise [`Reproduction`] (crossover over a
//! parent pair) and non-pairwise [`Mutation`] (member-wise gene
//! resampling). A population applies its configured operators in order,
//! routing pairs through the pairwise ones and member sets through the
//! rest.

pub mod mutation;
pub mod reproduction;

pub use mutation::Mutation;
pub use reproduction::{CrossoverMethod, Reproduction};

use serde::{Deserialize, Serialize};

/// One stage of a population's configured evolution pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum EvolutionType {
    /// Pairwise recombination of two parents into two offspring.
    Reproduction(Reproduction),
    /// Member-wise mutation.
    Mutation(Mutation),
}

impl EvolutionType {
    /// Whether this operator consumes a parent pair.
    pub fn is_pairwise(&self) -> bool {
        matches!(self, EvolutionType::Reproduction(_))
    }
}

/// The default pipeline: alternating-swap reproduction followed by
/// mutation at rate 0.10.
pub fn default_evolution_types() -> Vec<EvolutionType> {
    vec![
        EvolutionType::Reproduction(Reproduction::new(CrossoverMethod::AlternatingSwap)),
        EvolutionType::Mutation(Mutation::new(0.10)),
    ]
}
