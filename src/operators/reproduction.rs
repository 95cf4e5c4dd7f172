//! Reproduction operator
//!
//! Pairwise: combines two parents of the same host type into exactly two
//! new offspring via a crossover policy. Offspring are built through the
//! host's construction contract, with fitness left unset.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EvoResult, EvolutionError};
use crate::member::Member;
use crate::organism::Organism;

/// Crossover policy for [`Reproduction`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverMethod {
    /// Genes alternate donors in declaration order: at even positions
    /// offspring 1 inherits from parent 1, at odd positions the assignment
    /// flips. Deterministic given the gene order. Offspring 2 is the exact
    /// complement.
    AlternatingSwap,
    /// The donor parent is drawn uniformly per gene, independently for
    /// each offspring.
    RandomSwap,
}

/// Pairwise recombination operator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Reproduction {
    crossover_method: CrossoverMethod,
}

impl Reproduction {
    /// Create a reproduction operator with the given crossover policy.
    pub fn new(crossover_method: CrossoverMethod) -> Self {
        Self { crossover_method }
    }

    /// The configured crossover policy.
    pub fn crossover_method(&self) -> CrossoverMethod {
        self.crossover_method
    }

    /// Combine two parents into two fresh, unscored offspring.
    ///
    /// Fails with [`EvolutionError::IncompleteGenotype`] if a parent lacks
    /// a value for any declared gene.
    pub fn evolve<O: Organism, R: Rng>(
        &self,
        parent1: &O,
        parent2: &O,
        rng: &mut R,
    ) -> EvoResult<(Member<O>, Member<O>)> {
        let mut offspring1 = O::create();
        let mut offspring2 = O::create();

        for (position, gene) in O::genes().iter().enumerate() {
            let (donor1, donor2) = match self.crossover_method {
                CrossoverMethod::AlternatingSwap => {
                    if position % 2 == 0 {
                        (parent1, parent2)
                    } else {
                        (parent2, parent1)
                    }
                }
                CrossoverMethod::RandomSwap => (
                    if rng.gen::<bool>() { parent1 } else { parent2 },
                    if rng.gen::<bool>() { parent1 } else { parent2 },
                ),
            };

            offspring1.set_gene(gene.name(), inherit(donor1, gene.name())?);
            offspring2.set_gene(gene.name(), inherit(donor2, gene.name())?);
        }

        Ok((Member::new(offspring1), Member::new(offspring2)))
    }
}

fn inherit<O: Organism>(donor: &O, gene: &str) -> EvoResult<O::Allele> {
    donor
        .gene(gene)
        .cloned()
        .ok_or_else(|| EvolutionError::IncompleteGenotype(gene.to_string()))
}
