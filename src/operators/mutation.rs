//! Mutation operator
//!
//! Non-pairwise: maps independently over each member. For every declared
//! gene an independent Bernoulli trial decides whether that gene's value is
//! replaced with a freshly expressed one; the expected number of mutated
//! genes per member is `mutation_rate * gene_count`.

use rand::Rng;
use rand_distr::{Bernoulli, Distribution};
use serde::{Deserialize, Serialize};

use crate::member::Member;
use crate::organism::Organism;

/// Per-gene resampling mutation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Mutation {
    mutation_rate: f64,
}

impl Mutation {
    /// Create a mutation operator with the given per-gene rate.
    pub fn new(mutation_rate: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&mutation_rate),
            "Mutation rate must be in [0, 1]"
        );
        Self { mutation_rate }
    }

    /// The configured per-gene mutation rate.
    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// Mutate every member of the slice independently.
    pub fn evolve<O: Organism, R: Rng>(&self, members: &mut [Member<O>], rng: &mut R) {
        for member in members.iter_mut() {
            self.mutate_member(member, rng);
        }
    }

    fn mutate_member<O: Organism, R: Rng>(&self, member: &mut Member<O>, rng: &mut R) {
        if self.mutation_rate == 0.0 {
            return;
        }
        // Rate was range-checked in the constructor.
        let trial = Bernoulli::new(self.mutation_rate).expect("mutation rate in [0, 1]");

        let mut changed = false;
        for gene in O::genes() {
            if trial.sample(rng) {
                let value = gene.express(rng);
                member.organism.set_gene(gene.name(), value);
                changed = true;
            }
        }
        if changed {
            // The stored score no longer describes this genotype.
            member.clear_fitness();
        }
    }
}
