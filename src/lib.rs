//! # speciate
//!
//! A generational genetic-algorithm engine over named genes.
//!
//! Client code supplies the gene definitions, the fitness evaluator, and a
//! validity predicate; the engine owns the evolutionary loop: bootstrap,
//! fitness-based sorting, roulette-wheel parent selection, crossover,
//! mutation, and the generation-replacement policy (elitism, diversity
//! injection, survivor-vs-mutant comparison).
//!
//! ## Core Concepts
//!
//! - **Organism contract**: host types implement [`organism::Organism`],
//!   declaring a gene set and exposing genotype access; the engine is
//!   generic over that trait.
//! - **Named genes**: a [`gene::Gene`] pairs a name with a pluggable
//!   value-range sampling policy ([`gene::Expression`]).
//! - **Objectives**: fitness can be driven toward zero, maximized, or
//!   minimized against a goal ([`fitness::FitnessObjective`]).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use speciate::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//!
//! let mut population = Population::<Triple, TripleScore>::builder()
//!     .population_size(20)
//!     .fitness_goal(0.0)
//!     .fitness_objective(FitnessObjective::Minimize)
//!     .generations_limit(100)
//!     .build(TripleScore, &mut rng)?;
//!
//! population.evolve(&mut rng)?;
//! let best = population.best_member().unwrap();
//! ```

pub mod error;
pub mod fitness;
pub mod gene;
pub mod member;
pub mod operators;
pub mod organism;
pub mod population;
pub mod selection;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{EvoResult, EvolutionError};
    pub use crate::fitness::{FitnessEvaluator, FitnessObjective};
    pub use crate::gene::{Expression, Gene, Sampler};
    pub use crate::member::Member;
    pub use crate::operators::{
        default_evolution_types, CrossoverMethod, EvolutionType, Mutation, Reproduction,
    };
    pub use crate::organism::Organism;
    pub use crate::population::{Population, PopulationBuilder};
    pub use crate::selection::{normalized_weights, RouletteWheel};
}
