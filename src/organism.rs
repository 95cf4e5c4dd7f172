//! The organism contract
//!
//! Host types implement [`Organism`] to become evolvable: they declare a
//! gene set and expose genotype access by gene name. The engine is generic
//! over this trait, so two organisms of different host types can never meet
//! in a crossover; that pairing rule is enforced by the type system.

use crate::gene::Gene;

/// Capability set any evolvable host type must satisfy.
///
/// `Clone` supplies the value-semantics deep copy the engine relies on when
/// it snapshots elite and remainder segments: a cloned organism must share
/// no mutable state with the original.
pub trait Organism: Clone + Send + Sync + Sized + 'static {
    /// The gene value type shared by every gene of this organism.
    type Allele: Clone + PartialEq + Send + Sync + 'static;

    /// Fresh organism with a default (empty) genotype. The engine fills in
    /// every declared gene before the organism is ever scored.
    fn create() -> Self;

    /// The declared gene set, in declaration order. Crossover iterates
    /// genes in exactly this order.
    fn genes() -> Vec<Gene<Self::Allele>>;

    /// Current value for the named gene, if set.
    fn gene(&self, name: &str) -> Option<&Self::Allele>;

    /// Assign a value to the named gene.
    fn set_gene(&mut self, name: &str, value: Self::Allele);

    /// Structural validity. Invalid organisms are rejected and resampled
    /// during construction; the engine never scores an invalid one it
    /// built itself.
    fn is_valid(&self) -> bool {
        true
    }

    /// Genotype equality, value-for-value over the declared gene set.
    /// Used for deduplication.
    fn same_genotype(&self, other: &Self) -> bool {
        Self::genes()
            .iter()
            .all(|gene| self.gene(gene.name()) == other.gene(gene.name()))
    }
}
