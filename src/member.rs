//! Member wrapper type
//!
//! This module provides the [`Member`] type that wraps an organism with its
//! scored fitness. Fitness lives here rather than on the host type: the
//! engine assigns it once per scoring pass, and any operator that changes a
//! genotype clears it so a member is never carried with a stale score.

use serde::{Deserialize, Serialize};

use crate::organism::Organism;

/// One population member: an organism plus its fitness, if scored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Member<O> {
    /// The wrapped organism
    pub organism: O,
    /// The fitness value (None until scored)
    pub fitness: Option<f64>,
}

impl<O: Organism> Member<O> {
    /// Wrap an organism with no fitness yet.
    pub fn new(organism: O) -> Self {
        Self {
            organism,
            fitness: None,
        }
    }

    /// Wrap an organism with a known fitness.
    pub fn with_fitness(organism: O, fitness: f64) -> Self {
        Self {
            organism,
            fitness: Some(fitness),
        }
    }

    /// Whether this member has been scored.
    pub fn is_scored(&self) -> bool {
        self.fitness.is_some()
    }

    /// Drop the stored fitness. Called whenever the genotype changes.
    pub fn clear_fitness(&mut self) {
        self.fitness = None;
    }

    /// Genotype equality with another member.
    pub fn same_genotype(&self, other: &Self) -> bool {
        self.organism.same_genotype(&other.organism)
    }

    /// Take the organism out of this member.
    pub fn into_organism(self) -> O {
        self.organism
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gene::Gene;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Knob {
        level: i64,
    }

    impl Organism for Knob {
        type Allele = i64;

        fn create() -> Self {
            Self::default()
        }

        fn genes() -> Vec<Gene<i64>> {
            vec![Gene::new("level", 0..=100i64)]
        }

        fn gene(&self, name: &str) -> Option<&i64> {
            (name == "level").then_some(&self.level)
        }

        fn set_gene(&mut self, name: &str, value: i64) {
            if name == "level" {
                self.level = value;
            }
        }
    }

    #[test]
    fn test_member_new_unscored() {
        let member = Member::new(Knob { level: 5 });
        assert!(!member.is_scored());
        assert_eq!(member.fitness, None);
    }

    #[test]
    fn test_member_with_fitness() {
        let member = Member::with_fitness(Knob { level: 5 }, 42.0);
        assert!(member.is_scored());
        assert_eq!(member.fitness, Some(42.0));
    }

    #[test]
    fn test_member_clear_fitness() {
        let mut member = Member::with_fitness(Knob { level: 5 }, 42.0);
        member.clear_fitness();
        assert!(!member.is_scored());
    }

    #[test]
    fn test_member_same_genotype_ignores_fitness() {
        let a = Member::with_fitness(Knob { level: 5 }, 1.0);
        let b = Member::with_fitness(Knob { level: 5 }, 9.0);
        let c = Member::new(Knob { level: 6 });

        assert!(a.same_genotype(&b));
        assert!(!a.same_genotype(&c));
    }

    #[test]
    fn test_member_serde_roundtrip() {
        let member = Member::with_fitness(Knob { level: 7 }, 3.5);
        let json = serde_json::to_string(&member).unwrap();
        let back: Member<Knob> = serde_json::from_str(&json).unwrap();

        assert_eq!(back.organism, member.organism);
        assert_eq!(back.fitness, member.fitness);
    }
}
