//! Gene descriptors
//!
//! A [`Gene`] is an immutable pair of a name and a value-range sampling
//! policy. Descriptors are created once per host type definition and shared
//! read-only by every organism instance of that type; `express` produces a
//! fresh random value on demand.

use std::fmt;
use std::ops::{Range, RangeInclusive};
use std::sync::Arc;

use rand::distributions::uniform::SampleUniform;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

/// Sampling policy for a gene's value domain.
///
/// The exact distribution is host-defined: uniform numeric ranges and
/// discrete choices are provided, arbitrary policies plug in via
/// [`Sampler`] or a direct implementation.
pub trait Expression<A>: Send + Sync {
    /// Draw a fresh value from the domain.
    fn express(&self, rng: &mut dyn RngCore) -> A;
}

impl<A> Expression<A> for RangeInclusive<A>
where
    A: SampleUniform + PartialOrd + Clone + Send + Sync,
{
    fn express(&self, rng: &mut dyn RngCore) -> A {
        rng.gen_range(self.clone())
    }
}

impl<A> Expression<A> for Range<A>
where
    A: SampleUniform + PartialOrd + Clone + Send + Sync,
{
    fn express(&self, rng: &mut dyn RngCore) -> A {
        rng.gen_range(self.clone())
    }
}

/// Uniform choice among a fixed set of values.
impl<A> Expression<A> for Vec<A>
where
    A: Clone + Send + Sync,
{
    fn express(&self, rng: &mut dyn RngCore) -> A {
        self.choose(rng)
            .expect("cannot express a choice gene with no values")
            .clone()
    }
}

/// Adapter turning a closure into an [`Expression`].
pub struct Sampler<F>(pub F);

impl<A, F> Expression<A> for Sampler<F>
where
    F: Fn(&mut dyn RngCore) -> A + Send + Sync,
{
    fn express(&self, rng: &mut dyn RngCore) -> A {
        (self.0)(rng)
    }
}

/// A named trait slot with a domain of possible values.
pub struct Gene<A> {
    name: String,
    expression: Arc<dyn Expression<A>>,
}

impl<A> Gene<A> {
    /// Create a gene from a name and a sampling policy.
    pub fn new(name: impl Into<String>, expression: impl Expression<A> + 'static) -> Self {
        Self {
            name: name.into(),
            expression: Arc::new(expression),
        }
    }

    /// Create a gene whose values are drawn uniformly from a fixed set.
    pub fn choice(name: impl Into<String>, values: Vec<A>) -> Self
    where
        A: Clone + Send + Sync + 'static,
    {
        assert!(!values.is_empty(), "Choice gene needs at least one value");
        Self::new(name, values)
    }

    /// Create a gene from an arbitrary sampling closure.
    pub fn sampled<F>(name: impl Into<String>, sample: F) -> Self
    where
        F: Fn(&mut dyn RngCore) -> A + Send + Sync + 'static,
    {
        Self::new(name, Sampler(sample))
    }

    /// The gene's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sample a fresh value from the gene's value range.
    pub fn express<R: Rng>(&self, rng: &mut R) -> A {
        self.expression.express(rng)
    }
}

impl<A> Clone for Gene<A> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            expression: Arc::clone(&self.expression),
        }
    }
}

impl<A> fmt::Debug for Gene<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gene")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_range_gene_expresses_within_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let gene = Gene::new("count", 0..=100i64);

        for _ in 0..200 {
            let value = gene.express(&mut rng);
            assert!((0..=100).contains(&value));
        }
    }

    #[test]
    fn test_float_range_gene() {
        let mut rng = StdRng::seed_from_u64(2);
        let gene = Gene::new("weight", -1.0..1.0f64);

        for _ in 0..200 {
            let value = gene.express(&mut rng);
            assert!((-1.0..1.0).contains(&value));
        }
    }

    #[test]
    fn test_choice_gene_expresses_declared_values() {
        let mut rng = StdRng::seed_from_u64(3);
        let gene = Gene::choice("vowel", vec!['a', 'e', 'i', 'o', 'u']);

        for _ in 0..100 {
            let value = gene.express(&mut rng);
            assert!("aeiou".contains(value));
        }
    }

    #[test]
    #[should_panic(expected = "Choice gene needs at least one value")]
    fn test_choice_gene_empty() {
        let _ = Gene::<i64>::choice("empty", vec![]);
    }

    #[test]
    fn test_sampled_gene_uses_closure() {
        let mut rng = StdRng::seed_from_u64(4);
        let gene = Gene::sampled("even", |rng| rng.gen_range(0..50i64) * 2);

        for _ in 0..100 {
            assert_eq!(gene.express(&mut rng) % 2, 0);
        }
    }

    #[test]
    fn test_gene_clone_shares_expression() {
        let mut rng = StdRng::seed_from_u64(5);
        let gene = Gene::new("count", 0..=10i64);
        let copy = gene.clone();

        assert_eq!(copy.name(), "count");
        assert!((0..=10).contains(&copy.express(&mut rng)));
    }
}
