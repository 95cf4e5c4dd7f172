//! Population engine
//!
//! This module owns the generational loop: bootstrap, scoring and sorting,
//! diversity injection, weighted parent selection, operator application,
//! and the replacement policy that decides which members survive into the
//! next generation.

use std::cmp::Ordering;
use std::marker::PhantomData;

use rand::Rng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{EvoResult, EvolutionError};
use crate::fitness::{FitnessEvaluator, FitnessObjective};
use crate::member::Member;
use crate::operators::{default_evolution_types, EvolutionType};
use crate::organism::Organism;
use crate::selection::{normalized_weights, RouletteWheel};

/// Default retry cap for reject-and-resample construction.
pub const DEFAULT_MAX_BUILD_ATTEMPTS: usize = 10_000;

/// A population of organisms evolving toward a fitness goal.
///
/// The sole owner of its member list and history. After every completed
/// generation the member list is sorted best-first under the configured
/// objective and holds exactly `population_size` members.
pub struct Population<O, E>
where
    O: Organism,
    E: FitnessEvaluator<O>,
{
    members: Vec<Member<O>>,
    generation: usize,
    fitness_goal: f64,
    fitness_objective: FitnessObjective,
    population_size: usize,
    population_selection: usize,
    random_members: usize,
    generations_limit: usize,
    evolution_types: Vec<EvolutionType>,
    history: Vec<Vec<Member<O>>>,
    evaluator: E,
    parallel_scoring: bool,
    max_build_attempts: usize,
}

/// Builder for [`Population`]
pub struct PopulationBuilder<O> {
    population_size: usize,
    population_selection: Option<usize>,
    random_members: Option<usize>,
    fitness_goal: Option<f64>,
    fitness_objective: FitnessObjective,
    generations_limit: usize,
    evolution_types: Vec<EvolutionType>,
    starting_members: Vec<O>,
    parallel_scoring: bool,
    max_build_attempts: usize,
    _organism: PhantomData<O>,
}

impl<O: Organism> PopulationBuilder<O> {
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        Self {
            population_size: 10,
            population_selection: None,
            random_members: None,
            fitness_goal: None,
            fitness_objective: FitnessObjective::default(),
            generations_limit: 0,
            evolution_types: default_evolution_types(),
            starting_members: Vec::new(),
            parallel_scoring: false,
            max_build_attempts: DEFAULT_MAX_BUILD_ATTEMPTS,
            _organism: PhantomData,
        }
    }

    /// Set the population size.
    pub fn population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Set the elite slot count (default: `ceil(0.2 * population_size)`).
    pub fn population_selection(mut self, count: usize) -> Self {
        self.population_selection = Some(count);
        self
    }

    /// Set the per-generation diversity-injection count
    /// (default: `ceil(0.1 * population_size)`).
    pub fn random_members(mut self, count: usize) -> Self {
        self.random_members = Some(count);
        self
    }

    /// Set the fitness goal (required).
    pub fn fitness_goal(mut self, goal: f64) -> Self {
        self.fitness_goal = Some(goal);
        self
    }

    /// Set the fitness objective (default: nullify).
    pub fn fitness_objective(mut self, objective: FitnessObjective) -> Self {
        self.fitness_objective = objective;
        self
    }

    /// Set the generation limit; 0 means "run until the goal is attained".
    pub fn generations_limit(mut self, limit: usize) -> Self {
        self.generations_limit = limit;
        self
    }

    /// Replace the evolution operator pipeline.
    pub fn evolution_types(mut self, types: Vec<EvolutionType>) -> Self {
        self.evolution_types = types;
        self
    }

    /// Seed the population with pre-built organisms; the bootstrap only
    /// fills the gap up to `population_size`.
    pub fn starting_members(mut self, organisms: Vec<O>) -> Self {
        self.starting_members = organisms;
        self
    }

    /// Dispatch fitness scoring across a worker pool (requires the
    /// `parallel` feature; falls back to sequential scoring without it).
    pub fn parallel_scoring(mut self, enabled: bool) -> Self {
        self.parallel_scoring = enabled;
        self
    }

    /// Set the retry cap for reject-and-resample construction.
    pub fn max_build_attempts(mut self, attempts: usize) -> Self {
        self.max_build_attempts = attempts;
        self
    }

    /// Validate the configuration and bootstrap generation 0.
    pub fn build<E, R>(self, evaluator: E, rng: &mut R) -> EvoResult<Population<O, E>>
    where
        E: FitnessEvaluator<O>,
        R: Rng,
    {
        if self.population_size == 0 {
            return Err(EvolutionError::Configuration(
                "population size must be positive".to_string(),
            ));
        }
        let fitness_goal = self.fitness_goal.ok_or_else(|| {
            EvolutionError::Configuration("fitness goal must be specified".to_string())
        })?;
        let population_selection = self
            .population_selection
            .unwrap_or_else(|| share_of(self.population_size, 0.2));
        if population_selection > self.population_size {
            return Err(EvolutionError::Configuration(format!(
                "population selection ({population_selection}) exceeds population size ({})",
                self.population_size
            )));
        }
        let random_members = self
            .random_members
            .unwrap_or_else(|| share_of(self.population_size, 0.1));
        if self.max_build_attempts == 0 {
            return Err(EvolutionError::Configuration(
                "max build attempts must be positive".to_string(),
            ));
        }
        if self.starting_members.len() > self.population_size {
            return Err(EvolutionError::Configuration(format!(
                "{} starting members exceed population size {}",
                self.starting_members.len(),
                self.population_size
            )));
        }

        let mut members: Vec<Member<O>> = self
            .starting_members
            .into_iter()
            .map(Member::new)
            .collect();
        while members.len() < self.population_size {
            members.push(build_member(self.max_build_attempts, rng)?);
        }
        let history = vec![members.clone()];

        Ok(Population {
            members,
            generation: 0,
            fitness_goal,
            fitness_objective: self.fitness_objective,
            population_size: self.population_size,
            population_selection,
            random_members,
            generations_limit: self.generations_limit,
            evolution_types: self.evolution_types,
            history,
            evaluator,
            parallel_scoring: self.parallel_scoring,
            max_build_attempts: self.max_build_attempts,
        })
    }
}

impl<O: Organism> Default for PopulationBuilder<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O, E> std::fmt::Debug for Population<O, E>
where
    O: Organism,
    E: FitnessEvaluator<O>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Population")
            .field("generation", &self.generation)
            .field("fitness_goal", &self.fitness_goal)
            .field("fitness_objective", &self.fitness_objective)
            .field("population_size", &self.population_size)
            .field("population_selection", &self.population_selection)
            .field("random_members", &self.random_members)
            .field("generations_limit", &self.generations_limit)
            .field("parallel_scoring", &self.parallel_scoring)
            .field("max_build_attempts", &self.max_build_attempts)
            .finish_non_exhaustive()
    }
}

impl<O, E> Population<O, E>
where
    O: Organism,
    E: FitnessEvaluator<O>,
{
    /// Create a builder for a population of `O`.
    pub fn builder() -> PopulationBuilder<O> {
        PopulationBuilder::new()
    }

    /// Current generation's members, best first once scored.
    pub fn members(&self) -> &[Member<O>] {
        &self.members
    }

    /// Current generation counter; the bootstrap population is
    /// generation 0.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Number of members currently held.
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// The configured population size.
    pub fn population_size(&self) -> usize {
        self.population_size
    }

    /// The configured elite slot count.
    pub fn population_selection(&self) -> usize {
        self.population_selection
    }

    /// The configured diversity-injection count.
    pub fn random_members(&self) -> usize {
        self.random_members
    }

    /// The fitness goal.
    pub fn fitness_goal(&self) -> f64 {
        self.fitness_goal
    }

    /// The fitness objective.
    pub fn fitness_objective(&self) -> FitnessObjective {
        self.fitness_objective
    }

    /// The generation limit; 0 means "goal only".
    pub fn generations_limit(&self) -> usize {
        self.generations_limit
    }

    /// The configured operator pipeline.
    pub fn evolution_types(&self) -> &[EvolutionType] {
        &self.evolution_types
    }

    /// Archived member snapshots, one per completed generation plus the
    /// bootstrap.
    pub fn history(&self) -> &[Vec<Member<O>>] {
        &self.history
    }

    /// The best member of the current generation.
    pub fn best_member(&self) -> Option<&Member<O>> {
        self.members.first()
    }

    /// The best member snapshot of each archived generation.
    pub fn best_each_generation(&self) -> Vec<&Member<O>> {
        self.history.iter().filter_map(|gen| gen.first()).collect()
    }

    /// The `n` best scored members across all history, deduplicated by
    /// genotype and ordered best-first under the active objective.
    pub fn best_of_all_time(&self, n: usize) -> Vec<Member<O>> {
        let mut seen: Vec<Member<O>> = Vec::new();
        for member in self.history.iter().flatten() {
            if member.is_scored() && !seen.iter().any(|s| s.same_genotype(member)) {
                seen.push(member.clone());
            }
        }
        sort_by_objective(&mut seen, self.fitness_objective);
        seen.truncate(n);
        seen
    }

    /// Assign externally computed fitness values positionally, then sort
    /// the member list under the active objective.
    pub fn set_members_fitness(&mut self, values: &[f64]) -> EvoResult<()> {
        if values.len() != self.members.len() {
            return Err(EvolutionError::FitnessCountMismatch {
                expected: self.members.len(),
                actual: values.len(),
            });
        }
        for (member, fitness) in self.members.iter_mut().zip(values) {
            member.fitness = Some(*fitness);
        }
        sort_by_objective(&mut self.members, self.fitness_objective);
        self.refresh_bootstrap_snapshot();
        Ok(())
    }

    /// Score every unscored member via the evaluator and sort best-first.
    pub fn score_members(&mut self) -> EvoResult<()> {
        score_members_with(&self.evaluator, self.parallel_scoring, &mut self.members)?;
        sort_by_objective(&mut self.members, self.fitness_objective);
        self.refresh_bootstrap_snapshot();
        Ok(())
    }

    // The bootstrap snapshot is archived before any fitness exists; once
    // generation 0 is scored, replace it so history queries cover it.
    fn refresh_bootstrap_snapshot(&mut self) {
        if self.generation == 0 && self.members.len() == self.population_size {
            self.history[0] = self.members.clone();
        }
    }

    /// Whether the best member has reached the fitness goal.
    pub fn goal_attained(&self) -> bool {
        match self.best_member().and_then(|m| m.fitness) {
            Some(fitness) => self.fitness_objective.goal_attained(fitness, self.fitness_goal),
            None => false,
        }
    }

    /// Whether evolution should stop: the generation limit is reached
    /// (when one is set) or the goal is attained.
    pub fn evolution_over(&self) -> bool {
        if self.generations_limit > 0 {
            self.generation == self.generations_limit || self.goal_attained()
        } else {
            self.goal_attained()
        }
    }

    /// Run generations until the limit or the goal is hit.
    ///
    /// With `generations_limit == 0` and an unattainable goal this never
    /// returns; bounding the run is the caller's responsibility.
    pub fn evolve<R: Rng>(&mut self, rng: &mut R) -> EvoResult<()> {
        while !(self.generation > 0 && self.evolution_over()) {
            self.make_next_generation(rng)?;
        }
        Ok(())
    }

    /// Advance the population by one generation.
    ///
    /// Executes the replacement policy: diversity injection, scoring and
    /// sorting, elite/rest snapshots, weighted pairwise recombination into
    /// a deduplicated candidate pool, mutation of the elite-replacement
    /// pool and of the rest segment, survivor comparison, backfill, and
    /// the final sort/truncate that restores `population_size`.
    pub fn make_next_generation<R: Rng>(&mut self, rng: &mut R) -> EvoResult<()> {
        if self.members.is_empty() {
            return Err(EvolutionError::EmptyPopulation);
        }

        // Score the bootstrap before injection so its archived snapshot is
        // the scored, sorted generation 0.
        if self.generation == 0 {
            self.score_members()?;
        }

        // Diversity injection, then one full scoring pass over the pool.
        for _ in 0..self.random_members {
            let member = build_member(self.max_build_attempts, rng)?;
            self.members.push(member);
        }
        score_members_with(&self.evaluator, self.parallel_scoring, &mut self.members)?;
        sort_by_objective(&mut self.members, self.fitness_objective);

        // Independent deep-copy snapshots of the elite and rest segments.
        let elites: Vec<Member<O>> = self.members[..self.population_selection].to_vec();
        let rest: Vec<Member<O>> = self.members[self.population_selection..].to_vec();

        // Weighted parent selection over the whole post-injection pool.
        let fitness: Vec<f64> = self
            .members
            .iter()
            .map(|m| m.fitness.unwrap_or(f64::NAN)) // all scored above
            .collect();
        let weights = normalized_weights(&fitness, self.fitness_objective, self.fitness_goal);
        let wheel = RouletteWheel::new(&weights);

        // Pairwise recombination into a deduplicated candidate pool,
        // bounded by population_size selection attempts.
        let mut candidates: Vec<Member<O>> = Vec::new();
        for _ in 0..self.population_size {
            if candidates.len() >= self.population_selection {
                break;
            }
            let parent1 = &self.members[wheel.spin(rng)].organism;
            let parent2 = &self.members[wheel.spin(rng)].organism;
            let offspring = self.apply_pairwise(parent1, parent2, rng)?;
            for child in offspring {
                if !candidates.iter().any(|c| c.same_genotype(&child)) {
                    candidates.push(child);
                }
            }
        }
        // Offspring arrive two at a time, so an odd selection count can
        // overshoot by one.
        if candidates.len() > self.population_selection {
            candidates.pop();
        }

        // Elite replacement pool: the elites untouched, plus a mutated
        // copy of elites and candidates; rescored, best kept.
        let mut mutation_input: Vec<Member<O>> =
            elites.iter().cloned().chain(candidates).collect();
        self.apply_non_pairwise(&mut mutation_input, rng);
        let mut elite_pool = elites.clone();
        elite_pool.extend(mutation_input);
        dedup_by_genotype(&mut elite_pool);
        score_members_with(&self.evaluator, self.parallel_scoring, &mut elite_pool)?;
        sort_by_objective(&mut elite_pool, self.fitness_objective);
        elite_pool.truncate(self.population_selection);

        // Rest segment: original vs independently mutated copy.
        let mut mutated_rest = rest.clone();
        self.apply_non_pairwise(&mut mutated_rest, rng);
        score_members_with(&self.evaluator, self.parallel_scoring, &mut mutated_rest)?;

        let mut working = elite_pool;
        working.extend(rest.iter().cloned());
        working.extend(mutated_rest.iter().cloned());
        dedup_by_genotype(&mut working);

        // Survivor comparison: where mutation changed a genotype, only the
        // better of the pair under the active objective survives.
        for (original, mutated) in rest.iter().zip(mutated_rest.iter()) {
            if original.same_genotype(mutated) {
                continue;
            }
            let (original_fitness, mutated_fitness) = match (original.fitness, mutated.fitness) {
                (Some(of), Some(mf)) => (of, mf),
                _ => continue,
            };
            let loser = if self
                .fitness_objective
                .is_better(mutated_fitness, original_fitness)
            {
                original
            } else {
                mutated
            };
            working.retain(|m| !m.same_genotype(loser));
        }

        // Backfill to size, then the final sort and truncate.
        while working.len() < self.population_size {
            working.push(build_member(self.max_build_attempts, rng)?);
        }
        score_members_with(&self.evaluator, self.parallel_scoring, &mut working)?;
        sort_by_objective(&mut working, self.fitness_objective);
        working.truncate(self.population_size);

        self.members = working;
        self.history.push(self.members.clone());
        self.generation += 1;
        Ok(())
    }

    /// Route a parent pair through every pairwise operator in configured
    /// order; non-pairwise operators pass the pair through unchanged.
    fn apply_pairwise<R: Rng>(
        &self,
        parent1: &O,
        parent2: &O,
        rng: &mut R,
    ) -> EvoResult<[Member<O>; 2]> {
        let mut pair = [Member::new(parent1.clone()), Member::new(parent2.clone())];
        for evolution in &self.evolution_types {
            if let EvolutionType::Reproduction(reproduction) = evolution {
                let (child1, child2) =
                    reproduction.evolve(&pair[0].organism, &pair[1].organism, rng)?;
                pair = [child1, child2];
            }
        }
        Ok(pair)
    }

    /// Apply every non-pairwise operator, in configured order, member-wise
    /// over the whole slice.
    fn apply_non_pairwise<R: Rng>(&self, members: &mut [Member<O>], rng: &mut R) {
        for evolution in &self.evolution_types {
            if let EvolutionType::Mutation(mutation) = evolution {
                mutation.evolve(members, rng);
            }
        }
    }
}

/// Share of a population size, rounded up. Used for the selection and
/// diversity defaults.
fn share_of(population_size: usize, fraction: f64) -> usize {
    (population_size as f64 * fraction).ceil() as usize
}

/// Construct one structurally valid member by reject-and-resample, capped
/// at `max_attempts`.
fn build_member<O: Organism, R: Rng>(max_attempts: usize, rng: &mut R) -> EvoResult<Member<O>> {
    for _ in 0..max_attempts {
        let mut organism = O::create();
        for gene in O::genes() {
            let value = gene.express(rng);
            organism.set_gene(gene.name(), value);
        }
        if organism.is_valid() {
            return Ok(Member::new(organism));
        }
    }
    Err(EvolutionError::ConstructionRetriesExhausted {
        attempts: max_attempts,
    })
}

/// Evaluate every unscored member. Under the `parallel` feature the
/// evaluator is dispatched across a worker pool when `parallel` is set;
/// any evaluator error aborts the whole pass.
fn score_members_with<O, E>(
    evaluator: &E,
    parallel: bool,
    members: &mut [Member<O>],
) -> EvoResult<()>
where
    O: Organism,
    E: FitnessEvaluator<O>,
{
    #[cfg(feature = "parallel")]
    if parallel {
        let scored: Vec<(usize, f64)> = members
            .par_iter()
            .enumerate()
            .filter(|(_, member)| !member.is_scored())
            .map(|(index, member)| {
                evaluator
                    .score(&member.organism)
                    .map(|fitness| (index, fitness))
            })
            .collect::<EvoResult<Vec<_>>>()?;
        for (index, fitness) in scored {
            members[index].fitness = Some(fitness);
        }
        return Ok(());
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    for member in members.iter_mut() {
        if !member.is_scored() {
            member.fitness = Some(evaluator.score(&member.organism)?);
        }
    }
    Ok(())
}

/// Sort best-first under the given objective; unscored members sink to
/// the end.
fn sort_by_objective<O: Organism>(members: &mut [Member<O>], objective: FitnessObjective) {
    members.sort_by(|a, b| {
        let ka = a
            .fitness
            .map(|f| objective.sort_key(f))
            .unwrap_or(f64::INFINITY);
        let kb = b
            .fitness
            .map(|f| objective.sort_key(f))
            .unwrap_or(f64::INFINITY);
        ka.partial_cmp(&kb).unwrap_or(Ordering::Equal)
    });
}

/// Drop members whose genotype already appeared earlier in the list.
fn dedup_by_genotype<O: Organism>(members: &mut Vec<Member<O>>) {
    let mut kept: Vec<Member<O>> = Vec::with_capacity(members.len());
    for member in members.drain(..) {
        if !kept.iter().any(|k| k.same_genotype(&member)) {
            kept.push(member);
        }
    }
    *members = kept;
}
