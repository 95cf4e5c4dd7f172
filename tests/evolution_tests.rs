//! End-to-end and property-based tests for the evolution engine.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use speciate::prelude::*;

#[derive(Clone, Debug, Default, PartialEq)]
struct Knob {
    setting: Option<i64>,
}

impl Organism for Knob {
    type Allele = i64;

    fn create() -> Self {
        Self::default()
    }

    fn genes() -> Vec<Gene<i64>> {
        vec![Gene::new("setting", 0..=100i64)]
    }

    fn gene(&self, name: &str) -> Option<&i64> {
        (name == "setting").then(|| self.setting.as_ref()).flatten()
    }

    fn set_gene(&mut self, name: &str, value: i64) {
        if name == "setting" {
            self.setting = Some(value);
        }
    }
}

fn knob_score(organism: &Knob) -> EvoResult<f64> {
    organism
        .setting
        .map(|v| v as f64)
        .ok_or_else(|| EvolutionError::Scoring("knob has no setting".to_string()))
}

/// Two-gene organism so crossover has something to recombine.
#[derive(Clone, Debug, Default, PartialEq)]
struct Mixer {
    left: Option<i64>,
    right: Option<i64>,
}

impl Organism for Mixer {
    type Allele = i64;

    fn create() -> Self {
        Self::default()
    }

    fn genes() -> Vec<Gene<i64>> {
        vec![Gene::new("left", 0..=50i64), Gene::new("right", 0..=50i64)]
    }

    fn gene(&self, name: &str) -> Option<&i64> {
        match name {
            "left" => self.left.as_ref(),
            "right" => self.right.as_ref(),
            _ => None,
        }
    }

    fn set_gene(&mut self, name: &str, value: i64) {
        match name {
            "left" => self.left = Some(value),
            "right" => self.right = Some(value),
            _ => {}
        }
    }
}

#[test]
fn minimizing_run_improves_over_bootstrap() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut population = PopulationBuilder::<Knob>::new()
        .population_size(10)
        .fitness_goal(0.0)
        .fitness_objective(FitnessObjective::Minimize)
        .generations_limit(50)
        .build(knob_score, &mut rng)
        .unwrap();

    population.evolve(&mut rng).unwrap();

    let bootstrap_best = population.history()[0]
        .iter()
        .filter_map(|m| m.fitness)
        .fold(f64::INFINITY, f64::min);
    let final_best = population.best_member().unwrap().fitness.unwrap();
    assert!(
        final_best <= bootstrap_best,
        "final best {final_best} worse than bootstrap best {bootstrap_best}"
    );
}

#[test]
fn maximizing_run_attains_reachable_goal() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut population = PopulationBuilder::<Knob>::new()
        .population_size(15)
        .fitness_goal(95.0)
        .fitness_objective(FitnessObjective::Maximize)
        .generations_limit(500)
        .build(knob_score, &mut rng)
        .unwrap();

    population.evolve(&mut rng).unwrap();
    assert!(population.goal_attained());
}

#[test]
fn nullify_run_converges_toward_zero() {
    let mut rng = StdRng::seed_from_u64(9);
    let score = |organism: &Mixer| -> EvoResult<f64> {
        match (organism.left, organism.right) {
            (Some(l), Some(r)) => Ok((l - r) as f64),
            _ => Err(EvolutionError::Scoring("mixer incomplete".to_string())),
        }
    };
    let mut population = PopulationBuilder::<Mixer>::new()
        .population_size(20)
        .fitness_goal(0.0)
        .generations_limit(200)
        .build(score, &mut rng)
        .unwrap();

    population.evolve(&mut rng).unwrap();

    // Nullify drives |fitness| toward the goal of zero distance.
    let best = population.best_member().unwrap().fitness.unwrap();
    assert!(best.abs() <= 5.0, "best distance {} did not converge", best.abs());
}

#[test]
fn custom_pipeline_runs_operators_in_order() {
    let mut rng = StdRng::seed_from_u64(10);
    let mut population = PopulationBuilder::<Mixer>::new()
        .population_size(8)
        .fitness_goal(0.0)
        .fitness_objective(FitnessObjective::Minimize)
        .evolution_types(vec![
            EvolutionType::Reproduction(Reproduction::new(CrossoverMethod::RandomSwap)),
            EvolutionType::Mutation(Mutation::new(0.25)),
        ])
        .generations_limit(5)
        .build(
            |organism: &Mixer| {
                organism
                    .left
                    .zip(organism.right)
                    .map(|(l, r)| (l + r) as f64)
                    .ok_or_else(|| EvolutionError::Scoring("mixer incomplete".to_string()))
            },
            &mut rng,
        )
        .unwrap();

    population.evolve(&mut rng).unwrap();
    assert_eq!(population.size(), 8);
    assert_eq!(population.generation(), 5);
}

#[test]
fn externally_scored_population_sorts_without_evaluator_calls() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut population = PopulationBuilder::<Knob>::new()
        .population_size(4)
        .fitness_goal(0.0)
        .fitness_objective(FitnessObjective::Minimize)
        .build(knob_score, &mut rng)
        .unwrap();

    population.set_members_fitness(&[3.0, 1.0, 4.0, 1.5]).unwrap();
    let best = population.best_member().unwrap();
    assert_eq!(best.fitness, Some(1.0));
}

proptest! {
    #[test]
    fn generation_size_is_invariant(seed in 0u64..256, size in 2usize..20) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut population = PopulationBuilder::<Knob>::new()
            .population_size(size)
            .fitness_goal(0.0)
            .fitness_objective(FitnessObjective::Minimize)
            .build(knob_score, &mut rng)
            .unwrap();

        population.make_next_generation(&mut rng).unwrap();
        prop_assert_eq!(population.size(), size);
    }

    #[test]
    fn normalized_weights_form_a_distribution(
        fitness in prop::collection::vec(0.0f64..1000.0, 1..50),
    ) {
        let weights = normalized_weights(&fitness, FitnessObjective::Minimize, 0.0);

        prop_assert_eq!(weights.len(), fitness.len());
        for w in &weights {
            prop_assert!(*w >= 0.0);
        }
        let total: f64 = weights.iter().sum();
        prop_assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn roulette_pick_is_always_in_range(
        weights in prop::collection::vec(0.001f64..1.0, 1..30),
        cut in 0.0f64..1.0,
    ) {
        let total: f64 = weights.iter().sum();
        let normalized: Vec<f64> = weights.iter().map(|w| w / total).collect();
        let wheel = RouletteWheel::new(&normalized);

        prop_assert!(wheel.pick(cut) < weights.len());
    }

    #[test]
    fn members_are_sorted_after_generation(seed in 0u64..128) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut population = PopulationBuilder::<Knob>::new()
            .population_size(10)
            .fitness_goal(0.0)
            .fitness_objective(FitnessObjective::Minimize)
            .build(knob_score, &mut rng)
            .unwrap();

        population.make_next_generation(&mut rng).unwrap();
        let keys: Vec<f64> = population
            .members()
            .iter()
            .map(|m| m.fitness.unwrap())
            .collect();
        for window in keys.windows(2) {
            prop_assert!(window[0] <= window[1]);
        }
    }
}
