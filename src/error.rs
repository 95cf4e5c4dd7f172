//! Error types for speciate
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Top-level error type for evolution operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvolutionError {
    /// Invalid engine configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Externally supplied fitness values do not cover the member list
    #[error("Fitness value count mismatch: expected {expected}, got {actual}")]
    FitnessCountMismatch { expected: usize, actual: usize },

    /// An organism's genotype is missing a value for a declared gene
    #[error("Genotype is missing a value for declared gene `{0}`")]
    IncompleteGenotype(String),

    /// The external fitness evaluator failed
    #[error("Scoring failed: {0}")]
    Scoring(String),

    /// No structurally valid organism could be constructed within the retry cap
    #[error("No valid organism constructed after {attempts} attempts")]
    ConstructionRetriesExhausted { attempts: usize },

    /// Empty population
    #[error("Empty population")]
    EmptyPopulation,
}

/// Result type alias for evolution operations
pub type EvoResult<T> = Result<T, EvolutionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let err = EvolutionError::Configuration("population size must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: population size must be positive"
        );
    }

    #[test]
    fn test_fitness_count_mismatch_display() {
        let err = EvolutionError::FitnessCountMismatch {
            expected: 10,
            actual: 7,
        };
        assert_eq!(
            err.to_string(),
            "Fitness value count mismatch: expected 10, got 7"
        );
    }

    #[test]
    fn test_incomplete_genotype_display() {
        let err = EvolutionError::IncompleteGenotype("weight".to_string());
        assert_eq!(
            err.to_string(),
            "Genotype is missing a value for declared gene `weight`"
        );
    }

    #[test]
    fn test_construction_retries_display() {
        let err = EvolutionError::ConstructionRetriesExhausted { attempts: 100 };
        assert_eq!(
            err.to_string(),
            "No valid organism constructed after 100 attempts"
        );
    }
}
