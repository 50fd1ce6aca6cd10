//! Person/item affinity matrix and the cosine similarity primitive

use crate::constants::{FULL_COMPLETION, MAX_RATING};
use crate::models::Interaction;
use std::collections::HashMap;

/// Affinities of one person, keyed by item id
pub type AffinityRow<'a> = HashMap<&'a str, f64>;

/// Sparse person -> item -> affinity mapping
///
/// Rebuilt from the interaction list on every scoring call; nothing is cached
/// between calls.
#[derive(Debug, Default)]
pub struct InteractionMatrix<'a> {
    rows: HashMap<&'a str, AffinityRow<'a>>,
}

impl<'a> InteractionMatrix<'a> {
    /// Build the matrix from raw interactions.
    ///
    /// Several interactions for the same (person, item) pair are not merged:
    /// the last one in slice order overwrites earlier ones.
    pub fn build(interactions: &'a [Interaction]) -> Self {
        let mut rows: HashMap<&'a str, AffinityRow<'a>> = HashMap::new();

        for interaction in interactions {
            rows.entry(interaction.person_id.as_str())
                .or_default()
                .insert(interaction.item_id.as_str(), affinity(interaction));
        }

        tracing::debug!(
            "Built interaction matrix: {} people from {} interactions",
            rows.len(),
            interactions.len()
        );

        Self { rows }
    }

    /// Affinity row for a person, if they have any interactions
    pub fn row(&self, person_id: &str) -> Option<&AffinityRow<'a>> {
        self.rows.get(person_id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Derive a [0, 1] affinity from one interaction.
///
/// A rating wins over completion; an interaction with neither still records
/// an affinity of zero.
pub fn affinity(interaction: &Interaction) -> f64 {
    match interaction.rating {
        Some(rating) if rating > 0 => f64::from(rating) / MAX_RATING,
        _ if interaction.completion_percentage > 0.0 => {
            interaction.completion_percentage / FULL_COMPLETION
        }
        _ => 0.0,
    }
}

/// Cosine similarity between two equal-length vectors.
///
/// Returns 0.0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "Vectors must have the same length");

    let dot_product: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
