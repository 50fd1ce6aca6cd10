//! Recommendation quality metrics
//!
//! Lists are scored against the same person's own positive ratings. Items a
//! person already interacted with are excluded from every scorer, so precision
//! and recall tend to be low for any produced list; that is expected.

use crate::constants::{DIVERSITY_PENALTY, DIVERSITY_SCORE_THRESHOLD, RELEVANT_RATING_THRESHOLD};
use crate::engine::RecommendationEngine;
use crate::models::{Recommendation, Strategy};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Five quality measures, each rounded to two decimals
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct MetricSet {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub coverage: f64,
    pub diversity: f64,
}

impl MetricSet {
    /// Mean of the five metrics as a percentage
    pub fn overall(&self) -> f64 {
        let sum = self.accuracy + self.precision + self.recall + self.coverage + self.diversity;
        (sum / 5.0 * 100.0).round()
    }
}

/// One strategy's output for a side-by-side comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyReport {
    pub strategy: Strategy,
    pub recommendations: Vec<Recommendation>,
    pub metrics: MetricSet,
    /// Percentage from [`MetricSet::overall`]
    pub overall: f64,
}

impl RecommendationEngine<'_> {
    /// Score a recommendation list against the person's ratings of 4 or 5
    pub fn evaluate(&self, person_id: &str, recommendations: &[Recommendation]) -> MetricSet {
        let relevant: HashSet<&str> = self
            .interactions
            .iter()
            .filter(|i| i.person_id == person_id)
            .filter(|i| i.rating.is_some_and(|r| r >= RELEVANT_RATING_THRESHOLD))
            .map(|i| i.item_id.as_str())
            .collect();

        let recommended: HashSet<&str> = recommendations
            .iter()
            .map(|r| r.item.id.as_str())
            .collect();

        let hits = recommended.intersection(&relevant).count() as f64;

        let precision = ratio(hits, recommended.len());
        let recall = ratio(hits, relevant.len());
        let accuracy = (precision + recall) / 2.0;

        let recommended_categories: HashSet<&str> = recommendations
            .iter()
            .map(|r| r.item.category.as_str())
            .collect();
        let catalog_categories: HashSet<&str> =
            self.items.iter().map(|i| i.category.as_str()).collect();
        let coverage = ratio(
            recommended_categories.len() as f64,
            catalog_categories.len(),
        );

        // Empty lists have no mean score and are never penalised
        let mean_score = if recommendations.is_empty() {
            0.0
        } else {
            recommendations.iter().map(|r| r.score).sum::<f64>() / recommendations.len() as f64
        };
        let diversity = if mean_score > DIVERSITY_SCORE_THRESHOLD {
            1.0 - DIVERSITY_PENALTY
        } else {
            1.0
        };

        tracing::debug!(
            "Evaluated {} recommendations for {}: {} hits against {} relevant items",
            recommendations.len(),
            person_id,
            hits,
            relevant.len()
        );

        MetricSet {
            accuracy: round2(accuracy),
            precision: round2(precision),
            recall: round2(recall),
            coverage: round2(coverage),
            diversity: round2(diversity),
        }
    }

    /// Run every strategy for a person and evaluate each list
    pub fn compare(&self, person_id: &str, n: usize) -> Vec<StrategyReport> {
        Strategy::ALL
            .into_iter()
            .map(|strategy| {
                let recommendations = self.recommend(strategy, person_id, n);
                let metrics = self.evaluate(person_id, &recommendations);
                StrategyReport {
                    strategy,
                    recommendations,
                    metrics,
                    overall: metrics.overall(),
                }
            })
            .collect()
    }
}

fn ratio(numerator: f64, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}

/// Round half away from zero to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
