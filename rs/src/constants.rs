//! Constants for the learnrec scoring engine
//!
//! Weights and thresholds shared by the three scoring strategies and the
//! evaluator.

// Result sizing

/// Number of recommendations produced when the caller does not ask for a count.
pub const DEFAULT_RESULT_COUNT: usize = 5;

/// Multiplier applied to the requested count when the hybrid blender pulls
/// candidates from each source strategy.
pub const HYBRID_CANDIDATE_FACTOR: usize = 2;

// Affinity derivation

/// Highest rating on the rating scale; `affinity = rating / MAX_RATING`.
pub const MAX_RATING: f64 = 5.0;

/// Lowest rating accepted by the store.
pub const MIN_RATING: u8 = 1;

/// Completion percentage of a fully completed item.
pub const FULL_COMPLETION: f64 = 100.0;

// Collaborative filtering

/// Minimum number of co-rated items before a neighbour's similarity is trusted.
pub const MIN_SHARED_ITEMS: usize = 2;

// Content-based scoring

/// Weight per declared interest found in a candidate's tags.
pub const INTEREST_MATCH_WEIGHT: f64 = 0.3;

/// Weight per tag shared between a candidate and a completed history item.
pub const HISTORY_TAG_WEIGHT: f64 = 0.2;

/// Bonus per completed history item in the candidate's category.
pub const CATEGORY_MATCH_BONUS: f64 = 0.15;

/// Bonus when the candidate sits within one tier of the learner's level.
pub const DIFFICULTY_PROXIMITY_BONUS: f64 = 0.2;

/// Maximum tier distance that still earns the proximity bonus.
pub const DIFFICULTY_PROXIMITY_TIERS: f64 = 1.0;

/// Completion percentage an item must exceed to count as history.
pub const COMPLETION_THRESHOLD: f64 = 70.0;

/// Ceiling applied to the composite content score.
pub const CONTENT_SCORE_CAP: f64 = 1.0;

/// Number of declared interests quoted in a content-based justification.
pub const REASONING_INTEREST_COUNT: usize = 3;

// Hybrid blending weights

/// Weight for the collaborative score in the hybrid blend.
pub const HYBRID_WEIGHT_COLLABORATIVE: f64 = 0.6;

/// Weight for the content-based score in the hybrid blend.
pub const HYBRID_WEIGHT_CONTENT: f64 = 0.4;

// Evaluation

/// Minimum rating for an interaction to count as a relevant (positive) signal.
pub const RELEVANT_RATING_THRESHOLD: u8 = 4;

/// Mean recommendation score above which the diversity penalty applies.
pub const DIVERSITY_SCORE_THRESHOLD: f64 = 0.8;

/// Penalty subtracted from diversity when scores are concentrated.
pub const DIVERSITY_PENALTY: f64 = 0.3;
