//! Core data models for the learnrec engine
//!
//! People, catalog items and interaction records are read-only inputs owned by
//! the caller. The engine borrows them for the duration of a scoring call.

use crate::engine::RecommendationEngine;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for people, items and interactions
pub type EntityId = String;

/// Preferred way of learning, captured during onboarding
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LearningStyle {
    Visual,
    Auditory,
    Kinesthetic,
    Reading,
}

/// A learner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    pub id: EntityId,

    /// Display name
    pub name: String,

    /// Contact handle
    pub email: String,

    pub learning_style: LearningStyle,

    /// Declared interest tags; order carries no meaning
    pub interests: Vec<String>,
}

/// Ordered difficulty tier of a catalog item
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Numeric tier: beginner = 1, intermediate = 2, advanced = 3
    pub fn tier(self) -> f64 {
        match self {
            Difficulty::Beginner => 1.0,
            Difficulty::Intermediate => 2.0,
            Difficulty::Advanced => 3.0,
        }
    }
}

/// A piece of learning content in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: EntityId,
    pub title: String,
    pub description: String,

    /// Single category label, used for coverage and category matching
    pub category: String,

    pub difficulty: Difficulty,

    /// Descriptive tags matched against interests and history
    pub tags: Vec<String>,

    pub duration_minutes: u32,
}

impl Item {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Kind of engagement recorded. Informational only; scoring reads the
/// rating and completion fields instead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    #[serde(alias = "view")]
    Viewed,
    #[serde(alias = "complete")]
    Completed,
    #[serde(alias = "rate")]
    Rated,
    #[serde(alias = "bookmark")]
    Bookmarked,
}

/// One recorded engagement between a person and an item
///
/// Preconditions (checked by the store, not by the engine): `rating` is in
/// `1..=5` and `completion_percentage` is in `0..=100`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    pub id: EntityId,
    pub person_id: EntityId,
    pub item_id: EntityId,
    pub kind: InteractionKind,

    #[serde(default)]
    pub rating: Option<u8>,

    #[serde(default)]
    pub completion_percentage: f64,

    #[serde(default)]
    pub time_spent_minutes: u32,

    pub timestamp: DateTime<Utc>,
}

/// Scoring strategy that produced a recommendation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Collaborative,
    ContentBased,
    #[default]
    Hybrid,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::Collaborative,
        Strategy::ContentBased,
        Strategy::Hybrid,
    ];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Collaborative => "collaborative",
            Strategy::ContentBased => "content_based",
            Strategy::Hybrid => "hybrid",
        };
        f.write_str(name)
    }
}

/// A ranked suggestion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub item: Item,

    /// Engine-internal score. Content and hybrid scores stay within 0.0..=1.0,
    /// collaborative scores are predicted affinities.
    pub score: f64,

    pub strategy: Strategy,

    /// Short human-readable justification
    pub reasoning: String,
}

/// The three read-only collections the engine works over
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

impl Dataset {
    pub fn new(people: Vec<Person>, items: Vec<Item>, interactions: Vec<Interaction>) -> Self {
        Self {
            people,
            items,
            interactions,
        }
    }

    /// Borrow the dataset as a scoring engine
    pub fn engine(&self) -> RecommendationEngine<'_> {
        RecommendationEngine::new(&self.people, &self.items, &self.interactions)
    }

    pub fn person(&self, id: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }
}

// MCP Tool Parameter Structs

/// Parameters for producing recommendations
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RecommendParams {
    /// Identifier of the learner to recommend for
    pub person_id: EntityId,
    /// Scoring strategy: collaborative, content_based or hybrid
    #[serde(default)]
    pub strategy: Strategy,
    /// Maximum number of recommendations to return
    #[serde(default = "default_count")]
    pub count: usize,
}

/// Parameters for evaluating an arbitrary recommendation list
#[derive(Debug, Deserialize, JsonSchema)]
pub struct EvaluateParams {
    /// Identifier of the learner whose positive ratings are the ground truth
    pub person_id: EntityId,
    /// Recommended item identifiers, best first
    pub item_ids: Vec<EntityId>,
    /// Scores matching `item_ids` position by position (defaults to 0.0)
    #[serde(default)]
    pub scores: Vec<f64>,
}

/// Parameters for comparing all strategies side by side
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CompareParams {
    /// Identifier of the learner to compare strategies for
    pub person_id: EntityId,
    /// Number of recommendations per strategy
    #[serde(default = "default_count")]
    pub count: usize,
}

/// Parameters for onboarding a new learner
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RegisterPersonParams {
    /// Display name
    pub name: String,
    /// Contact handle; derived from the name when omitted
    #[serde(default)]
    pub email: Option<String>,
    /// Preferred learning style
    pub learning_style: LearningStyle,
    /// Declared interest tags
    pub interests: Vec<String>,
}

/// Parameters for recording an engagement with a catalog item
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RecordInteractionParams {
    /// Learner identifier
    pub person_id: EntityId,
    /// Catalog item identifier
    pub item_id: EntityId,
    /// viewed, completed, rated or bookmarked
    pub kind: InteractionKind,
    /// Optional rating from 1 to 5
    #[serde(default)]
    pub rating: Option<u8>,
    /// Completion percentage from 0 to 100
    #[serde(default)]
    pub completion_percentage: f64,
    /// Minutes spent on the item
    #[serde(default)]
    pub time_spent_minutes: u32,
}

fn default_count() -> usize {
    crate::constants::DEFAULT_RESULT_COUNT
}
