//! Dataset store
//!
//! Holds the people, catalog and interaction records the engine scores
//! against. Datasets are loaded from JSON and validated here; the engine
//! itself assumes its preconditions hold. Nothing is written back to disk.

use crate::constants::{FULL_COMPLETION, MIN_RATING};
use crate::models::{
    Dataset, EntityId, Interaction, Person, RecordInteractionParams, RegisterPersonParams,
};
use anyhow::Context;
use chrono::Utc;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

/// Store-specific errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Person not found: {id}")]
    PersonNotFound { id: EntityId },

    #[error("Item not found: {id}")]
    ItemNotFound { id: EntityId },

    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: EntityId },

    #[error("Rating {rating} out of range for interaction {id} (expected 1-5)")]
    InvalidRating { id: EntityId, rating: u8 },

    #[error("Completion {completion} out of range for interaction {id} (expected 0-100)")]
    InvalidCompletion { id: EntityId, completion: f64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main store interface trait
///
/// Abstracts over where the dataset comes from. Scoring always runs on a
/// [`Dataset`] snapshot so that a call never observes a concurrent mutation.
#[async_trait::async_trait]
pub trait LearningStore: Send + Sync {
    /// Add a new person
    async fn add_person(&mut self, person: Person) -> crate::Result<()>;

    /// Retrieve a person by ID
    async fn get_person(&self, id: &str) -> crate::Result<Option<Person>>;

    /// Record an interaction between a known person and a known item
    async fn record_interaction(&mut self, interaction: Interaction) -> crate::Result<()>;

    /// Copy of the full dataset for scoring
    async fn snapshot(&self) -> crate::Result<Dataset>;
}

/// In-memory store, optionally seeded from a JSON file
#[derive(Debug, Default)]
pub struct MemoryStore {
    dataset: Dataset,

    /// File the dataset was loaded from, if any
    source: Option<PathBuf>,
}

impl MemoryStore {
    /// Wrap a dataset after validating it
    pub fn new(dataset: Dataset) -> Result<Self, StoreError> {
        validate(&dataset)?;
        Ok(Self {
            dataset,
            source: None,
        })
    }

    /// Load and validate a dataset from a JSON file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        tracing::info!("Loading dataset from {}", path.display());
        let start = std::time::Instant::now();

        let content = fs::read_to_string(&path).await?;
        let dataset: Dataset = serde_json::from_str(&content)?;
        validate(&dataset)?;

        tracing::info!(
            "Loaded {} people, {} items, {} interactions in {:?}",
            dataset.people.len(),
            dataset.items.len(),
            dataset.interactions.len(),
            start.elapsed()
        );

        Ok(Self {
            dataset,
            source: Some(path),
        })
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Build a person from onboarding parameters and add it
    pub async fn register(&mut self, params: RegisterPersonParams) -> crate::Result<Person> {
        let email = params
            .email
            .unwrap_or_else(|| default_email(&params.name));
        let person = Person {
            id: format!("user-{}", Uuid::new_v4()),
            name: params.name,
            email,
            learning_style: params.learning_style,
            interests: params.interests,
        };

        self.add_person(person.clone()).await?;
        Ok(person)
    }

    /// Build an interaction from tool parameters and record it
    pub async fn record(&mut self, params: RecordInteractionParams) -> crate::Result<Interaction> {
        let interaction = Interaction {
            id: format!("i-{}", Uuid::new_v4()),
            person_id: params.person_id,
            item_id: params.item_id,
            kind: params.kind,
            rating: params.rating,
            completion_percentage: params.completion_percentage,
            time_spent_minutes: params.time_spent_minutes,
            timestamp: Utc::now(),
        };

        self.record_interaction(interaction.clone()).await?;
        Ok(interaction)
    }
}

#[async_trait::async_trait]
impl LearningStore for MemoryStore {
    async fn add_person(&mut self, person: Person) -> crate::Result<()> {
        if self.dataset.person(&person.id).is_some() {
            return Err(StoreError::DuplicateId {
                kind: "person",
                id: person.id,
            }
            .into());
        }

        tracing::debug!("Adding person {} ({:?})", person.id, person.learning_style);
        self.dataset.people.push(person);
        Ok(())
    }

    async fn get_person(&self, id: &str) -> crate::Result<Option<Person>> {
        Ok(self.dataset.person(id).cloned())
    }

    async fn record_interaction(&mut self, interaction: Interaction) -> crate::Result<()> {
        if self
            .dataset
            .interactions
            .iter()
            .any(|i| i.id == interaction.id)
        {
            return Err(StoreError::DuplicateId {
                kind: "interaction",
                id: interaction.id,
            }
            .into());
        }

        check_interaction(&self.dataset, &interaction)
            .with_context(|| format!("Rejected interaction {}", interaction.id))?;

        tracing::debug!(
            "Recording {:?} of {} by {}",
            interaction.kind,
            interaction.item_id,
            interaction.person_id
        );
        self.dataset.interactions.push(interaction);
        Ok(())
    }

    async fn snapshot(&self) -> crate::Result<Dataset> {
        Ok(self.dataset.clone())
    }
}

/// Check identifiers, references and value ranges of a whole dataset
pub fn validate(dataset: &Dataset) -> Result<(), StoreError> {
    unique_ids("person", dataset.people.iter().map(|p| p.id.as_str()))?;
    unique_ids("item", dataset.items.iter().map(|i| i.id.as_str()))?;
    unique_ids(
        "interaction",
        dataset.interactions.iter().map(|i| i.id.as_str()),
    )?;

    for interaction in &dataset.interactions {
        check_interaction(dataset, interaction)?;
    }
    Ok(())
}

fn unique_ids<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), StoreError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(StoreError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

fn check_interaction(dataset: &Dataset, interaction: &Interaction) -> Result<(), StoreError> {
    if dataset.person(&interaction.person_id).is_none() {
        return Err(StoreError::PersonNotFound {
            id: interaction.person_id.clone(),
        });
    }
    if dataset.item(&interaction.item_id).is_none() {
        return Err(StoreError::ItemNotFound {
            id: interaction.item_id.clone(),
        });
    }
    if let Some(rating) = interaction.rating {
        if !(MIN_RATING..=5).contains(&rating) {
            return Err(StoreError::InvalidRating {
                id: interaction.id.clone(),
                rating,
            });
        }
    }
    let completion = interaction.completion_percentage;
    if !(0.0..=FULL_COMPLETION).contains(&completion) {
        return Err(StoreError::InvalidCompletion {
            id: interaction.id.clone(),
            completion,
        });
    }
    Ok(())
}

fn default_email(name: &str) -> String {
    format!("{}@student.com", name.trim().to_lowercase().replace(' ', "."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, InteractionKind, Item, LearningStyle};
    use tempfile::TempDir;

    fn dataset() -> Dataset {
        let person = Person {
            id: "p1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            learning_style: LearningStyle::Reading,
            interests: vec!["python".to_string()],
        };
        let item = Item {
            id: "c1".to_string(),
            title: "Python".to_string(),
            description: "Intro".to_string(),
            category: "Programming".to_string(),
            difficulty: Difficulty::Beginner,
            tags: vec!["python".to_string()],
            duration_minutes: 120,
        };
        Dataset::new(vec![person], vec![item], Vec::new())
    }

    fn params(rating: Option<u8>, completion: f64) -> RecordInteractionParams {
        RecordInteractionParams {
            person_id: "p1".to_string(),
            item_id: "c1".to_string(),
            kind: InteractionKind::Rated,
            rating,
            completion_percentage: completion,
            time_spent_minutes: 15,
        }
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dataset.json");
        std::fs::write(&path, serde_json::to_string_pretty(&dataset()).unwrap()).unwrap();

        let store = MemoryStore::load(&path).await.unwrap();
        assert_eq!(store.dataset(), &dataset());
        assert_eq!(store.source(), Some(path.as_path()));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = MemoryStore::load(temp_dir.path().join("missing.json")).await;
        assert!(matches!(result, Err(StoreError::Io(_))));
    }

    #[tokio::test]
    async fn test_load_rejects_dangling_reference() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dataset.json");
        let json = r#"{
            "people": [],
            "items": [],
            "interactions": [{
                "id": "i1", "person_id": "ghost", "item_id": "c1",
                "kind": "view", "timestamp": "2024-10-01T00:00:00Z"
            }]
        }"#;
        std::fs::write(&path, json).unwrap();

        let result = MemoryStore::load(&path).await;
        assert!(matches!(result, Err(StoreError::PersonNotFound { .. })));
    }

    #[tokio::test]
    async fn test_record_interaction() {
        let mut store = MemoryStore::new(dataset()).unwrap();

        let interaction = store.record(params(Some(4), 80.0)).await.unwrap();
        assert!(interaction.id.starts_with("i-"));

        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot.interactions, vec![interaction]);
    }

    #[tokio::test]
    async fn test_record_rejects_out_of_range_values() {
        let mut store = MemoryStore::new(dataset()).unwrap();

        assert!(store.record(params(Some(6), 50.0)).await.is_err());
        assert!(store.record(params(Some(0), 50.0)).await.is_err());
        assert!(store.record(params(None, 120.0)).await.is_err());

        let mut unknown_item = params(None, 10.0);
        unknown_item.item_id = "c9".to_string();
        let err = store.record(unknown_item).await.unwrap_err();
        assert!(err
            .downcast_ref::<StoreError>()
            .is_some_and(|e| matches!(e, StoreError::ItemNotFound { .. })));

        assert!(store.snapshot().await.unwrap().interactions.is_empty());
    }

    #[tokio::test]
    async fn test_register_person() {
        let mut store = MemoryStore::default();
        let person = store
            .register(RegisterPersonParams {
                name: "Grace Hopper".to_string(),
                email: None,
                learning_style: LearningStyle::Kinesthetic,
                interests: vec!["compilers".to_string()],
            })
            .await
            .unwrap();

        assert!(person.id.starts_with("user-"));
        assert_eq!(person.email, "grace.hopper@student.com");
        assert_eq!(store.get_person(&person.id).await.unwrap(), Some(person.clone()));
        assert!(store.add_person(person).await.is_err());
    }

    #[test]
    fn test_validate_duplicate_items() {
        let mut data = dataset();
        data.items.push(data.items[0].clone());
        assert!(matches!(
            validate(&data),
            Err(StoreError::DuplicateId { kind: "item", .. })
        ));
    }

    #[test]
    fn test_snapshot_blocking() {
        let store = MemoryStore::new(dataset()).unwrap();
        let snapshot = tokio_test::block_on(store.snapshot()).unwrap();
        assert_eq!(snapshot.people.len(), 1);
    }
}
