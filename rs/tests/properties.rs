//! Property-based tests for the scoring engine using proptest

use chrono::{TimeZone, Utc};
use learnrec::{
    cosine_similarity, Dataset, Difficulty, Interaction, InteractionKind, Item, LearningStyle,
    Person, Recommendation,
};
use proptest::prelude::*;
use std::collections::HashSet;

const TAGS: [&str; 6] = ["python", "data", "web", "design", "ai", "mobile"];
const CATEGORIES: [&str; 3] = ["Programming", "Data Science", "Design"];

fn difficulty_strategy() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Beginner),
        Just(Difficulty::Intermediate),
        Just(Difficulty::Advanced),
    ]
}

fn tags_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::sample::subsequence(TAGS.to_vec(), 0..=3)
        .prop_map(|tags| tags.into_iter().map(String::from).collect())
}

fn item_strategy() -> impl Strategy<Value = (usize, Difficulty, Vec<String>)> {
    (0..CATEGORIES.len(), difficulty_strategy(), tags_strategy())
}

/// (person index, item index, rating, completion)
fn interaction_strategy() -> impl Strategy<Value = (usize, usize, Option<u8>, u8)> {
    (0..5usize, 0..8usize, prop::option::of(1u8..=5), 0u8..=100)
}

/// Generate small but realistic datasets
fn dataset_strategy() -> impl Strategy<Value = Dataset> {
    (
        prop::collection::vec(tags_strategy(), 1..5),
        prop::collection::vec(item_strategy(), 1..8),
        prop::collection::vec(interaction_strategy(), 0..25),
    )
        .prop_map(|(interests, items, interactions)| {
            let people: Vec<Person> = interests
                .into_iter()
                .enumerate()
                .map(|(n, interests)| Person {
                    id: format!("p{n}"),
                    name: format!("Person {n}"),
                    email: format!("p{n}@example.com"),
                    learning_style: LearningStyle::Visual,
                    interests,
                })
                .collect();

            let items: Vec<Item> = items
                .into_iter()
                .enumerate()
                .map(|(n, (category, difficulty, tags))| Item {
                    id: format!("c{n}"),
                    title: format!("Course {n}"),
                    description: String::new(),
                    category: CATEGORIES[category].to_string(),
                    difficulty,
                    tags,
                    duration_minutes: 60,
                })
                .collect();

            let timestamp = Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap();
            let interactions: Vec<Interaction> = interactions
                .into_iter()
                .filter(|(person, item, _, _)| *person < people.len() && *item < items.len())
                .enumerate()
                .map(|(n, (person, item, rating, completion))| Interaction {
                    id: format!("i{n}"),
                    person_id: format!("p{person}"),
                    item_id: format!("c{item}"),
                    kind: InteractionKind::Viewed,
                    rating,
                    completion_percentage: f64::from(completion),
                    time_spent_minutes: 10,
                    timestamp,
                })
                .collect();

            Dataset::new(people, items, interactions)
        })
}

fn is_sorted(recs: &[Recommendation]) -> bool {
    recs.windows(2).all(|w| w[0].score >= w[1].score)
}

fn is_rounded(value: f64) -> bool {
    ((value * 100.0).round() / 100.0 - value).abs() < 1e-12
}

proptest! {
    /// Cosine similarity stays within [-1, 1], and is 0 for zero vectors
    #[test]
    fn prop_cosine_bounded(
        pairs in prop::collection::vec((-5.0f64..5.0, -5.0f64..5.0), 1..10)
    ) {
        let (a, b): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        let similarity = cosine_similarity(&a, &b);
        prop_assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(&similarity));

        let zeros = vec![0.0; a.len()];
        prop_assert_eq!(cosine_similarity(&a, &zeros), 0.0);
    }

    /// Every strategy returns at most n items in non-increasing score order
    #[test]
    fn prop_results_bounded_and_sorted(dataset in dataset_strategy(), n in 0usize..6) {
        let engine = dataset.engine();
        for person in &dataset.people {
            for strategy in learnrec::Strategy::ALL {
                let recs = engine.recommend(strategy, &person.id, n);
                prop_assert!(recs.len() <= n);
                prop_assert!(is_sorted(&recs));
            }
        }
    }

    /// Neither scorer suggests something the person already engaged with
    #[test]
    fn prop_scorers_exclude_known_items(dataset in dataset_strategy()) {
        let engine = dataset.engine();
        for person in &dataset.people {
            let seen: HashSet<&str> = dataset
                .interactions
                .iter()
                .filter(|i| i.person_id == person.id)
                .map(|i| i.item_id.as_str())
                .collect();

            for rec in engine.content_based(&person.id, 10) {
                prop_assert!(!seen.contains(rec.item.id.as_str()));
                prop_assert!(rec.score <= 1.0);
            }
            // Affinity rows hold exactly the interacted items
            for rec in engine.collaborative(&person.id, 10) {
                prop_assert!(!seen.contains(rec.item.id.as_str()));
            }
        }
    }

    /// Items found by both sources blend as 0.6 * collaborative + 0.4 * content
    #[test]
    fn prop_hybrid_blend(dataset in dataset_strategy(), n in 1usize..5) {
        let engine = dataset.engine();
        for person in &dataset.people {
            let collaborative = engine.collaborative(&person.id, n * 2);
            let content = engine.content_based(&person.id, n * 2);

            for rec in engine.hybrid(&person.id, n) {
                let c = collaborative.iter().find(|r| r.item.id == rec.item.id).map(|r| r.score);
                let t = content.iter().find(|r| r.item.id == rec.item.id).map(|r| r.score);
                let expected = 0.6 * c.unwrap_or(0.0) + 0.4 * t.unwrap_or(0.0);
                prop_assert!(c.is_some() || t.is_some());
                prop_assert!((rec.score - expected).abs() < 1e-9);
            }
        }
    }

    /// Metrics are rounded to two decimals and bounded for real lists
    #[test]
    fn prop_metrics_rounded(dataset in dataset_strategy(), n in 0usize..6) {
        let engine = dataset.engine();
        for person in &dataset.people {
            let recs = engine.content_based(&person.id, n);
            let metrics = engine.evaluate(&person.id, &recs);
            for value in [
                metrics.accuracy,
                metrics.precision,
                metrics.recall,
                metrics.coverage,
                metrics.diversity,
            ] {
                prop_assert!(is_rounded(value));
                prop_assert!((0.0..=1.0).contains(&value));
            }

            let empty = engine.evaluate(&person.id, &[]);
            prop_assert_eq!(empty.precision, 0.0);
            prop_assert_eq!(empty.recall, 0.0);
        }
    }
}
