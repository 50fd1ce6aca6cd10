//! Recommendation scoring engine
//!
//! Three strategies rank unseen catalog items for one target person:
//! collaborative filtering over neighbour affinities, content-based scoring
//! over tags and history, and a linear hybrid of the two.
//!
//! Every call is a pure function of the borrowed dataset. Intermediate
//! structures such as the interaction matrix are rebuilt per call.

use crate::constants::{
    CATEGORY_MATCH_BONUS, COMPLETION_THRESHOLD, CONTENT_SCORE_CAP, DIFFICULTY_PROXIMITY_BONUS,
    DIFFICULTY_PROXIMITY_TIERS, HISTORY_TAG_WEIGHT, HYBRID_CANDIDATE_FACTOR,
    HYBRID_WEIGHT_COLLABORATIVE, HYBRID_WEIGHT_CONTENT, INTEREST_MATCH_WEIGHT, MIN_SHARED_ITEMS,
    REASONING_INTEREST_COUNT,
};
use crate::matrix::{cosine_similarity, InteractionMatrix};
use crate::models::{Difficulty, Interaction, Item, Person, Recommendation, Strategy};
use std::collections::{HashMap, HashSet};

/// Read-only view over people, catalog and interactions
#[derive(Debug, Clone, Copy)]
pub struct RecommendationEngine<'a> {
    pub(crate) people: &'a [Person],
    pub(crate) items: &'a [Item],
    pub(crate) interactions: &'a [Interaction],
}

impl<'a> RecommendationEngine<'a> {
    pub fn new(people: &'a [Person], items: &'a [Item], interactions: &'a [Interaction]) -> Self {
        Self {
            people,
            items,
            interactions,
        }
    }

    /// Produce recommendations with the given strategy
    pub fn recommend(&self, strategy: Strategy, person_id: &str, n: usize) -> Vec<Recommendation> {
        match strategy {
            Strategy::Collaborative => self.collaborative(person_id, n),
            Strategy::ContentBased => self.content_based(person_id, n),
            Strategy::Hybrid => self.hybrid(person_id, n),
        }
    }

    /// Rank items by the affinities of similar people.
    ///
    /// A person without any recorded affinity gets the content-based list
    /// instead, returned as is.
    pub fn collaborative(&self, person_id: &str, n: usize) -> Vec<Recommendation> {
        let matrix = InteractionMatrix::build(self.interactions);

        let target = match matrix.row(person_id) {
            Some(row) if !row.is_empty() => row,
            _ => {
                tracing::debug!(
                    "No affinities for {}, falling back to content-based scoring",
                    person_id
                );
                return self.content_based(person_id, n);
            }
        };

        // Step 1: find neighbours with positive similarity over co-rated items
        let mut neighbours: Vec<(&str, f64)> = Vec::new();
        for person in self.people.iter().filter(|p| p.id != person_id) {
            let Some(row) = matrix.row(&person.id) else {
                continue;
            };
            if row.is_empty() {
                continue;
            }

            let (ours, theirs): (Vec<f64>, Vec<f64>) = target
                .iter()
                .filter_map(|(item_id, affinity)| {
                    row.get(item_id).map(|other| (*affinity, *other))
                })
                .unzip();

            if ours.len() < MIN_SHARED_ITEMS {
                continue;
            }

            let similarity = cosine_similarity(&ours, &theirs);
            if similarity > 0.0 {
                neighbours.push((person.id.as_str(), similarity));
            }
        }

        tracing::debug!(
            "Found {} similar learners for {}",
            neighbours.len(),
            person_id
        );

        // Step 2: similarity-weighted average of neighbour affinities
        let mut predictions: HashMap<&str, (f64, f64)> = HashMap::new();
        for (neighbour_id, similarity) in &neighbours {
            let Some(row) = matrix.row(neighbour_id) else {
                continue;
            };
            for (item_id, affinity) in row {
                if target.contains_key(item_id) {
                    continue;
                }
                let (weighted, weight) = predictions.entry(*item_id).or_insert((0.0, 0.0));
                *weighted += similarity * affinity;
                *weight += similarity;
            }
        }

        let reasoning = format!(
            "Based on similar learners' preferences ({} similar learners found)",
            neighbours.len()
        );

        let recommendations = predictions
            .into_iter()
            .filter(|(_, (_, weight))| *weight > 0.0)
            .filter_map(|(item_id, (weighted, weight))| {
                let item = self.item(item_id)?;
                Some(Recommendation {
                    item: item.clone(),
                    score: weighted / weight,
                    strategy: Strategy::Collaborative,
                    reasoning: reasoning.clone(),
                })
            })
            .collect();

        rank(recommendations, n)
    }

    /// Rank unseen items by overlap with the person's interests and history.
    ///
    /// Unknown people get an empty list.
    pub fn content_based(&self, person_id: &str, n: usize) -> Vec<Recommendation> {
        let Some(person) = self.person(person_id) else {
            tracing::debug!("No profile for {}, nothing to recommend", person_id);
            return Vec::new();
        };

        let history: Vec<&Interaction> = self
            .interactions
            .iter()
            .filter(|i| i.person_id == person_id)
            .collect();
        let seen: HashSet<&str> = history.iter().map(|i| i.item_id.as_str()).collect();

        // Items completed past the threshold; repeated interactions count repeatedly
        let completed: Vec<&Item> = history
            .iter()
            .filter(|i| i.completion_percentage > COMPLETION_THRESHOLD)
            .filter_map(|i| self.item(&i.item_id))
            .collect();

        let level = mean_level(&completed);

        let reasoning = format!(
            "Matches your interests: {}",
            person
                .interests
                .iter()
                .take(REASONING_INTEREST_COUNT)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );

        let recommendations: Vec<Recommendation> = self
            .items
            .iter()
            .filter(|item| !seen.contains(item.id.as_str()))
            .map(|item| Recommendation {
                item: item.clone(),
                score: content_score(person, item, &completed, level),
                strategy: Strategy::ContentBased,
                reasoning: reasoning.clone(),
            })
            .collect();

        tracing::debug!(
            "Scored {} unseen items for {} ({} completed in history)",
            recommendations.len(),
            person_id,
            completed.len()
        );

        rank(recommendations, n)
    }

    /// Blend collaborative and content-based candidates linearly.
    ///
    /// Items found by only one source keep only that source's weighted share.
    pub fn hybrid(&self, person_id: &str, n: usize) -> Vec<Recommendation> {
        let pool = n.saturating_mul(HYBRID_CANDIDATE_FACTOR);
        let collaborative = self.collaborative(person_id, pool);
        let content = self.content_based(person_id, pool);

        struct Blend {
            item: Item,
            score: f64,
            sources: Vec<&'static str>,
        }

        let mut blended: Vec<Blend> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        let sources = [
            (collaborative, HYBRID_WEIGHT_COLLABORATIVE, "collaborative"),
            (content, HYBRID_WEIGHT_CONTENT, "content-based"),
        ];
        for (recommendations, weight, source) in sources {
            for rec in recommendations {
                match index.get(&rec.item.id) {
                    Some(&slot) => {
                        blended[slot].score += rec.score * weight;
                        blended[slot].sources.push(source);
                    }
                    None => {
                        index.insert(rec.item.id.clone(), blended.len());
                        blended.push(Blend {
                            item: rec.item,
                            score: rec.score * weight,
                            sources: vec![source],
                        });
                    }
                }
            }
        }

        let recommendations = blended
            .into_iter()
            .map(|blend| Recommendation {
                item: blend.item,
                score: blend.score,
                strategy: Strategy::Hybrid,
                reasoning: format!(
                    "Combined approach using {} filtering",
                    blend.sources.join(" and ")
                ),
            })
            .collect();

        rank(recommendations, n)
    }

    pub(crate) fn person(&self, id: &str) -> Option<&'a Person> {
        self.people.iter().find(|p| p.id == id)
    }

    pub(crate) fn item(&self, id: &str) -> Option<&'a Item> {
        self.items.iter().find(|i| i.id == id)
    }
}

/// Composite content score of one candidate, capped at 1.0
fn content_score(person: &Person, candidate: &Item, completed: &[&Item], level: f64) -> f64 {
    let interest_matches = person
        .interests
        .iter()
        .filter(|interest| candidate.has_tag(interest))
        .count();
    let mut score = interest_matches as f64 * INTEREST_MATCH_WEIGHT;

    for past in completed {
        let shared_tags = candidate.tags.iter().filter(|tag| past.has_tag(tag)).count();
        score += shared_tags as f64 * HISTORY_TAG_WEIGHT;

        if past.category == candidate.category {
            score += CATEGORY_MATCH_BONUS;
        }
    }

    if (candidate.difficulty.tier() - level).abs() <= DIFFICULTY_PROXIMITY_TIERS {
        score += DIFFICULTY_PROXIMITY_BONUS;
    }

    score.min(CONTENT_SCORE_CAP)
}

/// Mean difficulty tier of completed items, beginner when there are none
fn mean_level(completed: &[&Item]) -> f64 {
    if completed.is_empty() {
        return Difficulty::Beginner.tier();
    }
    completed.iter().map(|item| item.difficulty.tier()).sum::<f64>() / completed.len() as f64
}

/// Sort by descending score, ties by ascending item id, and keep the first `n`
pub(crate) fn rank(mut recommendations: Vec<Recommendation>, n: usize) -> Vec<Recommendation> {
    recommendations.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.item.id.cmp(&b.item.id))
    });
    recommendations.truncate(n);
    recommendations
}
