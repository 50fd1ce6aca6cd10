//! MCP tool surface for the recommendation engine
//!
//! Each tool takes a fresh snapshot of the store and runs the engine on it,
//! so scoring never races with a concurrent `record_interaction`.

use crate::metrics::MetricSet;
use crate::models::{
    CompareParams, Dataset, EvaluateParams, RecommendParams, Recommendation,
    RecordInteractionParams, RegisterPersonParams, Strategy,
};
use crate::storage::{LearningStore, MemoryStore};
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{CallToolResult, Content, ErrorData as McpError, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;

/// MCP server exposing recommend/evaluate/compare plus onboarding tools
#[derive(Clone)]
pub struct LearnRecServer {
    store: Arc<RwLock<MemoryStore>>,
    tool_router: ToolRouter<Self>,
}

#[derive(Serialize)]
struct RecommendResponse<'a> {
    person_id: &'a str,
    strategy: Strategy,
    total_count: usize,
    recommendations: Vec<Recommendation>,
}

#[derive(Serialize)]
struct EvaluateResponse<'a> {
    person_id: &'a str,
    metrics: MetricSet,
    overall: f64,
}

#[tool_router]
impl LearnRecServer {
    pub fn new(store: MemoryStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            tool_router: Self::tool_router(),
        }
    }

    async fn snapshot(&self) -> Result<Dataset, McpError> {
        self.store
            .read()
            .await
            .snapshot()
            .await
            .map_err(|e| McpError::internal_error(e.to_string(), None))
    }

    #[tool(
        name = "learnrec_recommend",
        description = "Recommend catalog items for a learner using the collaborative, content_based or hybrid strategy"
    )]
    async fn recommend(
        &self,
        Parameters(params): Parameters<RecommendParams>,
    ) -> Result<CallToolResult, McpError> {
        let dataset = self.snapshot().await?;
        require_person(&dataset, &params.person_id)?;

        let recommendations = dataset.engine().recommend(
            params.strategy,
            &params.person_id,
            params.count,
        );
        tracing::info!(
            "Produced {} {} recommendations for {}",
            recommendations.len(),
            params.strategy,
            params.person_id
        );

        json_result(&RecommendResponse {
            person_id: &params.person_id,
            strategy: params.strategy,
            total_count: recommendations.len(),
            recommendations,
        })
    }

    #[tool(
        name = "learnrec_evaluate",
        description = "Compute accuracy, precision, recall, coverage and diversity of a recommendation list against the learner's own ratings"
    )]
    async fn evaluate(
        &self,
        Parameters(params): Parameters<EvaluateParams>,
    ) -> Result<CallToolResult, McpError> {
        let dataset = self.snapshot().await?;

        let mut recommendations = Vec::with_capacity(params.item_ids.len());
        for (position, item_id) in params.item_ids.iter().enumerate() {
            let Some(item) = dataset.item(item_id) else {
                tracing::warn!("Evaluate called with unknown item {}", item_id);
                return Err(McpError::invalid_params(
                    format!("Unknown item: {item_id}"),
                    None,
                ));
            };
            recommendations.push(Recommendation {
                item: item.clone(),
                score: params.scores.get(position).copied().unwrap_or(0.0),
                strategy: Strategy::Hybrid,
                reasoning: String::new(),
            });
        }

        let metrics = dataset
            .engine()
            .evaluate(&params.person_id, &recommendations);

        json_result(&EvaluateResponse {
            person_id: &params.person_id,
            metrics,
            overall: metrics.overall(),
        })
    }

    #[tool(
        name = "learnrec_compare",
        description = "Run all three strategies for a learner and report each list with its metrics"
    )]
    async fn compare(
        &self,
        Parameters(params): Parameters<CompareParams>,
    ) -> Result<CallToolResult, McpError> {
        let dataset = self.snapshot().await?;
        require_person(&dataset, &params.person_id)?;

        let reports = dataset.engine().compare(&params.person_id, params.count);
        json_result(&reports)
    }

    #[tool(
        name = "learnrec_register_person",
        description = "Register a new learner with a learning style and declared interests"
    )]
    async fn register_person(
        &self,
        Parameters(params): Parameters<RegisterPersonParams>,
    ) -> Result<CallToolResult, McpError> {
        if params.name.trim().is_empty() {
            return Err(McpError::invalid_params("Name must not be empty", None));
        }

        let person = self
            .store
            .write()
            .await
            .register(params)
            .await
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        tracing::info!("Registered learner {}", person.id);
        json_result(&person)
    }

    #[tool(
        name = "learnrec_record_interaction",
        description = "Record a learner's engagement with a catalog item (rating 1-5, completion 0-100)"
    )]
    async fn record_interaction(
        &self,
        Parameters(params): Parameters<RecordInteractionParams>,
    ) -> Result<CallToolResult, McpError> {
        let interaction = self
            .store
            .write()
            .await
            .record(params)
            .await
            .map_err(|e| {
                tracing::warn!("Rejected interaction: {:#}", e);
                McpError::invalid_params(format!("{e:#}"), None)
            })?;

        json_result(&interaction)
    }
}

#[tool_handler]
impl ServerHandler for LearnRecServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Learning content recommendations. Use learnrec_recommend for ranked suggestions, \
                 learnrec_compare to see every strategy side by side, and learnrec_evaluate to \
                 score a list against a learner's ratings."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Accept anyone with a profile or at least one interaction
fn require_person(dataset: &Dataset, person_id: &str) -> Result<(), McpError> {
    let known = dataset.person(person_id).is_some()
        || dataset.interactions.iter().any(|i| i.person_id == person_id);
    if !known {
        tracing::warn!("Unknown learner {}", person_id);
        return Err(McpError::invalid_params(
            format!("Unknown person: {person_id}"),
            None,
        ));
    }
    Ok(())
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}
