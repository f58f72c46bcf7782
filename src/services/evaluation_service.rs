use crate::error::EngineError;
use crate::models::interview::Assessment;
use crate::services::embedding_model::{Embedder, EmbeddingModel};
use crate::services::feedback::{rejected, semantic_assessment, NOT_APPLICABLE};
use crate::services::keyword_scorer::fallback_evaluation;
use crate::services::strategy::Outcome;
use crate::utils::similarity::cosine_sim;
use std::sync::Arc;

/// Scores a candidate answer against a reference answer.
///
/// Semantic scoring through the embedding model is tried first; if the model
/// is unavailable or inference fails, the keyword-overlap scorer is used.
#[derive(Clone)]
pub struct AnswerEvaluator {
    model: EmbeddingModel,
}

impl AnswerEvaluator {
    pub fn new(model: EmbeddingModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &EmbeddingModel {
        &self.model
    }

    pub async fn evaluate(&self, user_answer: &str, ideal_answer: &str) -> Assessment {
        if is_blank(user_answer) || is_blank(ideal_answer) || ideal_answer.trim() == NOT_APPLICABLE {
            return rejected();
        }

        match self.score_semantic(user_answer, ideal_answer).await {
            Outcome::Success(assessment) => assessment,
            Outcome::Retryable(reason) | Outcome::Fatal(reason) => {
                tracing::warn!(reason = %reason, "Semantic scoring unavailable, using keyword overlap");
                fallback_evaluation(user_answer, ideal_answer)
            }
        }
    }

    async fn score_semantic(&self, user_answer: &str, ideal_answer: &str) -> Outcome<Assessment> {
        let Some(embedder) = self.model.get_instance().await else {
            let reason = self.model.load_error().unwrap_or_else(|| {
                EngineError::ModelLoadFailure("embedding model unavailable".to_string())
            });
            return Outcome::Fatal(reason);
        };

        let user = user_answer.to_string();
        let ideal = ideal_answer.to_string();
        let similarity = tokio::task::spawn_blocking(move || embed_similarity(embedder, &user, &ideal))
            .await
            .map_err(|e| EngineError::ScoringRuntime(format!("scoring task failed: {}", e)))
            .and_then(|res| res);

        match similarity {
            Ok(similarity) => {
                let assessment = semantic_assessment(similarity);
                tracing::debug!(similarity, score = assessment.score, "Semantic score computed");
                Outcome::Success(assessment)
            }
            Err(e) => Outcome::Fatal(e),
        }
    }
}

fn embed_similarity(embedder: Arc<dyn Embedder>, user: &str, ideal: &str) -> Result<f32, EngineError> {
    let user_vec = embedder
        .embed(user)
        .map_err(|e| EngineError::ScoringRuntime(format!("{:#}", e)))?;
    let ideal_vec = embedder
        .embed(ideal)
        .map_err(|e| EngineError::ScoringRuntime(format!("{:#}", e)))?;
    cosine_sim(&user_vec, &ideal_vec)
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
