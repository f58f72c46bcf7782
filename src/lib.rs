pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::error::Result;
use crate::services::{
    embedding_model::{EmbedderLoader, EmbeddingModel, FastEmbedLoader},
    evaluation_service::AnswerEvaluator,
    inference_client::{HfInferenceClient, TextGenerator},
    interview_service::InterviewService,
    question_service::QuestionGenerator,
};
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub interview: InterviewService,
    pub embedding_model: EmbeddingModel,
}

impl AppState {
    pub fn new() -> Result<Self> {
        let config = crate::config::get_config();
        let timeout = Duration::from_secs(config.generation_timeout_secs);
        let http_client = Client::builder().timeout(timeout).build()?;

        let inference = HfInferenceClient::new(
            http_client,
            config.hf_api_key.clone(),
            &config.inference_base_url,
            &config.generation_model_id,
            timeout,
        );
        let loader = FastEmbedLoader::new(config.embedding_cache_dir.as_ref().map(PathBuf::from));

        Ok(Self::from_parts(Arc::new(inference), Arc::new(loader)))
    }

    pub fn from_parts(generator: Arc<dyn TextGenerator>, loader: Arc<dyn EmbedderLoader>) -> Self {
        Self::with_generator(QuestionGenerator::new(generator), loader)
    }

    pub fn with_generator(questions: QuestionGenerator, loader: Arc<dyn EmbedderLoader>) -> Self {
        let embedding_model = EmbeddingModel::new(loader);
        let evaluator = AnswerEvaluator::new(embedding_model.clone());
        Self {
            interview: InterviewService::new(questions, evaluator),
            embedding_model,
        }
    }
}
