pub mod embedding_model;
pub mod evaluation_service;
pub mod feedback;
pub mod inference_client;
pub mod interview_service;
pub mod keyword_scorer;
pub mod question_service;
pub mod response_parser;
pub mod strategy;
