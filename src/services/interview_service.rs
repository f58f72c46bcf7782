use crate::models::interview::{
    EvaluationRequest, EvaluationResult, GenerationRequest, QuestionResult,
};
use crate::services::evaluation_service::AnswerEvaluator;
use crate::services::question_service::QuestionGenerator;

/// Operations exposed to the HTTP layer. Both always produce a result.
#[derive(Clone)]
pub struct InterviewService {
    questions: QuestionGenerator,
    evaluator: AnswerEvaluator,
}

impl InterviewService {
    pub fn new(questions: QuestionGenerator, evaluator: AnswerEvaluator) -> Self {
        Self {
            questions,
            evaluator,
        }
    }

    pub fn evaluator(&self) -> &AnswerEvaluator {
        &self.evaluator
    }

    pub async fn start_interview(&self, req: &GenerationRequest) -> QuestionResult {
        tracing::info!(
            topic = %req.topic,
            sub_topic = %req.sub_topic,
            difficulty = req.difficulty_label(),
            "Generating interview question"
        );
        self.questions.generate(req).await
    }

    pub async fn evaluate_answer(&self, req: EvaluationRequest) -> EvaluationResult {
        let assessment = self
            .evaluator
            .evaluate(&req.user_answer, &req.ideal_answer)
            .await;
        tracing::info!(
            score = assessment.score,
            method = ?assessment.method,
            "Answer evaluated"
        );
        assessment.into_result(req.ideal_answer)
    }
}
