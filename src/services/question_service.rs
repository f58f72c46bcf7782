use crate::error::EngineError;
use crate::models::interview::{GenerationRequest, QuestionResult};
use crate::services::inference_client::TextGenerator;
use crate::services::response_parser::parse_generated;
use crate::services::strategy::Outcome;
use crate::utils::random::{RandomSource, ThreadRandom};
use crate::utils::time::{Clock, SystemClock};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub const PROMPT_VERBS: [&str; 5] = ["Create", "Generate", "Provide", "Design", "Formulate"];
pub const HISTORY_LIMIT: usize = 5;
pub const TEMPLATE_COUNT: usize = 5;

pub const WARMING_QUESTION: &str =
    "The question generator is warming up. Please try again in a few seconds.";
pub const WARMING_IDEAL_ANSWER: &str =
    "The AI model is still loading. Request a new question shortly to get a freshly generated one.";

/// Where a returned question came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionSource {
    Remote,
    WarmingNotice,
    Template,
}

impl QuestionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionSource::Remote => "remote",
            QuestionSource::WarmingNotice => "warming_notice",
            QuestionSource::Template => "template",
        }
    }
}

/// Most recent questions per (topic, sub-topic), newest last.
#[derive(Debug)]
pub struct RecentQuestions {
    limit: usize,
    entries: HashMap<String, VecDeque<String>>,
}

impl RecentQuestions {
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            entries: HashMap::new(),
        }
    }

    fn key(req: &GenerationRequest) -> String {
        format!(
            "{}\u{1f}{}",
            req.topic.trim().to_lowercase(),
            req.sub_topic.trim().to_lowercase()
        )
    }

    fn normalize(question: &str) -> String {
        question.trim().to_lowercase()
    }

    pub fn recent(&self, req: &GenerationRequest) -> Vec<String> {
        self.entries
            .get(&Self::key(req))
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, req: &GenerationRequest, question: &str) -> bool {
        let needle = Self::normalize(question);
        self.entries
            .get(&Self::key(req))
            .map(|q| q.iter().any(|seen| Self::normalize(seen) == needle))
            .unwrap_or(false)
    }

    pub fn record(&mut self, req: &GenerationRequest, question: &str) {
        let queue = self.entries.entry(Self::key(req)).or_default();
        queue.push_back(question.to_string());
        while queue.len() > self.limit {
            queue.pop_front();
        }
    }
}

#[derive(Clone)]
pub struct QuestionGenerator {
    generator: Arc<dyn TextGenerator>,
    random: Arc<dyn RandomSource>,
    clock: Arc<dyn Clock>,
    history: Arc<Mutex<RecentQuestions>>,
}

impl QuestionGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            random: Arc::new(ThreadRandom),
            clock: Arc::new(SystemClock),
            history: Arc::new(Mutex::new(RecentQuestions::new(HISTORY_LIMIT))),
        }
    }

    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Never fails: remote errors degrade to a warming notice or a template.
    pub async fn generate(&self, req: &GenerationRequest) -> QuestionResult {
        self.generate_with_source(req).await.0
    }

    pub async fn generate_with_source(
        &self,
        req: &GenerationRequest,
    ) -> (QuestionResult, QuestionSource) {
        let (result, source) = match self.try_remote(req).await {
            Outcome::Success(result) => (result, QuestionSource::Remote),
            Outcome::Retryable(reason) => {
                tracing::warn!(
                    topic = %req.topic,
                    sub_topic = %req.sub_topic,
                    reason = %reason,
                    "Question model is warming up, asking caller to retry"
                );
                (warming_notice(), QuestionSource::WarmingNotice)
            }
            Outcome::Fatal(reason) => {
                tracing::warn!(
                    topic = %req.topic,
                    sub_topic = %req.sub_topic,
                    reason = %reason,
                    "Remote question generation failed, using template"
                );
                (self.fallback_question(req), QuestionSource::Template)
            }
        };

        if source != QuestionSource::WarmingNotice {
            self.history
                .lock()
                .expect("question history mutex poisoned")
                .record(req, &result.question);
        }
        tracing::info!(source = source.as_str(), "Interview question ready");
        (result, source)
    }

    async fn try_remote(&self, req: &GenerationRequest) -> Outcome<QuestionResult> {
        let prompt = self.build_prompt(req);
        let text = match self.generator.generate_text(&prompt).await {
            Ok(text) => text,
            Err(e) => return Outcome::from(Err::<QuestionResult, _>(e)),
        };
        let parsed = match parse_generated(&text) {
            Ok(parsed) => parsed,
            Err(e) => return Outcome::Fatal(e),
        };
        if self.is_recent(req, &parsed.question) {
            return Outcome::Fatal(EngineError::MalformedResponse(
                "duplicate of a recent question".to_string(),
            ));
        }
        Outcome::Success(parsed)
    }

    pub fn build_prompt(&self, req: &GenerationRequest) -> String {
        let verb = PROMPT_VERBS[self.random.pick_index(PROMPT_VERBS.len()) % PROMPT_VERBS.len()];
        let seed = self.random.seed();
        let recent = self.recent_questions(req);
        render_prompt(req, verb, seed, &recent)
    }

    /// Canned question picked by the current second.
    pub fn fallback_question(&self, req: &GenerationRequest) -> QuestionResult {
        let index = self.clock.unix_seconds().rem_euclid(TEMPLATE_COUNT as i64) as usize;
        template_question(req, index)
    }

    pub fn recent_questions(&self, req: &GenerationRequest) -> Vec<String> {
        self.history
            .lock()
            .expect("question history mutex poisoned")
            .recent(req)
    }

    fn is_recent(&self, req: &GenerationRequest, question: &str) -> bool {
        self.history
            .lock()
            .expect("question history mutex poisoned")
            .contains(req, question)
    }
}

pub fn render_prompt(req: &GenerationRequest, verb: &str, seed: u32, recent: &[String]) -> String {
    let mut prompt = format!(
        "[INST] {verb} a unique {difficulty}-level interview question about \"{sub_topic}\" \
within the field of {topic}. Variation seed: {seed}. The question must be specific, \
answerable in a few paragraphs, and different from common textbook questions.\n",
        verb = verb,
        difficulty = req.difficulty_label(),
        sub_topic = req.sub_topic,
        topic = req.topic,
        seed = seed,
    );
    if !recent.is_empty() {
        prompt.push_str("Do not repeat any of these recently asked questions:\n");
        for q in recent {
            prompt.push_str("- ");
            prompt.push_str(q);
            prompt.push('\n');
        }
    }
    prompt.push_str(
        "Respond ONLY with a JSON object with exactly two fields: \"question\" (the interview \
question) and \"ideal_answer\" (a concise but complete reference answer). [/INST]",
    );
    prompt
}

pub fn template_question(req: &GenerationRequest, index: usize) -> QuestionResult {
    let topic = req.topic.as_str();
    let sub = req.sub_topic.as_str();
    match index % TEMPLATE_COUNT {
        0 => QuestionResult::new(
            format!(
                "Explain the core principles of {} in {} and describe a situation where you would apply them.",
                sub, topic
            ),
            format!(
                "A strong answer defines {}, explains its key principles within {}, and walks through \
a concrete scenario showing when and why it applies.",
                sub, topic
            ),
        ),
        1 => QuestionResult::new(
            format!(
                "What are the most common challenges when working with {} in {}, and how would you address them?",
                sub, topic
            ),
            format!(
                "A strong answer names typical pitfalls of {} in {} practice, explains their root causes, \
and proposes practical mitigations with examples.",
                sub, topic
            ),
        ),
        2 => QuestionResult::new(
            format!(
                "Compare {} with an alternative approach in {}. What are the trade-offs?",
                sub, topic
            ),
            format!(
                "A strong answer picks a credible alternative to {}, compares them on performance, \
complexity and maintainability within {}, and states when each is preferable.",
                sub, topic
            ),
        ),
        3 => QuestionResult::new(
            format!(
                "Describe a project or problem in {} where you used {}. What decisions did you make and why?",
                topic, sub
            ),
            format!(
                "A strong answer describes a realistic {} problem, explains how {} was applied, \
justifies the key decisions, and reflects on the outcome.",
                topic, sub
            ),
        ),
        _ => QuestionResult::new(
            format!(
                "How would you explain {} to a junior colleague who is new to {}?",
                sub, topic
            ),
            format!(
                "A strong answer explains {} in simple terms, builds from {} fundamentals, \
uses an analogy or small example, and checks for common misconceptions.",
                sub, topic
            ),
        ),
    }
}

pub fn warming_notice() -> QuestionResult {
    QuestionResult::new(WARMING_QUESTION, WARMING_IDEAL_ANSWER)
}
