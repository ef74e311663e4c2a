//! Socratic Tutor：以提问引导学习，并推进学习阶段

use rand::rngs::StdRng;
use rand::Rng;
use serde_json::{json, Value};

use crate::core::{
    Agent, AgentContext, AgentResponse, AgentType, ConversationHistory, ConversationMessage, Result,
};
use crate::schemas::LEARNING_PHASES;

const QUESTIONS: [&str; 5] = [
    "Why do you think that is the case?",
    "Can you provide an example to support your answer?",
    "What would happen if we approached this differently?",
    "How does this relate to what we learned earlier?",
    "What assumptions are you making here?",
];

pub const TUTOR_POINTS: u64 = 5;
/// 每提出这么多问题进入下一阶段（停在最后一个阶段）
pub const QUESTIONS_PER_PHASE: u64 = 5;

pub struct SocraticTutorAgent {
    agent_type: AgentType,
    rng: StdRng,
    conversation: ConversationHistory,
    questions_asked: u64,
    current_phase: usize,
}

impl SocraticTutorAgent {
    /// 供注册表使用的构造函数
    pub fn boxed(agent_type: AgentType, rng: StdRng) -> Box<dyn Agent> {
        Box::new(Self::new(agent_type, rng))
    }

    pub fn new(agent_type: AgentType, rng: StdRng) -> Self {
        Self {
            agent_type,
            rng,
            conversation: ConversationHistory::new(),
            questions_asked: 0,
            current_phase: 0,
        }
    }

    pub fn questions() -> &'static [&'static str] {
        &QUESTIONS
    }

    pub fn phase(&self) -> &'static str {
        LEARNING_PHASES[self.current_phase]
    }

    pub fn questions_asked(&self) -> u64 {
        self.questions_asked
    }

    fn next_question(&mut self) -> &'static str {
        QUESTIONS[self.rng.gen_range(0..QUESTIONS.len())]
    }

    fn advance_phase(&mut self) {
        if self.questions_asked % QUESTIONS_PER_PHASE == 0 && self.current_phase + 1 < LEARNING_PHASES.len() {
            self.current_phase += 1;
            tracing::debug!(phase = self.phase(), "tutor advanced learning phase");
        }
    }
}

impl Agent for SocraticTutorAgent {
    fn agent_type(&self) -> AgentType {
        self.agent_type
    }

    fn process_input(&mut self, user_input: &str, _context: &AgentContext) -> Result<AgentResponse> {
        self.add_to_history(ConversationMessage::user(user_input));

        let message = self.next_question();
        let response = AgentResponse::new(message, self.agent_type)
            .with_points(TUTOR_POINTS)
            .with_metadata("phase", self.phase())
            .with_metadata("questions_asked", self.questions_asked);

        self.add_to_history(ConversationMessage::assistant(message));
        self.questions_asked += 1;
        self.advance_phase();

        Ok(response)
    }

    fn info(&self) -> Value {
        json!({
            "name": "Socratic Tutor",
            "type": self.agent_type,
            "description": "Guides learning through thoughtful questions",
            "phase": self.phase(),
            "questions_asked": self.questions_asked,
        })
    }

    fn conversation(&self) -> &ConversationHistory {
        &self.conversation
    }

    fn conversation_mut(&mut self) -> &mut ConversationHistory {
        &mut self.conversation
    }
}
