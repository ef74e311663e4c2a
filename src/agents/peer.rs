//! Virtual Peer：一起讨论，偶尔故意说错让学习者来纠正

use rand::rngs::StdRng;
use rand::Rng;
use serde_json::{json, Value};

use crate::core::{
    Agent, AgentContext, AgentResponse, AgentType, ConversationHistory, ConversationMessage, Result,
};

const ERROR_LINES: [&str; 3] = [
    "I think we should approach this by ignoring the context entirely.",
    "That's interesting, but I believe the opposite is actually true.",
    "I'm pretty sure that contradicts what we learned earlier.",
];

const AGREEMENT_LINES: [&str; 3] = [
    "That's a great point! I hadn't thought about it that way.",
    "I completely agree with your reasoning.",
    "You're building on that concept really well!",
];

pub const DEFAULT_ERROR_INJECTION_RATE: f64 = 0.3;
/// 故意出错时给更多分（奖励发现错误）
pub const ERROR_POINTS: u64 = 10;
pub const AGREEMENT_POINTS: u64 = 5;

pub struct VirtualPeerAgent {
    agent_type: AgentType,
    rng: StdRng,
    conversation: ConversationHistory,
    error_injection_rate: f64,
}

impl VirtualPeerAgent {
    /// 供注册表使用的构造函数
    pub fn boxed(agent_type: AgentType, rng: StdRng) -> Box<dyn Agent> {
        Box::new(Self::new(agent_type, rng))
    }

    pub fn new(agent_type: AgentType, rng: StdRng) -> Self {
        Self::with_error_rate(agent_type, rng, DEFAULT_ERROR_INJECTION_RATE)
    }

    /// rate 会被夹到 [0, 1]，构造后不可修改
    pub fn with_error_rate(agent_type: AgentType, rng: StdRng, rate: f64) -> Self {
        Self {
            agent_type,
            rng,
            conversation: ConversationHistory::new(),
            error_injection_rate: if rate.is_nan() { DEFAULT_ERROR_INJECTION_RATE } else { rate.clamp(0.0, 1.0) },
        }
    }

    pub fn error_injection_rate(&self) -> f64 {
        self.error_injection_rate
    }

    pub fn error_lines() -> &'static [&'static str] {
        &ERROR_LINES
    }

    pub fn agreement_lines() -> &'static [&'static str] {
        &AGREEMENT_LINES
    }

    fn pick(&mut self, lines: &[&'static str]) -> &'static str {
        lines[self.rng.gen_range(0..lines.len())]
    }
}

impl Agent for VirtualPeerAgent {
    fn agent_type(&self) -> AgentType {
        self.agent_type
    }

    fn process_input(&mut self, user_input: &str, _context: &AgentContext) -> Result<AgentResponse> {
        self.add_to_history(ConversationMessage::user(user_input));

        let should_error = self.rng.gen::<f64>() < self.error_injection_rate;
        let (message, points) = if should_error {
            (self.pick(&ERROR_LINES), ERROR_POINTS)
        } else {
            (self.pick(&AGREEMENT_LINES), AGREEMENT_POINTS)
        };

        let response = AgentResponse::new(message, self.agent_type)
            .with_points(points)
            .with_metadata("intentional_error", should_error);

        self.add_to_history(ConversationMessage::assistant(message));
        Ok(response)
    }

    fn info(&self) -> Value {
        json!({
            "name": "Virtual Peer",
            "type": self.agent_type,
            "description": "Collaborates and occasionally makes intentional mistakes",
            "error_injection_rate": self.error_injection_rate,
        })
    }

    fn conversation(&self) -> &ConversationHistory {
        &self.conversation
    }

    fn conversation_mut(&mut self) -> &mut ConversationHistory {
        &mut self.conversation
    }
}
