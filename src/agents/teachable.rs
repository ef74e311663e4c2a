//! Teachable Agent：让学习者来教，按讲解长度估算理解增量

use rand::rngs::StdRng;
use serde_json::{json, Value};

use crate::core::{
    Agent, AgentContext, AgentResponse, AgentType, ConversationHistory, ConversationMessage, Result,
};

pub const BASE_TEACHING_POINTS: u64 = 15;
const MAX_UNDERSTANDING: u64 = 100;

pub struct TeachableAgent {
    agent_type: AgentType,
    conversation: ConversationHistory,
    understanding_level: u64,
}

impl TeachableAgent {
    /// 供注册表使用的构造函数
    pub fn boxed(agent_type: AgentType, rng: StdRng) -> Box<dyn Agent> {
        Box::new(Self::new(agent_type, rng))
    }

    /// 不使用随机源，签名与其他智能体保持一致以便注册
    pub fn new(agent_type: AgentType, _rng: StdRng) -> Self {
        Self {
            agent_type,
            conversation: ConversationHistory::new(),
            understanding_level: 0,
        }
    }

    pub fn understanding_level(&self) -> u64 {
        self.understanding_level
    }
}

/// 讲解质量：按字符数分档
pub fn evaluate_teaching(user_input: &str) -> u64 {
    match user_input.chars().count() {
        n if n > 100 => 10,
        n if n > 50 => 5,
        _ => 2,
    }
}

fn learning_reply(gain: u64) -> &'static str {
    if gain > 8 {
        "Wow! That explanation really helped me understand this concept better!"
    } else if gain > 5 {
        "Thanks for explaining that. I'm starting to get it now."
    } else {
        "I'm learning, but could you provide more details?"
    }
}

impl Agent for TeachableAgent {
    fn agent_type(&self) -> AgentType {
        self.agent_type
    }

    fn process_input(&mut self, user_input: &str, _context: &AgentContext) -> Result<AgentResponse> {
        self.add_to_history(ConversationMessage::user(user_input));

        let gain = evaluate_teaching(user_input);
        self.understanding_level = (self.understanding_level + gain).min(MAX_UNDERSTANDING);
        let message = learning_reply(gain);

        let response = AgentResponse::new(message, self.agent_type)
            .with_points(BASE_TEACHING_POINTS + gain)
            .with_metadata("understanding_level", self.understanding_level);

        self.add_to_history(ConversationMessage::assistant(message));
        Ok(response)
    }

    fn info(&self) -> Value {
        json!({
            "name": "Teachable Agent",
            "type": self.agent_type,
            "description": "Learns from the user to reinforce their understanding",
            "understanding_level": self.understanding_level,
        })
    }

    fn conversation(&self) -> &ConversationHistory {
        &self.conversation
    }

    fn conversation_mut(&mut self) -> &mut ConversationHistory {
        &mut self.conversation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_context;
    use rand::SeedableRng;

    fn agent() -> TeachableAgent {
        TeachableAgent::new(AgentType::Teachable, StdRng::seed_from_u64(0))
    }

    #[test]
    fn test_gain_tiers() {
        assert_eq!(evaluate_teaching("short"), 2);
        assert_eq!(evaluate_teaching(&"a".repeat(50)), 2);
        assert_eq!(evaluate_teaching(&"a".repeat(51)), 5);
        assert_eq!(evaluate_teaching(&"a".repeat(100)), 5);
        assert_eq!(evaluate_teaching(&"a".repeat(101)), 10);
    }

    #[test]
    fn test_points_and_replies() {
        let mut a = agent();
        let r = a.process_input("short", &test_context()).unwrap();
        assert_eq!(r.points_awarded, 17);
        assert_eq!(r.message, "I'm learning, but could you provide more details?");

        // gain 5 不大于 5，仍然落到最后一档
        let r = a.process_input(&"b".repeat(60), &test_context()).unwrap();
        assert_eq!(r.points_awarded, 20);
        assert_eq!(r.message, "I'm learning, but could you provide more details?");

        let r = a.process_input(&"c".repeat(120), &test_context()).unwrap();
        assert_eq!(r.points_awarded, 25);
        assert!(r.message.starts_with("Wow!"));
        assert_eq!(r.metadata["understanding_level"], 17);
    }

    #[test]
    fn test_understanding_caps_at_100() {
        let mut a = agent();
        let long = "d".repeat(200);
        for _ in 0..15 {
            a.process_input(&long, &test_context()).unwrap();
        }
        assert_eq!(a.understanding_level(), 100);
        assert_eq!(a.info()["understanding_level"], 100);
    }
}
