//! Provocateur：抛出情景挑战并附带一个笑话

use rand::rngs::StdRng;
use rand::Rng;
use serde_json::{json, Value};

use crate::core::{
    Agent, AgentContext, AgentResponse, AgentType, ConversationHistory, ConversationMessage, Result,
};
use crate::schemas::{Challenge, Difficulty};

const PROMPTS: [&str; 3] = [
    "Ready for a real-world scenario? Here's your challenge:",
    "Let's put your knowledge to the test with this scenario:",
    "I've got an interesting challenge for you:",
];

const JOKES: [&str; 3] = [
    "Why did the learner bring a ladder to class? Because they wanted to take their learning to the next level! 😄",
    "What did the AI say to the learner? 'You're processing well!' 🤖",
    "Why do programmers make good students? Because they know how to debug their thinking! 🐛",
];

const CHALLENGE_QUESTION: &str = "How would you solve this real-world problem?";
const CHALLENGE_HINT: &str = "Think about the core principles involved.";
pub const CHALLENGE_POINTS: u64 = 20;

pub struct ProvocateurAgent {
    agent_type: AgentType,
    rng: StdRng,
    conversation: ConversationHistory,
    challenges_created: u64,
}

impl ProvocateurAgent {
    /// 供注册表使用的构造函数
    pub fn boxed(agent_type: AgentType, rng: StdRng) -> Box<dyn Agent> {
        Box::new(Self::new(agent_type, rng))
    }

    pub fn new(agent_type: AgentType, rng: StdRng) -> Self {
        Self {
            agent_type,
            rng,
            conversation: ConversationHistory::new(),
            challenges_created: 0,
        }
    }

    pub fn prompts() -> &'static [&'static str] {
        &PROMPTS
    }

    pub fn jokes() -> &'static [&'static str] {
        &JOKES
    }

    pub fn challenges_created(&self) -> u64 {
        self.challenges_created
    }

    fn create_challenge(&self) -> Challenge {
        Challenge::new(
            format!("challenge_{}", self.challenges_created),
            CHALLENGE_QUESTION,
            CHALLENGE_HINT,
            Difficulty::Medium,
            CHALLENGE_POINTS,
            self.agent_type,
        )
    }
}

impl Agent for ProvocateurAgent {
    fn agent_type(&self) -> AgentType {
        self.agent_type
    }

    /// 不直接给分：挑战的分值在完成挑战时兑现
    fn process_input(&mut self, user_input: &str, _context: &AgentContext) -> Result<AgentResponse> {
        self.add_to_history(ConversationMessage::user(user_input));

        let message = PROMPTS[self.rng.gen_range(0..PROMPTS.len())];
        let joke = JOKES[self.rng.gen_range(0..JOKES.len())];
        let challenge = self.create_challenge();

        let response = AgentResponse::new(message, self.agent_type)
            .with_metadata("challenge_id", challenge.challenge_id.clone())
            .with_challenge(challenge)
            .with_joke(joke);

        self.add_to_history(ConversationMessage::assistant(message));
        self.challenges_created += 1;

        Ok(response)
    }

    fn info(&self) -> Value {
        json!({
            "name": "Provocateur",
            "type": self.agent_type,
            "description": "Challenges with games and real-world scenarios",
            "challenges_created": self.challenges_created,
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

    #[test]
    fn test_challenge_ids_are_sequential() {
        let mut agent = ProvocateurAgent::new(AgentType::Provocateur, StdRng::seed_from_u64(5));
        for i in 0..3 {
            let r = agent.process_input("game on", &test_context()).unwrap();
            let challenge = r.challenge.expect("challenge");
            assert_eq!(challenge.challenge_id, format!("challenge_{i}"));
            assert_eq!(r.metadata["challenge_id"], format!("challenge_{i}"));
        }
        assert_eq!(agent.challenges_created(), 3);
    }

    #[test]
    fn test_response_shape() {
        let mut agent = ProvocateurAgent::new(AgentType::Provocateur, StdRng::seed_from_u64(5));
        let r = agent.process_input("challenge me", &test_context()).unwrap();
        assert_eq!(r.points_awarded, 0);
        assert!(PROMPTS.contains(&r.message.as_str()));
        assert!(JOKES.contains(&r.joke.as_deref().unwrap()));

        let challenge = r.challenge.unwrap();
        assert_eq!(challenge.difficulty, Difficulty::Medium);
        assert_eq!(challenge.points_value, 20);
        assert_eq!(challenge.agent_type, AgentType::Provocateur);
        assert_eq!(challenge.hint, CHALLENGE_HINT);
        assert!(challenge.correct_answer.is_none());
    }
}
