//! 智能体编排器
//!
//! 每个会话一个编排器：持有四类智能体各一个实例，按关键词与轮次为每条输入选出一个智能体，
//! 组装上下文快照后交给它处理。

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};

use crate::agents::AgentRegistry;
use crate::core::{Agent, AgentContext, AgentResponse, AgentType, ProfileContext, Result, SymbioteError};
use crate::schemas::UserProfile;

const TUTOR_KEYWORDS: [&str; 3] = ["why", "how", "explain"];
const PROVOCATEUR_KEYWORDS: [&str; 3] = ["challenge", "game", "scenario"];
const TEACHABLE_KEYWORDS: [&str; 3] = ["teach", "explain to", "help me"];

/// 按输入内容与轮次选择智能体
///
/// 关键词按顺序检查（不区分大小写，子串匹配）；都不命中时按 `turn % 4` 轮转
pub fn select_agent(user_input: &str, turn: u64) -> AgentType {
    let lowered = user_input.to_lowercase();
    let hits = |keywords: &[&str]| keywords.iter().any(|k| lowered.contains(k));

    if hits(&TUTOR_KEYWORDS) {
        AgentType::Tutor
    } else if hits(&PROVOCATEUR_KEYWORDS) {
        AgentType::Provocateur
    } else if hits(&TEACHABLE_KEYWORDS) {
        AgentType::Teachable
    } else {
        match turn % 4 {
            0 => AgentType::Peer,
            1 => AgentType::Provocateur,
            2 => AgentType::Teachable,
            _ => AgentType::Tutor,
        }
    }
}

pub struct Orchestrator {
    user_profile: UserProfile,
    agents: BTreeMap<AgentType, Box<dyn Agent>>,
    conversation_count: u64,
    last_agent: Option<AgentType>,
}

impl Orchestrator {
    /// 为注册表中的每个类型构造一个实例；构造失败的类型记录警告后跳过
    pub fn new(user_profile: UserProfile, registry: &AgentRegistry, rng: &mut StdRng) -> Self {
        let mut agents = BTreeMap::new();
        for agent_type in registry.list_types() {
            let agent_rng = StdRng::seed_from_u64(rng.gen());
            match registry.create(agent_type, agent_rng) {
                Ok(agent) => {
                    agents.insert(agent_type, agent);
                }
                Err(e) => {
                    tracing::warn!(agent = %agent_type, error = %e, "failed to create agent, skipping");
                }
            }
        }
        Self {
            user_profile,
            agents,
            conversation_count: 0,
            last_agent: None,
        }
    }

    /// 处理一条输入：计数 +1，选择智能体，交给它处理，并记录 last_agent
    pub fn process_user_input(&mut self, user_input: &str) -> Result<AgentResponse> {
        self.conversation_count += 1;
        let selected = select_agent(user_input, self.conversation_count);
        tracing::debug!(agent = %selected, turn = self.conversation_count, "agent selected");

        let context = AgentContext {
            user_profile: ProfileContext::from(&self.user_profile),
            conversation_count: self.conversation_count,
            last_agent: self.last_agent,
            user_input: user_input.to_string(),
        };

        let agent = self
            .agents
            .get_mut(&selected)
            .ok_or(SymbioteError::AgentNotFound(selected))?;
        let response = agent.process_input(user_input, &context)?;
        self.last_agent = Some(selected);

        Ok(response)
    }

    pub fn agent(&self, agent_type: AgentType) -> Option<&dyn Agent> {
        self.agents.get(&agent_type).map(|a| a.as_ref())
    }

    pub fn user_profile(&self) -> &UserProfile {
        &self.user_profile
    }

    pub fn conversation_count(&self) -> u64 {
        self.conversation_count
    }

    pub fn last_agent(&self) -> Option<AgentType> {
        self.last_agent
    }

    /// 每个存活智能体的 info，键为类型名
    pub fn all_agents_info(&self) -> BTreeMap<AgentType, Value> {
        self.agents.iter().map(|(t, a)| (*t, a.info())).collect()
    }

    pub fn info(&self) -> Value {
        json!({
            "conversation_count": self.conversation_count,
            "last_agent": self.last_agent,
            "active_agents": self.agents.keys().collect::<Vec<_>>(),
            "agents": self.all_agents_info(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::agents::{AgentFactory, SocraticTutorAgent, VirtualPeerAgent};
    use crate::config::AgentsSection;
    use crate::schemas::{EducationLevel, LearningPurpose};

    fn profile() -> UserProfile {
        UserProfile::new("Ada", 20, EducationLevel::Beginner, "Algebra", LearningPurpose::Learn).unwrap()
    }

    fn orchestrator() -> Orchestrator {
        let registry = AgentRegistry::with_defaults(&AgentsSection::default());
        Orchestrator::new(profile(), &registry, &mut StdRng::seed_from_u64(1))
    }

    #[test]
    fn test_keyword_selection() {
        for turn in 0..8 {
            assert_eq!(select_agent("Why does this work?", turn), AgentType::Tutor);
            assert_eq!(select_agent("HOW so", turn), AgentType::Tutor);
            assert_eq!(select_agent("let's play a game", turn), AgentType::Provocateur);
            assert_eq!(select_agent("can I teach you", turn), AgentType::Teachable);
        }
        // "explain to" 先命中了 "explain"
        assert_eq!(select_agent("let me explain to you", 2), AgentType::Tutor);
        // 子串匹配："however" 包含 "how"
        assert_eq!(select_agent("however", 1), AgentType::Tutor);
    }

    #[test]
    fn test_round_robin_without_keywords() {
        assert_eq!(select_agent("ok", 0), AgentType::Peer);
        assert_eq!(select_agent("ok", 1), AgentType::Provocateur);
        assert_eq!(select_agent("ok", 2), AgentType::Teachable);
        assert_eq!(select_agent("ok", 3), AgentType::Tutor);
        assert_eq!(select_agent("ok", 4), AgentType::Peer);
    }

    #[test]
    fn test_four_neutral_turns_visit_every_agent() {
        let mut orch = orchestrator();
        let mut seen: Vec<AgentType> = (0..4)
            .map(|_| orch.process_user_input("ok").unwrap().agent_type)
            .collect();
        seen.sort();
        assert_eq!(seen, AgentType::ALL.to_vec());
        assert_eq!(orch.conversation_count(), 4);
        assert_eq!(orch.last_agent(), Some(AgentType::Peer));
    }

    #[test]
    fn test_first_turn_why_goes_to_tutor() {
        let mut orch = orchestrator();
        let r = orch.process_user_input("Why does this work?").unwrap();
        assert_eq!(r.agent_type, AgentType::Tutor);
        assert_eq!(r.points_awarded, 5);
        assert_eq!(orch.info()["last_agent"], "tutor");
        assert_eq!(orch.agent(AgentType::Tutor).unwrap().history().len(), 2);
    }

    #[test]
    fn test_failed_agent_is_skipped_and_reported() {
        let mut registry = AgentRegistry::new();
        registry.register(AgentType::Tutor, SocraticTutorAgent::boxed, None).unwrap();
        let broken: AgentFactory = Arc::new(|_rng: StdRng| -> Result<Box<dyn Agent>> {
            Err(SymbioteError::agent(AgentType::Peer, "boom"))
        });
        registry.register(AgentType::Peer, VirtualPeerAgent::boxed, Some(broken)).unwrap();

        let mut orch = Orchestrator::new(profile(), &registry, &mut StdRng::seed_from_u64(1));
        assert!(orch.agent(AgentType::Peer).is_none());
        assert_eq!(orch.info()["active_agents"], json!(["tutor"]));

        // 第 4 轮无关键词时轮到 Peer
        for _ in 0..3 {
            orch.process_user_input("why").unwrap();
        }
        let err = orch.process_user_input("ok").unwrap_err();
        assert_eq!(err, SymbioteError::AgentNotFound(AgentType::Peer));
        assert_eq!(err.code(), "SYMBIOTE_ERROR");
        assert_eq!(orch.conversation_count(), 4);
    }
}
