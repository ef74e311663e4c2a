//! 四类学习智能体与注册表
//!
//! - [`SocraticTutorAgent`]：苏格拉底式提问，推进学习阶段
//! - [`VirtualPeerAgent`]：同伴讨论，按概率故意出错
//! - [`ProvocateurAgent`]：情景挑战 + 笑话
//! - [`TeachableAgent`]：由学习者来教
//!
//! 随机源都由调用方注入（`StdRng`），测试中用固定种子。

pub mod peer;
pub mod provocateur;
pub mod registry;
pub mod teachable;
pub mod tutor;

pub use peer::VirtualPeerAgent;
pub use provocateur::ProvocateurAgent;
pub use registry::{AgentConstructor, AgentFactory, AgentRegistry};
pub use teachable::TeachableAgent;
pub use tutor::SocraticTutorAgent;

#[cfg(test)]
pub(crate) fn test_context() -> crate::core::AgentContext {
    use crate::core::{AgentContext, ProfileContext};
    use crate::schemas::{EducationLevel, LearningPurpose, UserProfile};

    let profile = UserProfile::new("Ada", 20, EducationLevel::Beginner, "Algebra", LearningPurpose::Learn)
        .expect("valid profile");
    AgentContext {
        user_profile: ProfileContext::from(&profile),
        conversation_count: 1,
        last_agent: None,
        user_input: String::new(),
    }
}
