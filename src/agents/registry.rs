//! 智能体注册表
//!
//! AgentType -> 构造函数（+ 可选工厂）。显式构造、显式传递，没有全局单例。
//! 具名实例由注册表持有，可按 instance_id 取回；注销某类型时一并删除它的具名实例。
//! 没有内部锁：装配阶段单线程修改，之后只读共享。

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use rand::rngs::StdRng;
use serde_json::{json, Value};

use super::{ProvocateurAgent, SocraticTutorAgent, TeachableAgent, VirtualPeerAgent};
use crate::config::AgentsSection;
use crate::core::{Agent, AgentType, Result, SymbioteError};

/// 直接构造：类型 + 随机源
pub type AgentConstructor = fn(AgentType, StdRng) -> Box<dyn Agent>;

/// 自定义工厂，可失败（编排器初始化时会记录并跳过失败的类型）
pub type AgentFactory = Arc<dyn Fn(StdRng) -> Result<Box<dyn Agent>> + Send + Sync>;

struct Registration {
    constructor: AgentConstructor,
    factory: AgentFactory,
}

#[derive(Default)]
pub struct AgentRegistry {
    registrations: BTreeMap<AgentType, Registration>,
    instances: HashMap<String, Box<dyn Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册四个内置智能体；Peer 的出错率取自配置
    pub fn with_defaults(cfg: &AgentsSection) -> Self {
        let mut registry = Self::new();
        let peer_rate = cfg.peer_error_rate;
        let peer_factory: AgentFactory = Arc::new(move |rng: StdRng| -> Result<Box<dyn Agent>> {
            Ok(Box::new(VirtualPeerAgent::with_error_rate(AgentType::Peer, rng, peer_rate)))
        });
        let defaults: [(AgentType, AgentConstructor, Option<AgentFactory>); 4] = [
            (AgentType::Tutor, SocraticTutorAgent::boxed, None),
            (AgentType::Peer, VirtualPeerAgent::boxed, Some(peer_factory)),
            (AgentType::Provocateur, ProvocateurAgent::boxed, None),
            (AgentType::Teachable, TeachableAgent::boxed, None),
        ];
        for (agent_type, constructor, factory) in defaults {
            // 空注册表里四个类型各注册一次，不会冲突
            let registered = registry.register(agent_type, constructor, factory);
            debug_assert!(registered.is_ok(), "duplicate default agent {agent_type}");
        }
        registry
    }

    /// 注册类型；未给工厂时默认直接调用构造函数
    pub fn register(
        &mut self,
        agent_type: AgentType,
        constructor: AgentConstructor,
        factory: Option<AgentFactory>,
    ) -> Result<()> {
        if self.registrations.contains_key(&agent_type) {
            return Err(SymbioteError::Registry(format!(
                "Agent type '{agent_type}' is already registered"
            )));
        }
        let factory = match factory {
            Some(factory) => factory,
            None => {
                let default: AgentFactory =
                    Arc::new(move |rng: StdRng| -> Result<Box<dyn Agent>> { Ok(constructor(agent_type, rng)) });
                default
            }
        };
        self.registrations
            .insert(agent_type, Registration { constructor, factory });
        Ok(())
    }

    pub fn unregister(&mut self, agent_type: AgentType) -> Result<()> {
        if self.registrations.remove(&agent_type).is_none() {
            return Err(not_registered(agent_type));
        }
        self.instances.retain(|_, agent| agent.agent_type() != agent_type);
        Ok(())
    }

    /// 通过工厂创建一个新实例，调用方拥有它
    pub fn create(&self, agent_type: AgentType, rng: StdRng) -> Result<Box<dyn Agent>> {
        let registration = self
            .registrations
            .get(&agent_type)
            .ok_or_else(|| not_registered(agent_type))?;
        (registration.factory)(rng)
    }

    /// 创建并以 instance_id 保存在注册表中（同名覆盖），返回其可变引用
    pub fn create_instance(
        &mut self,
        agent_type: AgentType,
        instance_id: &str,
        rng: StdRng,
    ) -> Result<&mut dyn Agent> {
        let agent = self.create(agent_type, rng)?;
        self.instances.insert(instance_id.to_string(), agent);
        self.get_mut(instance_id)
            .ok_or_else(|| SymbioteError::Registry(format!("Instance '{instance_id}' vanished")))
    }

    pub fn get(&self, instance_id: &str) -> Option<&dyn Agent> {
        self.instances.get(instance_id).map(|a| a.as_ref())
    }

    pub fn get_mut(&mut self, instance_id: &str) -> Option<&mut dyn Agent> {
        match self.instances.get_mut(instance_id) {
            Some(agent) => Some(agent.as_mut()),
            None => None,
        }
    }

    pub fn constructor(&self, agent_type: AgentType) -> Result<AgentConstructor> {
        self.registrations
            .get(&agent_type)
            .map(|r| r.constructor)
            .ok_or_else(|| not_registered(agent_type))
    }

    pub fn is_registered(&self, agent_type: AgentType) -> bool {
        self.registrations.contains_key(&agent_type)
    }

    pub fn list_types(&self) -> Vec<AgentType> {
        self.registrations.keys().copied().collect()
    }

    pub fn list_instances(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.instances.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn clear_instances(&mut self) {
        self.instances.clear();
    }

    pub fn info(&self) -> Value {
        json!({
            "registered_types": self.list_types(),
            "total_types": self.registrations.len(),
            "total_instances": self.instances.len(),
            "instances": self.list_instances(),
        })
    }
}

fn not_registered(agent_type: AgentType) -> SymbioteError {
    SymbioteError::Registry(format!("Agent type '{agent_type}' is not registered"))
}
