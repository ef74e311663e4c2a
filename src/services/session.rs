//! 会话管理
//!
//! SessionStore 按 session_id 持有所有 LearningSession。每个 LearningSession 打包了
//! 会话元数据、编排器、积分与学习历史，因此同一会话的积分和历史在多次请求之间保持连续。

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};

use super::history::HistoryTracker;
use super::orchestrator::Orchestrator;
use super::points::PointsTracker;
use crate::agents::AgentRegistry;
use crate::core::{AgentResponse, AgentType, Result, SymbioteError};
use crate::schemas::{validate_message, Challenge, Message, UserProfile, UserSession};

/// 会话 ID
pub type SessionId = String;

/// 对会话元数据的局部更新，None 表示不修改
#[derive(Debug, Clone, Default)]
pub struct SessionUpdate {
    pub current_phase: Option<String>,
    pub is_active: Option<bool>,
}

/// 单个学习会话
pub struct LearningSession {
    session: UserSession,
    orchestrator: Orchestrator,
    points: PointsTracker,
    history: HistoryTracker,
    /// 尚未兑现的挑战（challenge_id -> Challenge）
    open_challenges: BTreeMap<String, Challenge>,
    transcript: Vec<Message>,
    message_count: u64,
}

impl LearningSession {
    fn new(session: UserSession, orchestrator: Orchestrator) -> Self {
        Self {
            session,
            orchestrator,
            points: PointsTracker::new(),
            history: HistoryTracker::new(),
            open_challenges: BTreeMap::new(),
            transcript: Vec::new(),
            message_count: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.session.session_id
    }

    pub fn user_session(&self) -> &UserSession {
        &self.session
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn points(&self) -> &PointsTracker {
        &self.points
    }

    pub fn history(&self) -> &HistoryTracker {
        &self.history
    }

    /// 推荐与强弱项会刷新历史中的缓存，所以需要可变引用
    pub fn history_mut(&mut self) -> &mut HistoryTracker {
        &mut self.history
    }

    pub fn open_challenges(&self) -> impl Iterator<Item = &Challenge> {
        self.open_challenges.values()
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn message_count(&self) -> u64 {
        self.message_count
    }

    pub fn add_message(&mut self, message: Message) {
        self.transcript.push(message);
        self.session.touch();
    }

    /// 一轮对话：编排 -> 计分 ->（可选）提示扣分 -> 记录挑战与阶段 -> 写历史 -> 同步会话
    pub fn handle_message(&mut self, text: &str, use_hint: bool) -> Result<AgentResponse> {
        self.ensure_active()?;
        let text = validate_message(text)?;

        let mut response = self.orchestrator.process_user_input(&text)?;

        let points_earned = if response.points_awarded > 0 {
            self.points.award("collaboration", response.points_awarded)
        } else {
            0
        };

        if use_hint {
            let penalty = self.points.use_hint();
            response.metadata.insert("hint_penalty".to_string(), json!(penalty));
        }

        if let Some(challenge) = &response.challenge {
            self.open_challenges
                .insert(challenge.challenge_id.clone(), challenge.clone());
        }

        if response.agent_type == AgentType::Tutor {
            self.sync_phase();
        }

        self.history.add_interaction(
            response.agent_type.as_str(),
            &self.session.user_profile.subject,
            &text,
            &response.message,
            points_earned,
            None,
        );

        self.transcript.push(Message::user(text));
        self.transcript
            .push(Message::assistant(response.message.clone(), response.agent_type));
        self.message_count += 1;
        self.sync_points();

        Ok(response)
    }

    /// 兑现挑战：按 challenge_completion（x3）计分，并记一次正确的交互；返回实得积分
    pub fn complete_challenge(&mut self, challenge_id: &str, answer: &str) -> Result<u64> {
        self.ensure_active()?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(SymbioteError::validation("answer", "Answer cannot be empty"));
        }
        let challenge = self
            .open_challenges
            .remove(challenge_id)
            .ok_or_else(|| SymbioteError::Challenge {
                message: format!("Challenge '{challenge_id}' is not open in this session"),
                challenge_id: challenge_id.to_string(),
            })?;

        let earned = self.points.award_with_metadata(
            "challenge_completion",
            challenge.points_value,
            json!({ "challenge_id": challenge.challenge_id }),
        );
        self.history.add_interaction(
            challenge.agent_type.as_str(),
            &self.session.user_profile.subject,
            answer,
            &challenge.question,
            earned,
            Some(true),
        );
        self.transcript.push(Message::user(answer));
        self.sync_points();

        Ok(earned)
    }

    /// 请求提示：扣分后返回（罚分, 挑战的提示文本）；挑战未知时提示为 None
    pub fn request_hint(&mut self, challenge_id: &str) -> Result<(u64, Option<String>)> {
        self.ensure_active()?;
        let penalty = self.points.use_hint();
        let hint = self
            .open_challenges
            .get(challenge_id)
            .map(|c| c.hint.clone());
        self.sync_points();
        Ok((penalty, hint))
    }

    pub fn info(&self) -> Value {
        let s = &self.session;
        json!({
            "session_id": s.session_id,
            "user_name": s.user_profile.name,
            "subject": s.user_profile.subject,
            "current_phase": s.current_phase,
            "current_points": s.current_points,
            "total_points": s.total_points,
            "is_active": s.is_active,
            "message_count": self.message_count,
            "open_challenges": self.open_challenges.len(),
            "created_at": s.created_at.to_rfc3339(),
            "last_activity": s.last_activity.to_rfc3339(),
        })
    }

    /// 已关闭的会话冻结：不再接受任何改动积分或历史的操作
    fn ensure_active(&self) -> Result<()> {
        if self.session.is_active {
            return Ok(());
        }
        Err(SymbioteError::Session {
            message: format!("Session '{}' is closed", self.session.session_id),
            session_id: Some(self.session.session_id.clone()),
        })
    }

    /// 以导师推进后的阶段为准（响应元数据里是提问时的阶段）
    fn sync_phase(&mut self) {
        let phase = self
            .orchestrator
            .agent(AgentType::Tutor)
            .and_then(|tutor| tutor.info().get("phase").and_then(Value::as_str).map(str::to_string));
        if let Some(phase) = phase {
            if self.session.learning_path.move_to(&phase) {
                self.session.current_phase = phase;
            }
        }
    }

    fn sync_points(&mut self) {
        self.session.current_points = self.points.current_points();
        self.session.total_points = self.points.total_points();
        self.session.touch();
    }

    fn is_expired(&self, timeout: Duration) -> bool {
        // last_activity 在未来时（时钟回拨）视为未过期
        (Utc::now() - self.session.last_activity)
            .to_std()
            .map(|elapsed| elapsed > timeout)
            .unwrap_or(false)
    }
}

/// 会话管理器
pub struct SessionStore {
    sessions: HashMap<SessionId, LearningSession>,
    registry: Arc<AgentRegistry>,
    /// 为每个新会话的智能体派生随机源
    rng: StdRng,
}

impl SessionStore {
    /// seed 为 None 时使用系统熵
    pub fn new(registry: Arc<AgentRegistry>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            sessions: HashMap::new(),
            registry,
            rng,
        }
    }

    pub fn create_session(&mut self, user_profile: UserProfile) -> Result<&mut LearningSession> {
        if self.registry.list_types().is_empty() {
            return Err(SymbioteError::Session {
                message: "Failed to create session: no agents registered".to_string(),
                session_id: None,
            });
        }

        let session_id = self.next_session_id(&user_profile.name);
        let orchestrator = Orchestrator::new(user_profile.clone(), &self.registry, &mut self.rng);
        let session = LearningSession::new(UserSession::new(session_id.clone(), user_profile), orchestrator);
        tracing::info!(session_id = %session_id, "session created");

        Ok(self.sessions.entry(session_id).or_insert(session))
    }

    /// `<名字，空格换成下划线>_<uuid>`，冲突时重新生成
    fn next_session_id(&self, name: &str) -> SessionId {
        let prefix = name.replace(' ', "_");
        loop {
            let id = format!("{}_{}", prefix, uuid::Uuid::new_v4().simple());
            if !self.sessions.contains_key(&id) {
                return id;
            }
        }
    }

    pub fn get_session(&self, session_id: &str) -> Option<&LearningSession> {
        self.sessions.get(session_id)
    }

    pub fn get_session_mut(&mut self, session_id: &str) -> Option<&mut LearningSession> {
        self.sessions.get_mut(session_id)
    }

    pub fn get_session_or_raise(&self, session_id: &str) -> Result<&LearningSession> {
        self.get_session(session_id)
            .ok_or_else(|| SymbioteError::SessionNotFound(session_id.to_string()))
    }

    pub fn get_session_or_raise_mut(&mut self, session_id: &str) -> Result<&mut LearningSession> {
        self.get_session_mut(session_id)
            .ok_or_else(|| SymbioteError::SessionNotFound(session_id.to_string()))
    }

    pub fn update_session(&mut self, session_id: &str, update: SessionUpdate) -> Result<&UserSession> {
        let learning = self.get_session_or_raise_mut(session_id)?;
        let session = &mut learning.session;
        if let Some(phase) = update.current_phase {
            if !session.learning_path.move_to(&phase) {
                return Err(SymbioteError::validation(
                    "current_phase",
                    format!("Unknown learning phase '{phase}'"),
                ));
            }
            session.current_phase = phase;
        }
        if let Some(is_active) = update.is_active {
            session.is_active = is_active;
        }
        session.touch();
        Ok(&learning.session)
    }

    /// 记录一次活动（刷新 last_activity）
    pub fn touch(&mut self, session_id: &str) -> Result<()> {
        self.get_session_or_raise_mut(session_id)?.session.touch();
        Ok(())
    }

    /// 关闭会话：标记为不活跃，但保留数据
    pub fn close_session(&mut self, session_id: &str) -> Result<()> {
        let learning = self.get_session_or_raise_mut(session_id)?;
        learning.session.is_active = false;
        learning.session.touch();
        tracing::info!(session_id, "session closed");
        Ok(())
    }

    pub fn delete_session(&mut self, session_id: &str) -> Result<()> {
        if self.sessions.remove(session_id).is_none() {
            return Err(SymbioteError::SessionNotFound(session_id.to_string()));
        }
        tracing::info!(session_id, "session deleted");
        Ok(())
    }

    pub fn all_sessions(&self) -> impl Iterator<Item = &LearningSession> {
        self.sessions.values()
    }

    pub fn active_sessions(&self) -> impl Iterator<Item = &LearningSession> {
        self.sessions.values().filter(|s| s.session.is_active)
    }

    /// 删除超过 timeout 未活动的活跃会话，返回删除数量；已关闭的会话保留
    pub fn cleanup_inactive_sessions(&mut self, timeout: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, s| !(s.session.is_active && s.is_expired(timeout)));
        let removed = before - self.sessions.len();
        if removed > 0 {
            tracing::info!(removed, "inactive sessions swept");
        }
        removed
    }

    pub fn session_info(&self, session_id: &str) -> Result<Value> {
        Ok(self.get_session_or_raise(session_id)?.info())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
