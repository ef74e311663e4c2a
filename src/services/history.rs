//! 学习历史与薄弱 / 擅长主题分析
//!
//! 交互记录只追加；每次追加后增量更新对应主题的统计。
//! 薄弱 / 擅长列表是缓存，只在显式调用 identify_* 时重新计算。

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 少于这么多次交互的主题不参与强弱判定
pub const MIN_INTERACTIONS_FOR_ASSESSMENT: u64 = 3;
pub const DEFAULT_WEAK_THRESHOLD: f64 = 50.0;
pub const DEFAULT_STRONG_THRESHOLD: f64 = 80.0;
const RECENT_INTERACTIONS: usize = 5;
const REVIEW_TOPICS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub agent_type: String,
    pub topic: String,
    pub user_response: String,
    pub agent_response: String,
    pub points_earned: u64,
    /// None 表示对错未知
    pub correct: Option<bool>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicPerformance {
    pub total_interactions: u64,
    pub correct_responses: u64,
    pub total_points: u64,
    /// 0..=100
    pub accuracy: f64,
}

impl TopicPerformance {
    fn record(&mut self, correct: Option<bool>, points_earned: u64) {
        self.total_interactions += 1;
        if correct == Some(true) {
            self.correct_responses += 1;
        }
        self.total_points += points_earned;
        self.accuracy = if self.total_interactions > 0 {
            self.correct_responses as f64 / self.total_interactions as f64 * 100.0
        } else {
            0.0
        };
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub focus_on: Vec<String>,
    pub doing_well_in: Vec<String>,
    pub next_challenge: String,
    pub review_topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub total_interactions: usize,
    pub topic_performance: BTreeMap<String, TopicPerformance>,
    pub weak_areas: Vec<String>,
    pub strong_areas: Vec<String>,
    pub recent_interactions: Vec<Interaction>,
}

#[derive(Debug, Clone, Default)]
pub struct HistoryTracker {
    interactions: Vec<Interaction>,
    topic_performance: BTreeMap<String, TopicPerformance>,
    weak_areas: Vec<String>,
    strong_areas: Vec<String>,
}

impl HistoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_interaction(
        &mut self,
        agent_type: &str,
        topic: &str,
        user_response: &str,
        agent_response: &str,
        points_earned: u64,
        correct: Option<bool>,
    ) {
        self.interactions.push(Interaction {
            agent_type: agent_type.to_string(),
            topic: topic.to_string(),
            user_response: user_response.to_string(),
            agent_response: agent_response.to_string(),
            points_earned,
            correct,
            timestamp: Utc::now(),
        });
        self.topic_performance
            .entry(topic.to_string())
            .or_default()
            .record(correct, points_earned);
    }

    pub fn topic_performance(&self) -> &BTreeMap<String, TopicPerformance> {
        &self.topic_performance
    }

    pub fn total_interactions(&self) -> usize {
        self.interactions.len()
    }

    /// accuracy < threshold 且交互次数 >= 3 的主题；结果覆盖缓存
    pub fn identify_weak_areas(&mut self, threshold: f64) -> Vec<String> {
        self.weak_areas = self.topics_where(|perf| perf.accuracy < threshold);
        self.weak_areas.clone()
    }

    /// accuracy >= threshold 且交互次数 >= 3 的主题；结果覆盖缓存
    pub fn identify_strong_areas(&mut self, threshold: f64) -> Vec<String> {
        self.strong_areas = self.topics_where(|perf| perf.accuracy >= threshold);
        self.strong_areas.clone()
    }

    fn topics_where(&self, pred: impl Fn(&TopicPerformance) -> bool) -> Vec<String> {
        self.topic_performance
            .iter()
            .filter(|(_, perf)| perf.total_interactions >= MIN_INTERACTIONS_FOR_ASSESSMENT && pred(perf))
            .map(|(topic, _)| topic.clone())
            .collect()
    }

    /// 用默认阈值刷新强弱缓存后给出建议
    pub fn recommendations(&mut self) -> Recommendations {
        let focus_on = self.identify_weak_areas(DEFAULT_WEAK_THRESHOLD);
        let doing_well_in = self.identify_strong_areas(DEFAULT_STRONG_THRESHOLD);

        let next_challenge = if let Some(topic) = focus_on.first() {
            format!("Let's focus on {topic} to strengthen your understanding!")
        } else if let Some(topic) = doing_well_in.first() {
            format!("You're doing great in {topic}! Ready for a harder challenge?")
        } else {
            "Keep learning! You're making progress!".to_string()
        };
        let review_topics = focus_on.iter().take(REVIEW_TOPICS).cloned().collect();

        Recommendations {
            focus_on,
            doing_well_in,
            next_challenge,
            review_topics,
        }
    }

    /// 摘要中的强弱列表是缓存值，可能落后于最新交互
    pub fn summary(&self) -> HistorySummary {
        let start = self.interactions.len().saturating_sub(RECENT_INTERACTIONS);
        HistorySummary {
            total_interactions: self.interactions.len(),
            topic_performance: self.topic_performance.clone(),
            weak_areas: self.weak_areas.clone(),
            strong_areas: self.strong_areas.clone(),
            recent_interactions: self.interactions[start..].to_vec(),
        }
    }

    pub fn interactions(&self, limit: Option<usize>) -> Vec<Interaction> {
        match limit {
            Some(n) if n > 0 => self.interactions[self.interactions.len().saturating_sub(n)..].to_vec(),
            _ => self.interactions.clone(),
        }
    }

    pub fn reset(&mut self) {
        self.interactions.clear();
        self.topic_performance.clear();
        self.weak_areas.clear();
        self.strong_areas.clear();
    }
}
