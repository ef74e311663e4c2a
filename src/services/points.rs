//! 积分与等级
//!
//! current_points 是可扣减余额，total_points 是终身累计（只增不减）。
//! 每次奖励 / 扣分都追加一条流水，流水不可修改。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 行为类型 -> 倍率；未列出的行为倍率为 1.0
pub const MULTIPLIERS: [(&str, f64); 6] = [
    ("curiosity", 1.5),
    ("critical_thinking", 2.0),
    ("collaboration", 1.3),
    ("teaching", 2.5),
    ("challenge_completion", 3.0),
    ("hint_penalty", 0.7),
];

pub const POINTS_PER_LEVEL: u64 = 100;

pub fn multiplier_for(action_type: &str) -> f64 {
    MULTIPLIERS
        .iter()
        .find(|(name, _)| *name == action_type)
        .map(|(_, m)| *m)
        .unwrap_or(1.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwardEntry {
    pub action: String,
    pub base_points: u64,
    pub multiplier: f64,
    pub points_earned: u64,
    pub timestamp: DateTime<Utc>,
    pub metadata: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyEntry {
    /// 固定为 "penalty"
    pub action: String,
    pub reason: String,
    pub points_deducted: u64,
    pub timestamp: DateTime<Utc>,
}

/// 积分流水
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointsEntry {
    Award(AwardEntry),
    Penalty(PenaltyEntry),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsSummary {
    pub current_points: u64,
    pub total_points: u64,
    pub level: u64,
    pub next_level_points: u64,
    pub progress_to_next_level: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PointsTracker {
    current_points: u64,
    total_points: u64,
    ledger: Vec<PointsEntry>,
}

impl PointsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_points(&self) -> u64 {
        self.current_points
    }

    pub fn total_points(&self) -> u64 {
        self.total_points
    }

    /// 按倍率奖励：floor(base × multiplier)，同时加到余额与累计
    pub fn award(&mut self, action_type: &str, base_points: u64) -> u64 {
        self.award_with_metadata(action_type, base_points, Value::Object(Default::default()))
    }

    pub fn award_with_metadata(&mut self, action_type: &str, base_points: u64, metadata: Value) -> u64 {
        let multiplier = multiplier_for(action_type);
        let points_earned = (base_points as f64 * multiplier).floor() as u64;

        self.current_points += points_earned;
        self.total_points += points_earned;

        self.ledger.push(PointsEntry::Award(AwardEntry {
            action: action_type.to_string(),
            base_points,
            multiplier,
            points_earned,
            timestamp: Utc::now(),
            metadata,
        }));
        tracing::debug!(action_type, base_points, points_earned, "points awarded");

        points_earned
    }

    /// 扣分，最多扣到 0；累计积分不受影响。返回实际扣除数
    pub fn penalize(&mut self, reason: &str, amount: u64) -> u64 {
        let deducted = amount.min(self.current_points);
        self.current_points -= deducted;

        self.ledger.push(PointsEntry::Penalty(PenaltyEntry {
            action: "penalty".to_string(),
            reason: reason.to_string(),
            points_deducted: deducted,
            timestamp: Utc::now(),
        }));
        tracing::debug!(reason, amount, deducted, "points penalized");

        deducted
    }

    /// 使用提示：扣当前余额的 10%（至少 1 分）。返回的是计算出的罚分，而非实际扣除数
    pub fn use_hint(&mut self) -> u64 {
        let penalty = (self.current_points / 10).max(1);
        self.penalize("hint_used", penalty);
        penalty
    }

    pub fn level(&self) -> u64 {
        self.total_points / POINTS_PER_LEVEL + 1
    }

    pub fn next_threshold(&self) -> u64 {
        self.level() * POINTS_PER_LEVEL
    }

    /// 当前等级内的进度百分比，范围 [0, 100]
    pub fn progress_percent(&self) -> f64 {
        let level = self.level();
        let current_threshold = (level - 1) * POINTS_PER_LEVEL;
        let next_threshold = level * POINTS_PER_LEVEL;
        if next_threshold == current_threshold {
            return 0.0;
        }
        let progress = (self.total_points - current_threshold) as f64
            / (next_threshold - current_threshold) as f64
            * 100.0;
        progress.clamp(0.0, 100.0)
    }

    pub fn summary(&self) -> PointsSummary {
        PointsSummary {
            current_points: self.current_points,
            total_points: self.total_points,
            level: self.level(),
            next_level_points: self.next_threshold(),
            progress_to_next_level: self.progress_percent(),
        }
    }

    /// 流水；limit 为 Some(n) 时只取最近 n 条
    pub fn history(&self, limit: Option<usize>) -> Vec<PointsEntry> {
        match limit {
            Some(n) if n > 0 => self.ledger[self.ledger.len().saturating_sub(n)..].to_vec(),
            _ => self.ledger.clone(),
        }
    }

    pub fn reset(&mut self) {
        self.current_points = 0;
        self.total_points = 0;
        self.ledger.clear();
    }
}
