//! UserProfile aggregate and its read-only summary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{Timestamp, UserId};

use super::capability::{clamp_score, CapabilityLevel, Trend, DEFAULT_CAPABILITY_SCORE};
use super::interaction::InteractionRecord;
use super::trajectory::TrajectoryWindow;

/// Longitudinal state kept for one learner.
///
/// Created on first contact and mutated only through the memory update
/// step of the pipeline. Aggregates are private; callers read them through
/// accessors or a [`ProfileSummary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    user_id: UserId,
    interaction_count: u64,
    capability_score: f64,
    /// Level assessed on the last committed turn.
    #[serde(default)]
    level: Option<CapabilityLevel>,
    trajectory: TrajectoryWindow,
    average_score: f64,
    #[serde(default)]
    trend: Trend,
    #[serde(default)]
    topic_frequency: BTreeMap<String, u64>,
    #[serde(default)]
    flagged_pattern_count: BTreeMap<String, u32>,
    #[serde(default)]
    dependency_streak: u32,
    #[serde(default)]
    history: Vec<InteractionRecord>,
    created_at: Timestamp,
    #[serde(default)]
    last_interaction: Option<Timestamp>,
}

impl UserProfile {
    /// Creates a fresh profile with default score and an empty window.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            interaction_count: 0,
            capability_score: DEFAULT_CAPABILITY_SCORE,
            level: None,
            trajectory: TrajectoryWindow::default(),
            average_score: DEFAULT_CAPABILITY_SCORE,
            trend: Trend::Stable,
            topic_frequency: BTreeMap::new(),
            flagged_pattern_count: BTreeMap::new(),
            dependency_streak: 0,
            history: Vec::new(),
            created_at: Timestamp::now(),
            last_interaction: None,
        }
    }

    /// Creates a profile carrying a score established elsewhere, e.g. when
    /// importing learners from another system. The score counts as one
    /// prior interaction and seeds the trajectory window.
    pub fn seeded(user_id: UserId, score: f64) -> Self {
        let score = clamp_score(score);
        let mut profile = Self::new(user_id);
        profile.interaction_count = 1;
        profile.capability_score = score;
        profile.level = Some(CapabilityLevel::from_score(score));
        profile.trajectory.push(score);
        profile.average_score = score;
        profile
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn interaction_count(&self) -> u64 {
        self.interaction_count
    }

    /// True until the first interaction has been committed.
    pub fn is_first_time(&self) -> bool {
        self.interaction_count == 0
    }

    pub fn capability_score(&self) -> f64 {
        self.capability_score
    }

    pub fn trajectory(&self) -> &TrajectoryWindow {
        &self.trajectory
    }

    pub fn average_score(&self) -> f64 {
        self.average_score
    }

    pub fn trend(&self) -> Trend {
        self.trend
    }

    /// Level reported with the last committed turn, so a provisional
    /// first-turn beginner stays a beginner until the next assessment.
    pub fn level(&self) -> CapabilityLevel {
        match self.level {
            Some(level) => level,
            None if self.is_first_time() => CapabilityLevel::Beginner,
            None => CapabilityLevel::from_score(self.capability_score),
        }
    }

    pub fn topic_frequency(&self) -> &BTreeMap<String, u64> {
        &self.topic_frequency
    }

    pub fn topic_count(&self, topic: &str) -> u64 {
        self.topic_frequency.get(topic).copied().unwrap_or(0)
    }

    pub fn flagged_pattern_count(&self) -> &BTreeMap<String, u32> {
        &self.flagged_pattern_count
    }

    pub fn flag_count(&self, flag: &str) -> u32 {
        self.flagged_pattern_count.get(flag).copied().unwrap_or(0)
    }

    /// Consecutive most recent turns flagged as dependency creation.
    pub fn dependency_streak(&self) -> u32 {
        self.dependency_streak
    }

    pub fn history(&self) -> &[InteractionRecord] {
        &self.history
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn last_interaction(&self) -> Option<Timestamp> {
        self.last_interaction
    }

    /// Read-only snapshot for responses.
    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            user_id: self.user_id.clone(),
            interaction_count: self.interaction_count,
            level: self.level(),
            trend: self.trend,
            capability_score: self.capability_score,
            average_score: self.average_score,
            dependency_streak: self.dependency_streak,
            topic_frequency: self.topic_frequency.clone(),
            flagged_pattern_count: self.flagged_pattern_count.clone(),
            last_interaction: self.last_interaction,
        }
    }

    // Mutators below are reserved for the memory update step.

    pub(crate) fn commit_score(&mut self, score: f64, level: CapabilityLevel, window: TrajectoryWindow) {
        self.capability_score = clamp_score(score);
        self.level = Some(level);
        self.average_score = window.mean().unwrap_or(self.capability_score);
        self.trajectory = window;
    }

    pub(crate) fn set_trend(&mut self, trend: Trend) {
        self.trend = trend;
    }

    pub(crate) fn record_topic(&mut self, topic: &str) {
        *self.topic_frequency.entry(topic.to_string()).or_insert(0) += 1;
    }

    pub(crate) fn record_flag(&mut self, flag: &str) {
        *self.flagged_pattern_count.entry(flag.to_string()).or_insert(0) += 1;
    }

    pub(crate) fn set_dependency_streak(&mut self, streak: u32) {
        self.dependency_streak = streak;
    }

    pub(crate) fn append_interaction(&mut self, record: InteractionRecord) {
        self.interaction_count += 1;
        self.last_interaction = Some(record.timestamp);
        self.history.push(record);
    }
}

/// Snapshot of a profile's aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub user_id: UserId,
    pub interaction_count: u64,
    pub level: CapabilityLevel,
    pub trend: Trend,
    pub capability_score: f64,
    pub average_score: f64,
    pub dependency_streak: u32,
    pub topic_frequency: BTreeMap<String, u64>,
    pub flagged_pattern_count: BTreeMap<String, u32>,
    pub last_interaction: Option<Timestamp>,
}
