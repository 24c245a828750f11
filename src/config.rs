use std::path::Path;

use serde::Deserialize;

use crate::error::CongruenceError;

/// How the face observations inside one segment window are reduced to a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPolicy {
    /// Plain mode vote, one vote per frame.
    SimpleMode,
    /// Later frames weigh more and frames agreeing with the prior face state get a bonus.
    WeightedRecencyMode,
}

impl WindowPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SimpleMode => "simple_mode",
            Self::WeightedRecencyMode => "weighted_recency_mode",
        }
    }
}

/// Whether the first segment may be flagged as a change point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstSegmentPolicy {
    /// The first segment establishes the baseline and is never a change point.
    Baseline,
    /// The first segment is compared against the initial neutral state.
    CompareToNeutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightStyle {
    /// Names the modalities whose hidden state changed.
    Transitions,
    /// Describes the congruence level of the segment.
    Congruence,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    pub window_policy: WindowPolicy,
    /// Extra weight given to the last frame of a window in weighted recency mode.
    pub recency_weight: f64,
    /// Multiplier for frames matching the prior face state in weighted recency mode.
    pub inertia_bonus: f64,
    pub first_segment: FirstSegmentPolicy,
    pub insight_style: InsightStyle,
    pub timestamp_decimals: u32,
}

impl SyncConfig {
    pub const DEFAULT_RECENCY_WEIGHT: f64 = 1.0;
    pub const DEFAULT_INERTIA_BONUS: f64 = 1.5;
    pub const DEFAULT_TIMESTAMP_DECIMALS: u32 = 2;
    pub const MAX_TIMESTAMP_DECIMALS: u32 = 6;

    pub fn load(path: &Path) -> Result<Self, CongruenceError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| CongruenceError::io("read sync config", e))?;
        serde_json::from_str(&data).map_err(|e| CongruenceError::json("parse sync config", e))
    }

    pub(crate) fn validate(&self) -> Result<(), CongruenceError> {
        if !self.recency_weight.is_finite() || self.recency_weight < 0.0 {
            return Err(CongruenceError::invalid_input(format!(
                "recency_weight must be a finite value >= 0, got {}",
                self.recency_weight
            )));
        }
        if !self.inertia_bonus.is_finite() || self.inertia_bonus <= 0.0 {
            return Err(CongruenceError::invalid_input(format!(
                "inertia_bonus must be a finite value > 0, got {}",
                self.inertia_bonus
            )));
        }
        if self.timestamp_decimals > Self::MAX_TIMESTAMP_DECIMALS {
            return Err(CongruenceError::invalid_input(format!(
                "timestamp_decimals must be <= {}, got {}",
                Self::MAX_TIMESTAMP_DECIMALS,
                self.timestamp_decimals
            )));
        }
        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            window_policy: WindowPolicy::SimpleMode,
            recency_weight: Self::DEFAULT_RECENCY_WEIGHT,
            inertia_bonus: Self::DEFAULT_INERTIA_BONUS,
            first_segment: FirstSegmentPolicy::Baseline,
            insight_style: InsightStyle::Transitions,
            timestamp_decimals: Self::DEFAULT_TIMESTAMP_DECIMALS,
        }
    }
}
