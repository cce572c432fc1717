//! Reducer configuration

use crate::cost::CostModel;
use serde::{Deserialize, Serialize};

/// Reduction applied to a mesh when it is first registered.
pub const DEFAULT_REDUCTION_PERCENT: f32 = 20.0;

/// Settings shared by every mesh a reducer manages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReducerConfig {
    /// How collapse candidates are ranked
    pub cost_model: CostModel,
    /// Percentage of non-seam vertices to collapse, in [0, 100]
    pub reduction_percent: f32,
}

impl Default for ReducerConfig {
    fn default() -> Self {
        Self {
            cost_model: CostModel::default(),
            reduction_percent: DEFAULT_REDUCTION_PERCENT,
        }
    }
}

impl ReducerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cost_model(mut self, cost_model: CostModel) -> Self {
        self.cost_model = cost_model;
        self
    }

    pub fn with_reduction_percent(mut self, reduction_percent: f32) -> Self {
        self.reduction_percent = reduction_percent;
        self
    }
}
