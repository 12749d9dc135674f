// NfvPlace: Learning-Based Placement of Virtual Network Function Chains
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! # Learning Configuration
//!
//! All options of a learning run. The configuration is validated before the first episode
//! starts, and every malformed option results in a [`ConfigError`].

use crate::cost::{CostCurve, CostScope, RewardMode};
use thiserror::Error;

/// # Learning Configuration
///
/// Plain collection of all parameters of a learning run. Start from [`LearningConfig::default`]
/// and override the fields you need:
///
/// ```
/// use nfvplace::config::LearningConfig;
///
/// let config = LearningConfig { training_iterations: 20, step_limit: 10, ..Default::default() };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LearningConfig {
    /// Number of training episodes, run before the final (greedy) reasoning episode
    pub training_iterations: usize,
    /// Maximum number of steps of a single episode
    pub step_limit: usize,
    /// Exploration rate of the first training episode
    pub epsilon: f64,
    /// Factor by which epsilon is multiplied after every training episode
    pub epsilon_decay: f64,
    /// Lower bound of the exploration rate
    pub epsilon_min: f64,
    /// Discount factor of the one-step training target
    pub discount: f64,
    /// Capacity of the replay memory
    pub memory_capacity: usize,
    /// Minimum number of transitions in the replay memory before training starts
    pub start_size: usize,
    /// Number of transitions in every training batch
    pub batch_size: usize,
    /// Number of observed transitions between two training updates
    pub train_frequency: usize,
    /// An episode succeeds if the cost reaches `target_cost * threshold`
    pub threshold: f64,
    /// Mapping from cost to reward
    pub reward_mode: RewardMode,
    /// Resources over which the cost is computed
    pub cost_scope: CostScope,
    /// Piecewise-linear cost curve
    pub cost_curve: CostCurve,
    /// Seed of the random number generator of the agent
    pub seed: u64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            training_iterations: 100,
            step_limit: 100,
            epsilon: 0.3,
            epsilon_decay: 1.0,
            epsilon_min: 0.0,
            discount: 0.99,
            memory_capacity: 100_000,
            start_size: 1024,
            batch_size: 1024,
            train_frequency: 100,
            threshold: 1.0,
            reward_mode: RewardMode::default(),
            cost_scope: CostScope::default(),
            cost_curve: CostCurve::default(),
            seed: 0,
        }
    }
}

impl LearningConfig {
    /// Check every option, and return the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step_limit == 0 {
            return Err(ConfigError::ZeroStepLimit);
        }
        if self.memory_capacity == 0 {
            return Err(ConfigError::ZeroMemoryCapacity);
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if self.train_frequency == 0 {
            return Err(ConfigError::ZeroTrainFrequency);
        }
        if self.start_size > self.memory_capacity {
            let (size, capacity) = (self.start_size, self.memory_capacity);
            return Err(ConfigError::StartSizeExceedsCapacity(size, capacity));
        }
        if !in_unit_interval(self.epsilon) {
            return Err(ConfigError::InvalidEpsilon(self.epsilon));
        }
        if !in_unit_interval(self.epsilon_min) {
            return Err(ConfigError::InvalidEpsilon(self.epsilon_min));
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return Err(ConfigError::InvalidEpsilonDecay(self.epsilon_decay));
        }
        if !in_unit_interval(self.discount) {
            return Err(ConfigError::InvalidDiscount(self.discount));
        }
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        if !self.reward_mode.is_valid() {
            return Err(ConfigError::InvalidRewardMode(self.reward_mode));
        }
        Ok(())
    }

    /// Exploration rate of every training episode. The first episode explores with `epsilon`,
    /// and every following one with the previous rate multiplied by `epsilon_decay`, but never
    /// below `epsilon_min`.
    ///
    /// ```
    /// use nfvplace::config::LearningConfig;
    ///
    /// let config = LearningConfig {
    ///     training_iterations: 3,
    ///     epsilon: 0.4,
    ///     epsilon_decay: 0.5,
    ///     ..Default::default()
    /// };
    /// assert_eq!(config.exploration_schedule().collect::<Vec<_>>(), vec![0.4, 0.2, 0.1]);
    /// ```
    pub fn exploration_schedule(&self) -> impl Iterator<Item = f64> {
        let (decay, min) = (self.epsilon_decay, self.epsilon_min);
        std::iter::successors(Some(self.epsilon), move |eps| Some((eps * decay).max(min)))
            .take(self.training_iterations)
    }
}

fn in_unit_interval(x: f64) -> bool {
    (0.0..=1.0).contains(&x)
}

/// Error of a malformed configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The step limit must be at least 1
    #[error("The step limit must be at least 1")]
    ZeroStepLimit,
    /// The replay memory must hold at least one transition
    #[error("The replay memory capacity must be at least 1")]
    ZeroMemoryCapacity,
    /// Training batches must contain at least one transition
    #[error("The batch size must be at least 1")]
    ZeroBatchSize,
    /// The training frequency must be at least 1
    #[error("The training frequency must be at least 1")]
    ZeroTrainFrequency,
    /// Training would never start
    #[error("The start size {0} exceeds the replay memory capacity {1}")]
    StartSizeExceedsCapacity(usize, usize),
    /// Exploration rate outside of `[0, 1]`
    #[error("Invalid exploration rate: {0}")]
    InvalidEpsilon(f64),
    /// Epsilon decay outside of `(0, 1]`
    #[error("Invalid epsilon decay: {0}")]
    InvalidEpsilonDecay(f64),
    /// Discount factor outside of `[0, 1]`
    #[error("Invalid discount factor: {0}")]
    InvalidDiscount(f64),
    /// Non-positive or non-finite threshold
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(f64),
    /// Negative or non-finite target cost
    #[error("Invalid target cost: {0}")]
    InvalidTargetCost(f64),
    /// Reward mode with non-finite rewards
    #[error("Invalid reward mode: {0:?}")]
    InvalidRewardMode(RewardMode),
    /// Cost curve without any function
    #[error("The cost curve contains no function")]
    EmptyCostCurve,
    /// Cost function with a negative or non-finite slope, or a non-finite intercept
    #[error("Invalid cost function: slope {0}, intercept {1}")]
    InvalidCostFunction(f64, f64),
    /// The value function does not match the model: `(expected, found)` as `(input length,
    /// number of actions)`
    #[error("Value function has shape {1:?}, but the model requires {0:?}")]
    ValueFunctionShape((usize, usize), (usize, usize)),
    /// The initial placement does not match the model: `(expected, found)`
    #[error("Initial placement has length {1}, but the model requires {0}")]
    InitialPlacementLength(usize, usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(LearningConfig::default().validate(), Ok(()));
    }

    #[test]
    fn invalid_options() {
        let c = LearningConfig { memory_capacity: 0, start_size: 0, ..Default::default() };
        assert_eq!(c.validate(), Err(ConfigError::ZeroMemoryCapacity));
        let c = LearningConfig { batch_size: 0, ..Default::default() };
        assert_eq!(c.validate(), Err(ConfigError::ZeroBatchSize));
        let c = LearningConfig { train_frequency: 0, ..Default::default() };
        assert_eq!(c.validate(), Err(ConfigError::ZeroTrainFrequency));
        let c = LearningConfig { step_limit: 0, ..Default::default() };
        assert_eq!(c.validate(), Err(ConfigError::ZeroStepLimit));
        let c = LearningConfig { memory_capacity: 10, ..Default::default() };
        assert_eq!(c.validate(), Err(ConfigError::StartSizeExceedsCapacity(1024, 10)));
        let c = LearningConfig { epsilon: 1.5, ..Default::default() };
        assert_eq!(c.validate(), Err(ConfigError::InvalidEpsilon(1.5)));
        let c = LearningConfig { epsilon_decay: 0.0, ..Default::default() };
        assert_eq!(c.validate(), Err(ConfigError::InvalidEpsilonDecay(0.0)));
        let c = LearningConfig { discount: -0.1, ..Default::default() };
        assert_eq!(c.validate(), Err(ConfigError::InvalidDiscount(-0.1)));
        let c = LearningConfig { threshold: 0.0, ..Default::default() };
        assert_eq!(c.validate(), Err(ConfigError::InvalidThreshold(0.0)));
        let c = LearningConfig { epsilon: f64::NAN, ..Default::default() };
        assert!(matches!(c.validate(), Err(ConfigError::InvalidEpsilon(_))));
    }

    #[test]
    fn exploration_decays_to_the_floor() {
        let c = LearningConfig {
            training_iterations: 4,
            epsilon: 0.5,
            epsilon_decay: 0.5,
            epsilon_min: 0.2,
            ..Default::default()
        };
        assert_eq!(c.exploration_schedule().collect::<Vec<_>>(), vec![0.5, 0.25, 0.2, 0.2]);
        let c = LearningConfig { training_iterations: 3, epsilon: 0.3, ..Default::default() };
        assert_eq!(c.exploration_schedule().collect::<Vec<_>>(), vec![0.3; 3]);
        let c = LearningConfig { training_iterations: 0, ..Default::default() };
        assert_eq!(c.exploration_schedule().count(), 0);
    }
}
