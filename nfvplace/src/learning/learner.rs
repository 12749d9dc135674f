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

//! Placement learner

use super::{run_episode, Agent, EpisodeOutcome, EpisodeState, ValueFunction};
use crate::config::{ConfigError, LearningConfig};
use crate::cost::Evaluation;
use crate::environment::Environment;
use crate::model::Model;

use log::*;

/// # Placement Learner
///
/// Runs the learning heuristic on a model: `training_iterations` episodes with a (decaying)
/// positive exploration rate, followed by one greedy reasoning episode, whose outcome is the
/// result. Every episode starts from a copy of the initial environment. Only the agent (value
/// function and replay memory) persists across episodes.
///
/// ```
/// use nfvplace::config::LearningConfig;
/// use nfvplace::example_scenarios::{ExampleScenario, LineScenario};
/// use nfvplace::learning::{LinearValueFunction, PlacementLearner};
///
/// let model = LineScenario::model(0).unwrap();
/// let initial = LineScenario::initial_placement(&model, 0).unwrap();
/// let config = LearningConfig { training_iterations: 5, step_limit: 10, ..Default::default() };
/// let vf = LinearValueFunction::new(model.state_len(), model.num_actions(), 0.1);
/// let mut learner = PlacementLearner::new(model, initial, 0.3, config, vf).unwrap();
/// let result = learner.work();
/// assert!(result.is_feasible());
/// ```
#[derive(Debug)]
pub struct PlacementLearner<V> {
    model: Model,
    initial: Environment,
    target_cost: f64,
    config: LearningConfig,
    agent: Agent<V>,
}

impl<V: ValueFunction> PlacementLearner<V> {
    /// Create a new learner. The configuration, the target cost and the shape of the value
    /// function and the initial environment are checked before any episode is run.
    pub fn new(
        model: Model,
        initial: Environment,
        target_cost: f64,
        config: LearningConfig,
        value_function: V,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if !(target_cost.is_finite() && target_cost >= 0.0) {
            return Err(ConfigError::InvalidTargetCost(target_cost));
        }
        let expected = (model.state_len(), model.num_actions());
        let found = (value_function.input_len(), value_function.num_actions());
        if expected != found {
            return Err(ConfigError::ValueFunctionShape(expected, found));
        }
        if initial.placement().len() != model.num_actions() {
            return Err(ConfigError::InitialPlacementLength(
                model.num_actions(),
                initial.placement().len(),
            ));
        }
        let agent = Agent::new(value_function, &config);
        Ok(Self { model, initial, target_cost, config, agent })
    }

    /// Returns the model
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Returns the agent
    pub fn agent(&self) -> &Agent<V> {
        &self.agent
    }

    /// Cost below which an episode succeeds: `target_cost * threshold`
    pub fn objective(&self) -> f64 {
        self.target_cost * self.config.threshold
    }

    /// Run all training episodes followed by the reasoning episode.
    pub fn work(&mut self) -> PlacementResult {
        let objective = self.objective();
        let training_epsilon: Vec<f64> = self.config.exploration_schedule().collect();
        let mut training_steps = Vec::with_capacity(training_epsilon.len());
        let mut num_successful = 0;

        for (i, epsilon) in training_epsilon.iter().enumerate() {
            let outcome = self.run(objective, *epsilon);
            info!("iteration {} (epsilon {:.4}) -> {} steps", i, epsilon, outcome.steps);
            if outcome.state == EpisodeState::Success {
                num_successful += 1;
            }
            training_steps.push(outcome.steps);
        }

        let outcome = self.run(objective, 0.0);
        info!("reasoning in -> {} steps", outcome.steps);
        info!("finished [{}] in state {:?}", outcome.evaluation.cost, outcome.state);

        PlacementResult {
            initial: self.initial.clone(),
            state: outcome.state,
            steps: outcome.steps,
            environment: outcome.environment,
            evaluation: outcome.evaluation,
            training_steps,
            training_epsilon,
            num_successful,
        }
    }

    fn run(&mut self, objective: f64, epsilon: f64) -> EpisodeOutcome {
        run_episode(&self.model, &self.initial, objective, epsilon, &self.config, &mut self.agent)
    }
}

/// Result of a learning run: the outcome of the reasoning episode, together with some statistics
/// about the training episodes.
#[derive(Debug, Clone)]
pub struct PlacementResult {
    /// Initial environment of every episode
    pub initial: Environment,
    /// Terminal state of the reasoning episode
    pub state: EpisodeState,
    /// Number of steps of the reasoning episode
    pub steps: usize,
    /// Final environment of the reasoning episode
    pub environment: Environment,
    /// Evaluation of the final environment
    pub evaluation: Evaluation,
    /// Number of steps of every training episode
    pub training_steps: Vec<usize>,
    /// Exploration rate of every training episode
    pub training_epsilon: Vec<f64>,
    /// Number of training episodes which reached the target
    pub num_successful: usize,
}

impl PlacementResult {
    /// Returns true if every demand of the final placement is assigned to a path.
    pub fn is_feasible(&self) -> bool {
        self.evaluation.is_feasible()
    }

    /// Cost of the final placement
    pub fn cost(&self) -> f64 {
        self.evaluation.cost
    }

    /// Returns true if the reasoning episode reached the target cost.
    pub fn is_success(&self) -> bool {
        self.state == EpisodeState::Success
    }
}
