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

//! Episode of the environment-agent interaction

use super::{Agent, Transition, ValueFunction};
use crate::config::LearningConfig;
use crate::cost::{Evaluation, Evaluator};
use crate::environment::Environment;
use crate::mask::legal_actions;
use crate::model::{printer, Model};

use log::*;

/// State of an episode. All states except `Running` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeState {
    /// The episode is still running
    Running,
    /// The cost reached the target
    Success,
    /// The step limit was reached before the cost reached the target
    StepLimitReached,
    /// No action was legal
    NoLegalAction,
}

impl EpisodeState {
    /// Returns true if the state is terminal
    pub fn is_terminal(&self) -> bool {
        *self != Self::Running
    }
}

/// Outcome of a finished episode
#[derive(Debug, Clone)]
pub struct EpisodeOutcome {
    /// Terminal state of the episode
    pub state: EpisodeState,
    /// Number of performed steps
    pub steps: usize,
    /// Environment at the end of the episode
    pub environment: Environment,
    /// Evaluation of the final environment
    pub evaluation: Evaluation,
    /// Sum of all rewards of the episode
    pub total_reward: f64,
}

/// Run a single episode, starting from a copy of `initial`, until a terminal state is reached.
///
/// In every step, the legal actions are computed. If there is none, the episode ends with
/// [`EpisodeState::NoLegalAction`]. Otherwise, the agent chooses an action, the action is applied
/// and the new placement is evaluated. The episode succeeds as soon as the cost is at most
/// `objective`, in which case the transition is stored without a next state. Otherwise, the
/// episode continues until `config.step_limit` steps are performed.
pub fn run_episode<V: ValueFunction>(
    model: &Model,
    initial: &Environment,
    objective: f64,
    epsilon: f64,
    config: &LearningConfig,
    agent: &mut Agent<V>,
) -> EpisodeOutcome {
    let evaluator = Evaluator::new(config.cost_curve.clone(), config.cost_scope);
    let mut env = initial.clone();
    env.set_time_step(0);

    let mut state = EpisodeState::Running;
    let mut steps: usize = 0;
    let mut previous: Option<usize> = None;
    let mut evaluation: Option<Evaluation> = None;
    let mut total_reward = 0.0;

    while !state.is_terminal() {
        let input = env.to_input();
        let mask = legal_actions(model, &env, previous);
        let action = match agent.select_action(&input, &mask, epsilon) {
            Some(action) => action,
            None => {
                state = EpisodeState::NoLegalAction;
                break;
            }
        };

        env.apply(model, action);
        previous = Some(action);
        let next_mask = legal_actions(model, &env, previous);
        let eval = evaluator.evaluate(model, &env);
        let reward = config.reward_mode.reward(eval.cost, objective);
        total_reward += reward;
        steps += 1;
        env.set_time_step(steps);

        if log_enabled!(Level::Trace) {
            trace!(
                "step {}: {} -> cost {}, reward {}",
                steps,
                printer::action(model, action).unwrap_or_else(|_| action.to_string()),
                eval.cost,
                reward
            );
        }

        if eval.cost <= objective {
            agent.observe(Transition { state: input, action, reward, next_state: None, next_mask });
            state = EpisodeState::Success;
        } else {
            let next_state = Some(env.to_input());
            agent.observe(Transition { state: input, action, reward, next_state, next_mask });
            if steps >= config.step_limit {
                state = EpisodeState::StepLimitReached;
            }
        }
        evaluation = Some(eval);
    }

    let evaluation = evaluation.unwrap_or_else(|| evaluator.evaluate(model, &env));
    debug!("episode finished in state {:?} after {} steps, cost {}", state, steps, evaluation.cost);

    EpisodeOutcome { state, steps, environment: env, evaluation, total_reward }
}
