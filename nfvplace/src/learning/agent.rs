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

//! RL Agent

use super::{ReplayMemory, TrainingSample, Transition, ValueFunction};
use crate::config::LearningConfig;
use crate::mask::ActionMask;

use log::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// # Agent
///
/// Owns the value function and the replay memory, which are the only structures that persist
/// across episodes. All random decisions (exploration and batch sampling) are drawn from the
/// seeded generator of the agent, which makes a run reproducible.
#[derive(Debug)]
pub struct Agent<V> {
    value_function: V,
    memory: ReplayMemory,
    rng: StdRng,
    discount: f64,
    start_size: usize,
    batch_size: usize,
    train_frequency: usize,
    num_observed: usize,
    num_updates: usize,
}

impl<V: ValueFunction> Agent<V> {
    /// Create a new agent, with an empty replay memory.
    pub fn new(value_function: V, config: &LearningConfig) -> Self {
        Self {
            value_function,
            memory: ReplayMemory::new(config.memory_capacity),
            rng: StdRng::seed_from_u64(config.seed),
            discount: config.discount,
            start_size: config.start_size,
            batch_size: config.batch_size,
            train_frequency: config.train_frequency,
            num_observed: 0,
            num_updates: 0,
        }
    }

    /// Select an action. With probability `epsilon`, a legal action is chosen uniformly at random.
    /// Otherwise, the legal action with the highest predicted value is chosen. Returns `None` if
    /// no action is legal.
    pub fn select_action(
        &mut self,
        state: &[f64],
        mask: &ActionMask,
        epsilon: f64,
    ) -> Option<usize> {
        if mask.is_empty() {
            return None;
        }
        if epsilon > 0.0 && self.rng.gen::<f64>() < epsilon {
            let legal: Vec<usize> = mask.legal_actions().collect();
            legal.choose(&mut self.rng).copied()
        } else {
            self.greedy_action(state, mask)
        }
    }

    /// Returns the legal action with the highest predicted value. Ties are broken by choosing the
    /// lowest action index.
    pub fn greedy_action(&self, state: &[f64], mask: &ActionMask) -> Option<usize> {
        best_legal(&self.value_function.predict(state), mask).map(|(action, _)| action)
    }

    /// Store the transition in the replay memory. Once the memory holds at least `start_size`
    /// transitions, the value function is trained on a random batch after every
    /// `train_frequency` observed transitions.
    pub fn observe(&mut self, transition: Transition) {
        self.memory.push(transition);
        self.num_observed += 1;
        if self.memory.len() >= self.start_size && self.num_observed % self.train_frequency == 0 {
            self.train();
        }
    }

    /// One-step training target of a transition: the reward for terminal transitions, and the
    /// reward plus the discounted best value of the legal next actions otherwise.
    pub fn target(&self, transition: &Transition) -> f64 {
        let next_value = transition.next_state.as_ref().and_then(|next| {
            best_legal(&self.value_function.predict(next), &transition.next_mask)
                .map(|(_, value)| value)
        });
        match next_value {
            Some(value) => transition.reward + self.discount * value,
            None => transition.reward,
        }
    }

    fn train(&mut self) {
        let samples: Vec<TrainingSample> = self
            .memory
            .sample(&mut self.rng, self.batch_size)
            .into_iter()
            .map(|t| TrainingSample {
                input: t.state.clone(),
                action: t.action,
                target: self.target(t),
            })
            .collect();
        trace!("training update {} with {} samples", self.num_updates, samples.len());
        self.value_function.train(&samples);
        self.num_updates += 1;
    }

    /// Returns the replay memory
    pub fn memory(&self) -> &ReplayMemory {
        &self.memory
    }

    /// Returns the value function
    pub fn value_function(&self) -> &V {
        &self.value_function
    }

    /// Number of transitions observed so far
    pub fn num_observed(&self) -> usize {
        self.num_observed
    }

    /// Number of training updates performed so far
    pub fn num_updates(&self) -> usize {
        self.num_updates
    }
}

/// Returns the legal action with the highest value, and its value. Ties are broken by the lowest
/// action index.
fn best_legal(values: &[f64], mask: &ActionMask) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for action in mask.legal_actions().filter(|a| *a < values.len()) {
        match best {
            Some((_, value)) if values[action] <= value || values[action].is_nan() => {}
            _ => best = Some((action, values[action])),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::LinearValueFunction;

    /// Value function returning fixed values, and recording every training batch
    #[derive(Debug)]
    struct Fixed {
        values: Vec<f64>,
        batches: Vec<Vec<TrainingSample>>,
    }

    impl ValueFunction for Fixed {
        fn input_len(&self) -> usize {
            2
        }
        fn num_actions(&self) -> usize {
            self.values.len()
        }
        fn predict(&self, _input: &[f64]) -> Vec<f64> {
            self.values.clone()
        }
        fn train(&mut self, batch: &[TrainingSample]) {
            self.batches.push(batch.to_vec());
        }
    }

    fn agent(values: Vec<f64>, config: &LearningConfig) -> Agent<Fixed> {
        Agent::new(Fixed { values, batches: Vec::new() }, config)
    }

    fn transition(action: usize, next: Option<Vec<f64>>, next_mask: ActionMask) -> Transition {
        Transition { state: vec![0.0, 0.0], action, reward: -1.0, next_state: next, next_mask }
    }

    #[test]
    fn greedy_selection() {
        let config = LearningConfig::default();
        let mut a = agent(vec![1.0, 5.0, 5.0, 9.0], &config);
        let mask = ActionMask::from_bits(vec![true, true, true, false]);
        assert_eq!(a.select_action(&[0.0, 0.0], &mask, 0.0), Some(1));
        let mask = ActionMask::from_bits(vec![true, false, false, false]);
        assert_eq!(a.select_action(&[0.0, 0.0], &mask, 0.0), Some(0));
        let mask = ActionMask::from_bits(vec![false; 4]);
        assert_eq!(a.select_action(&[0.0, 0.0], &mask, 1.0), None);
    }

    #[test]
    fn exploration_only_chooses_legal_actions() {
        let config = LearningConfig { seed: 7, ..Default::default() };
        let mut a = agent(vec![0.0; 6], &config);
        let mask = ActionMask::from_bits(vec![false, true, false, true, true, false]);
        let mut seen = vec![false; 6];
        for _ in 0..200 {
            let action = a.select_action(&[0.0, 0.0], &mask, 1.0).unwrap();
            assert!(mask.is_legal(action));
            seen[action] = true;
        }
        assert_eq!(seen, vec![false, true, false, true, true, false]);
    }

    #[test]
    fn same_seed_same_choices() {
        let config = LearningConfig { seed: 3, ..Default::default() };
        let mask = ActionMask::all(10);
        let mut a = agent(vec![0.0; 10], &config);
        let mut b = agent(vec![0.0; 10], &config);
        for _ in 0..50 {
            assert_eq!(
                a.select_action(&[0.0, 0.0], &mask, 0.5),
                b.select_action(&[0.0, 0.0], &mask, 0.5)
            );
        }
    }

    #[test]
    fn training_target() {
        let config = LearningConfig { discount: 0.5, ..Default::default() };
        let a = agent(vec![2.0, 8.0, 4.0], &config);
        let terminal = transition(0, None, ActionMask::all(3));
        assert_eq!(a.target(&terminal), -1.0);
        let mask = ActionMask::from_bits(vec![true, false, true]);
        let next = transition(0, Some(vec![1.0, 0.0]), mask);
        assert_eq!(a.target(&next), -1.0 + 0.5 * 4.0);
        let stuck = transition(0, Some(vec![1.0, 0.0]), ActionMask::from_bits(vec![false; 3]));
        assert_eq!(a.target(&stuck), -1.0);
    }

    #[test]
    fn training_schedule() {
        let config = LearningConfig {
            start_size: 4,
            batch_size: 3,
            train_frequency: 2,
            memory_capacity: 10,
            ..Default::default()
        };
        let mut a = agent(vec![0.0, 1.0], &config);
        for i in 0..8 {
            a.observe(transition(i % 2, None, ActionMask::all(2)));
        }
        // trained after the 4th, 6th and 8th transition
        assert_eq!(a.num_updates(), 3);
        assert_eq!(a.num_observed(), 8);
        assert!(a.value_function().batches.iter().all(|b| b.len() == 3));
        assert!(a.value_function().batches.iter().flatten().all(|s| s.target == -1.0));
    }

    #[test]
    fn linear_agent_learns_preference() {
        let config = LearningConfig {
            start_size: 1,
            batch_size: 4,
            train_frequency: 1,
            memory_capacity: 100,
            ..Default::default()
        };
        let mut a = Agent::new(LinearValueFunction::new(2, 2, 0.5), &config);
        for _ in 0..50 {
            a.observe(Transition {
                state: vec![1.0, 0.0],
                action: 1,
                reward: 10.0,
                next_state: None,
                next_mask: ActionMask::all(2),
            });
        }
        assert_eq!(a.greedy_action(&[1.0, 0.0], &ActionMask::all(2)), Some(1));
    }
}
