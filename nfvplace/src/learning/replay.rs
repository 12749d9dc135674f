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

//! Replay memory

use crate::mask::ActionMask;

use rand::seq::index;
use rand::Rng;
use std::collections::VecDeque;

/// Transition observed by the agent. Terminal transitions carry no next state.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Input vector before the action
    pub state: Vec<f64>,
    /// Chosen action
    pub action: usize,
    /// Reward of the action
    pub reward: f64,
    /// Input vector after the action, or `None` if the episode terminated
    pub next_state: Option<Vec<f64>>,
    /// Legal actions in the next state
    pub next_mask: ActionMask,
}

/// # Replay Memory
///
/// Ring buffer of transitions with a fixed capacity. Pushing into a full memory evicts the oldest
/// transition.
#[derive(Debug, Clone)]
pub struct ReplayMemory {
    capacity: usize,
    transitions: VecDeque<Transition>,
}

impl ReplayMemory {
    /// Create an empty replay memory. A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { capacity, transitions: VecDeque::with_capacity(capacity.min(4096)) }
    }

    /// Store a transition, evicting the oldest one if the memory is full.
    pub fn push(&mut self, transition: Transition) {
        if self.transitions.len() == self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Number of stored transitions
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Returns true if no transition is stored
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Maximum number of stored transitions
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over all stored transitions, from the oldest to the most recent one.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter()
    }

    /// Sample up to `amount` distinct transitions uniformly at random.
    pub fn sample<R: Rng>(&self, rng: &mut R, amount: usize) -> Vec<&Transition> {
        let amount = amount.min(self.transitions.len());
        index::sample(rng, self.transitions.len(), amount)
            .into_iter()
            .map(|i| &self.transitions[i])
            .collect()
    }
}
