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

//! Value function approximators

/// Training sample: move the value of `action` at `input` towards `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    /// Input vector (environment state)
    pub input: Vec<f64>,
    /// Action whose value is trained
    pub action: usize,
    /// Target value of the action
    pub target: f64,
}

/// # Value Function
///
/// Approximator of the action values. The learning loop only needs to predict the value of every
/// action for an input vector, and to train the approximator on a batch of samples. The values of
/// actions without a sample in the batch should be left (approximately) untouched.
pub trait ValueFunction {
    /// Length of the input vector
    fn input_len(&self) -> usize;

    /// Number of actions, which is the length of the output of [`ValueFunction::predict`]
    fn num_actions(&self) -> usize;

    /// Predict the value of every action
    fn predict(&self, input: &[f64]) -> Vec<f64>;

    /// Perform one training update with the given batch
    fn train(&mut self, batch: &[TrainingSample]);
}

/// # Linear Value Function
///
/// Independent linear model per action, `q(s, a) = w_a · s + b_a`, trained with normalized least
/// mean squares. The update is scaled by `1 / (1 + |s|²)`, which keeps it stable for any learning
/// rate in `(0, 2)`, even though the time step in the input grows without bound.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearValueFunction {
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
    learning_rate: f64,
}

impl LinearValueFunction {
    /// Create a new value function, with all weights set to zero.
    pub fn new(input_len: usize, num_actions: usize, learning_rate: f64) -> Self {
        Self {
            weights: vec![vec![0.0; input_len]; num_actions],
            bias: vec![0.0; num_actions],
            learning_rate,
        }
    }

    /// Returns the learning rate
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn value(&self, action: usize, input: &[f64]) -> f64 {
        self.weights[action].iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + self.bias[action]
    }
}

impl ValueFunction for LinearValueFunction {
    fn input_len(&self) -> usize {
        self.weights.first().map(|w| w.len()).unwrap_or(0)
    }

    fn num_actions(&self) -> usize {
        self.bias.len()
    }

    fn predict(&self, input: &[f64]) -> Vec<f64> {
        (0..self.num_actions()).map(|a| self.value(a, input)).collect()
    }

    fn train(&mut self, batch: &[TrainingSample]) {
        let num_actions = self.bias.len();
        for sample in batch.iter().filter(|s| s.action < num_actions) {
            let error = sample.target - self.value(sample.action, &sample.input);
            let norm = 1.0 + sample.input.iter().map(|x| x * x).sum::<f64>();
            let step = self.learning_rate * error / norm;
            self.weights[sample.action].iter_mut().zip(sample.input.iter()).for_each(|(w, x)| {
                *w += step * x;
            });
            self.bias[sample.action] += step;
        }
    }
}
