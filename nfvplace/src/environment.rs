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

//! # Environment
//!
//! The environment state of the learning loop: one placement bit for every pair of server and
//! function slot (see [`Model`](crate::model::Model) for the layout), plus the current time step.

use crate::config::ConfigError;
use crate::model::{Model, ModelError, ServerId};

/// # Environment State
///
/// Placement bits and the time step. The state is converted to the input vector of the value
/// function by [`Environment::to_input`], which has length `num_actions + 1`, where the last
/// element holds the time step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    placement: Vec<bool>,
    total_slots: usize,
    time_step: usize,
}

impl Environment {
    /// Create an environment where no function is active on any server.
    pub fn empty(model: &Model) -> Self {
        Self {
            placement: vec![false; model.num_actions()],
            total_slots: model.total_slots(),
            time_step: 0,
        }
    }

    /// Create an environment from a placement vector, indexed by the action index of every pair
    /// of server and slot. Returns an error if the length does not match the model.
    pub fn from_placement(model: &Model, placement: Vec<bool>) -> Result<Self, ConfigError> {
        if placement.len() != model.num_actions() {
            return Err(ConfigError::InitialPlacementLength(model.num_actions(), placement.len()));
        }
        Ok(Self { placement, total_slots: model.total_slots(), time_step: 0 })
    }

    /// Create an environment where exactly the given `(server, service, function)` triples are
    /// active.
    pub fn from_activations(
        model: &Model,
        activations: &[(ServerId, usize, usize)],
    ) -> Result<Self, ModelError> {
        let mut env = Self::empty(model);
        for (x, s, v) in activations.iter().copied() {
            model.topology().server(x)?;
            let num_functions = model.service(s)?.functions().len();
            if v >= num_functions {
                return Err(ModelError::IndexOutOfRange("function", v));
            }
            env.set_active(x, model.slot(s, v), true);
        }
        Ok(env)
    }

    /// Returns the placement bits, indexed by action
    pub fn placement(&self) -> &[bool] {
        &self.placement
    }

    /// Returns true if the function slot is active on the server
    pub fn is_active(&self, server: ServerId, slot: usize) -> bool {
        self.placement[server * self.total_slots + slot]
    }

    /// Activate or deactivate a function slot on a server
    pub fn set_active(&mut self, server: ServerId, slot: usize, active: bool) {
        self.placement[server * self.total_slots + slot] = active;
    }

    /// Returns an iterator over all servers on which the slot is active
    pub fn active_servers(&self, slot: usize) -> impl Iterator<Item = ServerId> + '_ {
        let num_servers = self.placement.len() / self.total_slots.max(1);
        (0..num_servers).filter(move |x| self.is_active(*x, slot))
    }

    /// Returns the number of active placement bits
    pub fn num_active(&self) -> usize {
        self.placement.iter().filter(|b| **b).count()
    }

    /// Returns the current time step
    pub fn time_step(&self) -> usize {
        self.time_step
    }

    /// Set the current time step
    pub fn set_time_step(&mut self, time_step: usize) {
        self.time_step = time_step;
    }

    /// Returns the input vector for the value function: one element (`0.0` or `1.0`) per
    /// placement bit, followed by the time step.
    pub fn to_input(&self) -> Vec<f64> {
        self.placement
            .iter()
            .map(|b| if *b { 1.0 } else { 0.0 })
            .chain(std::iter::once(self.time_step as f64))
            .collect()
    }

    /// Apply a placement action by toggling its bit. When a non-replicable function is activated
    /// on a server, it is first removed from all other servers.
    ///
    /// **Panics** if the action is out of range.
    pub fn apply(&mut self, model: &Model, action: usize) {
        let (x, slot) = model.decode_action(action);
        let activate = !self.placement[action];
        if activate && !model.slot_function(slot).is_replicable() {
            for y in 0..model.num_servers() {
                self.set_active(y, slot, false);
            }
        }
        self.placement[action] = activate;
        debug_assert_eq!(self.is_active(x, slot), activate);
    }
}
