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

//! # Action Mask
//!
//! Computes which placement actions are legal in the current environment. An action is illegal
//! if it repeats the previous action, or if it would activate a function on a server that no
//! candidate path of its service traverses, or on a server whose projected load would reach its
//! capacity. Deactivating a function is always legal (except for the repeat rule).

use crate::environment::Environment;
use crate::model::{Model, ServerId};

/// Bit vector over all actions, `true` for every legal action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMask {
    legal: Vec<bool>,
}

impl ActionMask {
    /// Create a mask from the raw bit vector
    pub fn from_bits(legal: Vec<bool>) -> Self {
        Self { legal }
    }

    /// Mask where every one of the `num_actions` actions is legal
    pub fn all(num_actions: usize) -> Self {
        Self { legal: vec![true; num_actions] }
    }

    /// Returns true if the action is legal. Actions out of range are illegal.
    pub fn is_legal(&self, action: usize) -> bool {
        self.legal.get(action).copied().unwrap_or(false)
    }

    /// Returns true if no action is legal.
    pub fn is_empty(&self) -> bool {
        !self.legal.iter().any(|b| *b)
    }

    /// Returns an iterator over all legal actions, in increasing order.
    pub fn legal_actions(&self) -> impl Iterator<Item = usize> + '_ {
        self.legal.iter().enumerate().filter(|(_, b)| **b).map(|(a, _)| a)
    }

    /// Returns the number of legal actions
    pub fn count(&self) -> usize {
        self.legal.iter().filter(|b| **b).count()
    }

    /// Returns the total number of actions (legal and illegal)
    pub fn len(&self) -> usize {
        self.legal.len()
    }
}

/// Compute the mask of legal actions for the current environment, given the previous action of
/// the episode (if any).
pub fn legal_actions(model: &Model, env: &Environment, previous: Option<usize>) -> ActionMask {
    let traffic: Vec<f64> =
        (0..model.num_servers()).map(|x| server_traffic(model, env, x)).collect();
    let legal = (0..model.num_actions())
        .map(|action| {
            if previous == Some(action) {
                return false;
            }
            if env.placement()[action] {
                // deactivation
                return true;
            }
            let (x, slot) = model.decode_action(action);
            let (s, _) = model.slot_owner(slot);
            if !model.service_reaches_server(s, x) {
                return false;
            }
            let capacity = model.topology().servers()[x].capacity();
            traffic[x] + model.max_demand_load() < capacity
        })
        .collect();
    ActionMask { legal }
}

/// Traffic processed by all functions active on the server, assuming every demand of a service
/// is processed there: sum of `load_ratio * total_traffic` over all active slots.
pub fn server_traffic(model: &Model, env: &Environment, server: ServerId) -> f64 {
    (0..model.total_slots())
        .filter(|slot| env.is_active(server, *slot))
        .map(|slot| {
            let (s, _) = model.slot_owner(slot);
            model.slot_function(slot).load_ratio() * model.services()[s].flow().total_traffic()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Function, Service, Topology, TrafficFlow};

    /// Two servers with the given capacity, one link between them and one service with a single
    /// function and a single demand.
    fn model(capacity: f64, demand: f64) -> Model {
        let mut t = Topology::new();
        let n0 = t.add_node("n0");
        let n1 = t.add_node("n1");
        let n2 = t.add_node("n2");
        t.add_link(n0, n1, 200.0);
        t.add_link(n1, n2, 200.0);
        t.add_server("x0", n0, capacity).unwrap();
        t.add_server("x1", n1, capacity).unwrap();
        t.add_server("x2", n2, capacity).unwrap();
        let p = t.path(vec![n0, n1]).unwrap();
        let s = Service::new(
            "s0",
            vec![Function::new("f0", 0.5, 0.0, true)],
            TrafficFlow::new(vec![p], vec![demand]),
        );
        Model::new(t, vec![s]).unwrap()
    }

    #[test]
    fn unreachable_servers_are_illegal() {
        let m = model(100.0, 40.0);
        let env = Environment::empty(&m);
        let mask = legal_actions(&m, &env, None);
        assert_eq!(mask.legal_actions().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(mask.count(), 2);
        assert_eq!(mask.len(), 3);
        assert!(!mask.is_legal(2));
        assert!(!mask.is_legal(17));
    }

    #[test]
    fn previous_action_is_illegal() {
        let m = model(100.0, 40.0);
        let mut env = Environment::empty(&m);
        env.apply(&m, 0);
        let mask = legal_actions(&m, &env, Some(0));
        assert!(!mask.is_legal(0));
        assert!(mask.is_legal(1));
    }

    #[test]
    fn deactivation_is_always_legal() {
        let m = model(30.0, 40.0);
        let mut env = Environment::empty(&m);
        env.apply(&m, 1);
        let mask = legal_actions(&m, &env, None);
        assert!(mask.is_legal(1));
    }

    #[test]
    fn capacity_check() {
        // max demand load is 20, which reaches the capacity
        let m = model(20.0, 40.0);
        let env = Environment::empty(&m);
        assert!(legal_actions(&m, &env, None).is_empty());

        let m = model(20.1, 40.0);
        let env = Environment::empty(&m);
        assert_eq!(legal_actions(&m, &env, None).count(), 2);
    }

    #[test]
    fn empty_mask() {
        let mask = ActionMask::from_bits(vec![false, false]);
        assert!(mask.is_empty());
        assert!(!ActionMask::all(2).is_empty());
        assert_eq!(mask.legal_actions().count(), 0);
    }
}
