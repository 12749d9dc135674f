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

//! # Diamond Scenario

use super::ExampleScenario;
use crate::environment::Environment;
use crate::model::{Function, Model, ModelError, Service, Topology, TrafficFlow};

/// # Diamond Scenario
///
/// Two services from `n0` to `n3`, which can take the upper or the lower path. Servers are
/// attached to `n1`, `n2` and `n3`, all with capacity 100, and all links have capacity 100.
///
/// ```text
///        x0
///        |
///   .--- n1 ---.
///  /            \
/// n0             n3 -- x2
///  \            /
///   '--- n2 ---'
///        |
///        x1
/// ```
///
/// - Service `web`: firewall (load 0.5, overhead 2) followed by an IDS (load 0.5), with two
///   demands of volume 30.
/// - Service `voip`: NAT (load 1.0), with a demand of volume 20.
///
/// # Variant 0
/// Empty initial placement.
///
/// # Variant 1
/// Every function is placed on `x0`.
#[derive(Debug)]
pub struct DiamondScenario {}

impl ExampleScenario for DiamondScenario {
    fn model(_variant: usize) -> Result<Model, ModelError> {
        let mut t = Topology::new();
        let n0 = t.add_node("n0");
        let n1 = t.add_node("n1");
        let n2 = t.add_node("n2");
        let n3 = t.add_node("n3");
        t.add_link(n0, n1, 100.0);
        t.add_link(n0, n2, 100.0);
        t.add_link(n1, n3, 100.0);
        t.add_link(n2, n3, 100.0);
        t.add_server("x0", n1, 100.0)?;
        t.add_server("x1", n2, 100.0)?;
        t.add_server("x2", n3, 100.0)?;

        let web = Service::new(
            "web",
            vec![Function::new("fw", 0.5, 2.0, true), Function::new("ids", 0.5, 0.0, true)],
            TrafficFlow::new(t.candidate_paths(n0, n3, None)?, vec![30.0, 30.0]),
        );
        let voip = Service::new(
            "voip",
            vec![Function::new("nat", 1.0, 0.0, true)],
            TrafficFlow::new(t.candidate_paths(n0, n3, None)?, vec![20.0]),
        );
        Model::new(t, vec![web, voip])
    }

    fn initial_placement(model: &Model, variant: usize) -> Result<Environment, ModelError> {
        match variant {
            1 => Environment::from_activations(model, &[(0, 0, 0), (0, 0, 1), (0, 1, 0)]),
            _ => Ok(Environment::empty(model)),
        }
    }

    fn target_cost(_variant: usize) -> f64 {
        0.3
    }
}
