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

//! # Line Scenario

use super::ExampleScenario;
use crate::environment::Environment;
use crate::model::{Function, Model, ModelError, Service, Topology, TrafficFlow};

/// # Line Scenario
///
/// Two nodes connected by a single link of capacity 200. Each node hosts a server with capacity
/// 100. A single service with a single function (load ratio 0.5, no overhead) uses the only path
/// `n0 -> n1`.
///
/// ```text
/// x0       x1
/// |        |
/// n0 ----- n1
/// ```
///
/// # Variant 0
/// One demand of volume 40.
///
/// # Variant 1
/// One demand of volume 250, which exceeds the link capacity.
#[derive(Debug)]
pub struct LineScenario {}

impl ExampleScenario for LineScenario {
    fn model(variant: usize) -> Result<Model, ModelError> {
        let mut t = Topology::new();
        let n0 = t.add_node("n0");
        let n1 = t.add_node("n1");
        t.add_link(n0, n1, 200.0);
        t.add_server("x0", n0, 100.0)?;
        t.add_server("x1", n1, 100.0)?;

        let demand = if variant == 1 { 250.0 } else { 40.0 };
        let path = t.path(vec![n0, n1])?;
        let service = Service::new(
            "chain",
            vec![Function::new("f0", 0.5, 0.0, true)],
            TrafficFlow::new(vec![path], vec![demand]),
        );
        Model::new(t, vec![service])
    }

    /// Empty placement for every variant
    fn initial_placement(model: &Model, _variant: usize) -> Result<Environment, ModelError> {
        Ok(Environment::empty(model))
    }

    fn target_cost(_variant: usize) -> f64 {
        0.3
    }
}
