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

//! # Ring Scenario

use super::ExampleScenario;
use crate::environment::Environment;
use crate::model::{Function, Model, ModelError, Service, Topology, TrafficFlow};

/// # Ring Scenario
///
/// Six nodes connected in a ring. Every link has capacity 100 and a delay of 1. Servers with
/// capacity 100 are attached to `r1`, `r3` and `r5`.
///
/// ```text
///        x0          x1
///        |           |
///   r0 - r1 - r2 -- r3
///   |                |
///   r5 ------------ r4
///   |
///   x2
/// ```
///
/// - Service `secure`: from `r0` to `r3`, firewall (load 0.4, overhead 1) followed by a
///   non-replicable load balancer (load 0.2), two demands of volume 20, maximum delay 4.
/// - Service `nat`: from `r2` to `r5`, NAT (load 0.5), a demand of volume 30.
/// - Service `dpi`: from `r4` to `r0`, deep packet inspection (load 0.8, processing delay 1), a
///   demand of volume 10, maximum delay 4. The long way around the ring exceeds the delay bound,
///   only `r4 -> r5 -> r0` remains.
///
/// # Variant 0
/// Empty initial placement.
///
/// # Variant 1
/// Every function is placed on `x0`, which is not reachable by service `dpi`.
#[derive(Debug)]
pub struct RingScenario {}

impl ExampleScenario for RingScenario {
    fn model(_variant: usize) -> Result<Model, ModelError> {
        let mut t = Topology::new();
        let r: Vec<_> = (0..6).map(|i| t.add_node(format!("r{}", i))).collect();
        for i in 0..6 {
            t.add_link_with_delay(r[i], r[(i + 1) % 6], 100.0, 1.0);
        }
        t.add_server("x0", r[1], 100.0)?;
        t.add_server("x1", r[3], 100.0)?;
        t.add_server("x2", r[5], 100.0)?;

        let secure = Service::new(
            "secure",
            vec![
                Function::new("fw", 0.4, 1.0, true).with_processing_delay(0.5),
                Function::new("lb", 0.2, 0.0, false).with_processing_delay(0.5),
            ],
            TrafficFlow::new(t.candidate_paths(r[0], r[3], None)?, vec![20.0, 20.0]),
        )
        .with_max_delay(4.0);
        let nat = Service::new(
            "nat",
            vec![Function::new("nat", 0.5, 0.0, true)],
            TrafficFlow::new(t.candidate_paths(r[2], r[5], None)?, vec![30.0]),
        );
        let dpi = Service::new(
            "dpi",
            vec![Function::new("dpi", 0.8, 0.0, true).with_processing_delay(1.0)],
            TrafficFlow::new(t.candidate_paths(r[4], r[0], None)?, vec![10.0]),
        )
        .with_max_delay(4.0);
        Model::new(t, vec![secure, nat, dpi])
    }

    fn initial_placement(model: &Model, variant: usize) -> Result<Environment, ModelError> {
        match variant {
            1 => Environment::from_activations(
                model,
                &[(0, 0, 0), (0, 0, 1), (0, 1, 0), (0, 2, 0)],
            ),
            _ => Ok(Environment::empty(model)),
        }
    }

    fn target_cost(_variant: usize) -> f64 {
        0.2
    }
}
