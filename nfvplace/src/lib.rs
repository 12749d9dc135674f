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

#![deny(missing_docs)]

//! # NfvPlace: Learning-Based Placement of Virtual Network Function Chains
//! This is a library for placing the virtual network functions of several service chains onto
//! the servers of a physical network, and routing every traffic demand over a feasible path. The
//! placement space is searched directly by a reinforcement-learning agent.
//!
//! ## Problem Statement
//! Given
//! - a physical network with servers (with a processing capacity) and links (with a capacity),
//! - a set of services, each an ordered chain of functions, with candidate paths and traffic
//!   demands,
//! - an initial placement and a target cost,
//!
//! find a placement of functions on servers, such that every demand is assigned to a path on
//! which every function of its chain is active, no link is overloaded, and the cost derived from
//! the server (or link) utilization reaches the target.
//!
//! ## Structure
//!
//! This library is structured in the following way:
//!
//! - **[`Model`](model)**: Read-only topology and service model. See the main structure
//!   [`Model`](model::Model), which validates the input and computes the layout of the placement
//!   vector.
//!
//! - **[`Environment`](environment)**: Placement bits of every pair of server and function slot,
//!   plus the time step. Actions toggle a single bit.
//!
//! - **[`Feasibility`](feasibility)**: Admissible paths of every service, and the first-fit
//!   assignment of demands to paths, sharing the link utilization across all services.
//!
//! - **[`Utilization`](utilization)**: Which server processes which function for every demand,
//!   and the resulting server and link utilization.
//!
//! - **[`Cost`](cost)**: Piecewise-linear convex cost curves, reward modes, and the
//!   [`Evaluator`](cost::Evaluator) computing all of the above for a placement.
//!
//! - **[`Mask`](mask)**: The legal actions in the current environment.
//!
//! - **[`Learning`](learning)**: Value function interface, replay memory, agent, episode and the
//!   [`PlacementLearner`](learning::PlacementLearner).
//!
//! - **[`Report`](report)**: Summary of the result, including migrations and replications.
//!
//! - **[`ExampleScenarios`](example_scenarios)**: Collection of prepared scenarios.
//!
//! ## Usage
//!
//! Prepare the [`Topology`](model::Topology) and the [`Services`](model::Service), build the
//! [`Model`](model::Model), choose the initial placement and the [configuration](config), and
//! call [`place`] (or [`place_parallel`]).
//!
//! ```
//! use nfvplace::config::LearningConfig;
//! use nfvplace::environment::Environment;
//! use nfvplace::model::{Function, Model, Service, Topology, TrafficFlow};
//! use nfvplace::{place, Error};
//!
//! fn main() -> Result<(), Error> {
//!     // prepare the topology
//!     let mut topo = Topology::new();
//!     let a = topo.add_node("a");
//!     let b = topo.add_node("b");
//!     topo.add_link(a, b, 100.0);
//!     topo.add_server("x0", a, 100.0)?;
//!     topo.add_server("x1", b, 100.0)?;
//!
//!     // prepare the services
//!     let paths = topo.candidate_paths(a, b, None)?;
//!     let service = Service::new(
//!         "chain",
//!         vec![Function::new("fw", 0.5, 0.0, true)],
//!         TrafficFlow::new(paths, vec![20.0]),
//!     );
//!     let model = Model::new(topo, vec![service])?;
//!
//!     // learn the placement
//!     let initial = Environment::empty(&model);
//!     let config = LearningConfig { training_iterations: 10, ..Default::default() };
//!     let result = place(model, initial, 0.2, config)?;
//!
//!     // Do something with the result
//!     println!("{:?}", result.evaluation.server_utilization);
//!
//!     Ok(())
//! }
//! ```

// test modules
pub mod example_scenarios;
mod test;

pub mod config;
pub mod cost;
pub mod environment;
mod error;
pub mod feasibility;
pub mod learning;
pub mod mask;
pub mod model;
pub mod report;
pub mod utilization;

mod place;
pub use place::{place, place_parallel, place_with, DEFAULT_LEARNING_RATE};

pub use error::Error;
