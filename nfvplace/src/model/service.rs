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

//! # Service Model
//!
//! A service is an ordered chain of virtual network functions, together with a traffic flow. The
//! traffic flow knows the candidate paths (attached when the service is configured) and the
//! traffic demands which need to be routed over one of these paths.

use crate::model::{ModelError, Path, Topology, Traffic};

/// # Virtual Network Function
/// One stage in a service chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    name: String,
    load_ratio: f64,
    overhead: f64,
    replicable: bool,
    processing_delay: f64,
}

impl Function {
    /// Create a new function without processing delay.
    ///
    /// - `load_ratio`: server load per unit of processed traffic
    /// - `overhead`: fixed load (scaled by the load ratio) caused by running the function at all
    /// - `replicable`: if false, the function may only be active on a single server at a time
    pub fn new(name: impl Into<String>, load_ratio: f64, overhead: f64, replicable: bool) -> Self {
        Self { name: name.into(), load_ratio, overhead, replicable, processing_delay: 0.0 }
    }

    /// Set the processing delay of the function
    pub fn with_processing_delay(mut self, delay: f64) -> Self {
        self.processing_delay = delay;
        self
    }

    /// Returns the name of the function
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the load ratio
    pub fn load_ratio(&self) -> f64 {
        self.load_ratio
    }

    /// Returns the overhead
    pub fn overhead(&self) -> f64 {
        self.overhead
    }

    /// Returns true if the function may run on multiple servers at the same time
    pub fn is_replicable(&self) -> bool {
        self.replicable
    }

    /// Returns the processing delay
    pub fn processing_delay(&self) -> f64 {
        self.processing_delay
    }
}

/// # Traffic Flow
/// Candidate paths and traffic demands of a service.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficFlow {
    paths: Vec<Path>,
    demands: Vec<Traffic>,
}

impl TrafficFlow {
    /// Create a new traffic flow
    pub fn new(paths: Vec<Path>, demands: Vec<Traffic>) -> Self {
        Self { paths, demands }
    }

    /// Returns the candidate paths, in their configured order
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Returns the traffic demands
    pub fn demands(&self) -> &[Traffic] {
        &self.demands
    }

    /// Returns the sum of all demands
    pub fn total_traffic(&self) -> Traffic {
        self.demands.iter().sum()
    }

    pub(crate) fn retain_paths<F: FnMut(&Path) -> bool>(&mut self, f: F) {
        self.paths.retain(f)
    }
}

/// # Service
/// Service chain with its traffic flow.
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    name: String,
    functions: Vec<Function>,
    flow: TrafficFlow,
    max_delay: Option<f64>,
}

impl Service {
    /// Create a new service without a delay bound
    pub fn new(name: impl Into<String>, functions: Vec<Function>, flow: TrafficFlow) -> Self {
        Self { name: name.into(), functions, flow, max_delay: None }
    }

    /// Set the maximum end-to-end delay of the service. Candidate paths exceeding it are dropped
    /// when the [`Model`](crate::model::Model) is built.
    pub fn with_max_delay(mut self, max_delay: f64) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    /// Returns the name of the service
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the function chain
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// Returns the traffic flow
    pub fn flow(&self) -> &TrafficFlow {
        &self.flow
    }

    /// Returns the maximum delay, if any
    pub fn max_delay(&self) -> Option<f64> {
        self.max_delay
    }

    pub(crate) fn flow_mut(&mut self) -> &mut TrafficFlow {
        &mut self.flow
    }

    /// Total delay of the service when routed over `path`: the propagation delay of every link,
    /// plus the processing delay of every function in the chain.
    pub fn path_delay(&self, topo: &Topology, path: &Path) -> Result<f64, ModelError> {
        let mut delay: f64 = self.functions.iter().map(|f| f.processing_delay).sum();
        for l in path.links() {
            delay += topo.link(*l)?.delay;
        }
        Ok(delay)
    }
}
