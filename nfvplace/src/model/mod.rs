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

#![deny(missing_docs, missing_debug_implementations)]

//! # Model
//!
//! Read-only input of the placement problem: the physical [`Topology`] with its servers and
//! links, and the [`Service`] chains with their traffic flows. A [`Model`] bundles both, validates
//! them once, and precomputes the lookups needed in every learning step.
//!
//! ## Function Slots and Actions
//!
//! All functions of all services are flattened into *function slots*: the functions of service 0
//! come first (in chain order), followed by the functions of service 1, and so on. The placement
//! of the environment holds one bit for every pair of server and function slot, and the action
//! with index `server * total_slots + slot` toggles exactly that bit.
//!
//! ## Example usage
//!
//! ```rust
//! use nfvplace::model::{Function, Model, Service, Topology, TrafficFlow};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut t = Topology::new();
//!     let n0 = t.add_node("n0");
//!     let n1 = t.add_node("n1");
//!     t.add_link(n0, n1, 200.0);
//!     t.add_server("x0", n0, 100.0)?;
//!     t.add_server("x1", n1, 100.0)?;
//!
//!     let path = t.path(vec![n0, n1])?;
//!     let service = Service::new(
//!         "s0",
//!         vec![Function::new("fw", 0.5, 0.0, true)],
//!         TrafficFlow::new(vec![path], vec![40.0]),
//!     );
//!
//!     let model = Model::new(t, vec![service])?;
//!     assert_eq!(model.num_actions(), 2);
//!     assert_eq!(model.path_servers(0, 0), &[0, 1]);
//!     Ok(())
//! }
//! ```

mod service;
mod topology;
mod types;
pub mod printer;

pub use service::{Function, Service, TrafficFlow};
pub use topology::{Path, Server, Topology};
pub use types::{Link, LinkId, ModelError, NodeId, PhysicalNetwork, ServerId, Traffic};

use log::*;

/// # Placement Model
///
/// Validated topology and services, together with the precomputed slot layout and the servers
/// traversed by every candidate path.
#[derive(Debug, Clone)]
pub struct Model {
    topology: Topology,
    services: Vec<Service>,
    /// first slot of every service
    slot_offsets: Vec<usize>,
    /// `(service, function)` for every slot
    slot_owners: Vec<(usize, usize)>,
    /// servers on every candidate path (in traversal order), indexed by service and path
    path_servers: Vec<Vec<Vec<ServerId>>>,
    /// largest load a single demand can cause on any function
    max_demand_load: f64,
}

impl Model {
    /// Validate the topology and the services, and build the model. Candidate paths which violate
    /// the maximum delay of their service are removed.
    pub fn new(topology: Topology, mut services: Vec<Service>) -> Result<Self, ModelError> {
        if topology.num_servers() == 0 {
            return Err(ModelError::NoServers);
        }
        if services.is_empty() {
            return Err(ModelError::NoServices);
        }

        for server in topology.servers() {
            if !is_positive(server.capacity()) {
                return Err(ModelError::InvalidServerCapacity(server.id(), server.capacity()));
            }
        }
        for l in topology.links() {
            let link = topology.link(l)?;
            if !is_positive(link.capacity) {
                return Err(ModelError::InvalidLinkCapacity(l, link.capacity));
            }
            if !is_non_negative(link.delay) {
                return Err(ModelError::InvalidLinkDelay(l, link.delay));
            }
        }

        for (s, service) in services.iter_mut().enumerate() {
            validate_service(&topology, s, service)?;
            if let Some(max_delay) = service.max_delay() {
                let delays = service
                    .flow()
                    .paths()
                    .iter()
                    .map(|p| service.path_delay(&topology, p))
                    .collect::<Result<Vec<f64>, ModelError>>()?;
                let mut delays = delays.into_iter();
                let num_before = service.flow().paths().len();
                service.flow_mut().retain_paths(|_| delays.next().unwrap_or(0.0) <= max_delay);
                let num_dropped = num_before - service.flow().paths().len();
                if num_dropped > 0 {
                    warn!(
                        "Service {} ({}): dropped {} of {} candidate paths exceeding the maximum delay {}",
                        s,
                        service.name(),
                        num_dropped,
                        num_before,
                        max_delay
                    );
                }
            }
        }

        let mut slot_offsets = Vec::with_capacity(services.len());
        let mut slot_owners = Vec::new();
        for (s, service) in services.iter().enumerate() {
            slot_offsets.push(slot_owners.len());
            slot_owners.extend((0..service.functions().len()).map(|v| (s, v)));
        }

        let path_servers = services
            .iter()
            .map(|service| {
                service
                    .flow()
                    .paths()
                    .iter()
                    .map(|path| {
                        path.nodes()
                            .iter()
                            .flat_map(|n| topology.servers_at(*n).map(|x| x.id()))
                            .collect()
                    })
                    .collect()
            })
            .collect();

        let max_demand_load = services
            .iter()
            .flat_map(|service| {
                service.functions().iter().flat_map(move |f| {
                    service.flow().demands().iter().map(move |d| d * f.load_ratio())
                })
            })
            .fold(0.0, f64::max);

        debug!(
            "Model with {} servers, {} links, {} services and {} function slots",
            topology.num_servers(),
            topology.num_links(),
            services.len(),
            slot_owners.len()
        );

        Ok(Self { topology, services, slot_offsets, slot_owners, path_servers, max_demand_load })
    }

    /// Returns the topology
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Returns all services, in their configured order
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// Returns the service with the given index
    pub fn service(&self, service: usize) -> Result<&Service, ModelError> {
        self.services.get(service).ok_or(ModelError::IndexOutOfRange("service", service))
    }

    /// Returns the number of servers
    pub fn num_servers(&self) -> usize {
        self.topology.num_servers()
    }

    /// Returns the number of services
    pub fn num_services(&self) -> usize {
        self.services.len()
    }

    /// Returns the number of function slots (the sum of all chain lengths)
    pub fn total_slots(&self) -> usize {
        self.slot_owners.len()
    }

    /// Returns the number of placement actions, which is also the number of placement bits.
    pub fn num_actions(&self) -> usize {
        self.num_servers() * self.total_slots()
    }

    /// Returns the length of the environment state vector: all placement bits, plus the time
    /// step.
    pub fn state_len(&self) -> usize {
        self.num_actions() + 1
    }

    /// Returns the slot of function `function` of service `service`.
    ///
    /// **Panics** if the indices are out of range.
    pub fn slot(&self, service: usize, function: usize) -> usize {
        assert!(function < self.services[service].functions().len());
        self.slot_offsets[service] + function
    }

    /// Returns the `(service, function)` pair of a slot.
    ///
    /// **Panics** if the slot is out of range.
    pub fn slot_owner(&self, slot: usize) -> (usize, usize) {
        self.slot_owners[slot]
    }

    /// Returns the function of a slot.
    ///
    /// **Panics** if the slot is out of range.
    pub fn slot_function(&self, slot: usize) -> &Function {
        let (s, v) = self.slot_owners[slot];
        &self.services[s].functions()[v]
    }

    /// Returns the action index (or placement bit) of the pair `(server, slot)`.
    pub fn action(&self, server: ServerId, slot: usize) -> usize {
        server * self.total_slots() + slot
    }

    /// Returns the pair `(server, slot)` toggled by an action.
    pub fn decode_action(&self, action: usize) -> (ServerId, usize) {
        (action / self.total_slots(), action % self.total_slots())
    }

    /// Returns the servers traversed by candidate path `path` of service `service`, in traversal
    /// order.
    pub fn path_servers(&self, service: usize, path: usize) -> &[ServerId] {
        &self.path_servers[service][path]
    }

    /// Returns true if any candidate path of the service traverses the server.
    pub fn service_reaches_server(&self, service: usize, server: ServerId) -> bool {
        self.path_servers[service].iter().any(|p| p.contains(&server))
    }

    /// Returns the largest load that a single demand can cause on any function.
    pub fn max_demand_load(&self) -> f64 {
        self.max_demand_load
    }
}

fn validate_service(topo: &Topology, s: usize, service: &Service) -> Result<(), ModelError> {
    for (v, f) in service.functions().iter().enumerate() {
        if !is_non_negative(f.load_ratio()) {
            return Err(ModelError::InvalidLoadRatio(s, v, f.load_ratio()));
        }
        if !is_non_negative(f.overhead()) {
            return Err(ModelError::InvalidOverhead(s, v, f.overhead()));
        }
        if !is_non_negative(f.processing_delay()) {
            return Err(ModelError::InvalidProcessingDelay(s, v, f.processing_delay()));
        }
    }
    for (d, demand) in service.flow().demands().iter().enumerate() {
        if !is_non_negative(*demand) {
            return Err(ModelError::InvalidDemand(s, d, *demand));
        }
    }
    if let Some(max_delay) = service.max_delay() {
        if !is_non_negative(max_delay) {
            return Err(ModelError::InvalidMaxDelay(s, max_delay));
        }
    }
    for (p, path) in service.flow().paths().iter().enumerate() {
        for n in path.nodes() {
            topo.get_node_name(*n)?;
        }
        for l in path.links() {
            if topo.link(*l).is_err() {
                return Err(ModelError::UnknownLink(s, p, *l));
            }
        }
    }
    Ok(())
}

fn is_positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

fn is_non_negative(x: f64) -> bool {
    x.is_finite() && x >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> (Topology, Path) {
        let mut t = Topology::new();
        let n0 = t.add_node("n0");
        let n1 = t.add_node("n1");
        t.add_link_with_delay(n0, n1, 200.0, 5.0);
        t.add_server("x0", n0, 100.0).unwrap();
        t.add_server("x1", n1, 100.0).unwrap();
        let p = t.path(vec![n0, n1]).unwrap();
        (t, p)
    }

    #[test]
    fn slot_layout() {
        let (t, p) = line();
        let s0 = Service::new(
            "s0",
            vec![Function::new("a", 0.5, 0.0, true), Function::new("b", 0.5, 0.0, true)],
            TrafficFlow::new(vec![p.clone()], vec![10.0]),
        );
        let s1 = Service::new(
            "s1",
            vec![Function::new("c", 1.0, 0.0, false)],
            TrafficFlow::new(vec![p], vec![10.0, 20.0]),
        );
        let model = Model::new(t, vec![s0, s1]).unwrap();
        assert_eq!(model.total_slots(), 3);
        assert_eq!(model.num_actions(), 6);
        assert_eq!(model.state_len(), 7);
        assert_eq!(model.slot(1, 0), 2);
        assert_eq!(model.slot_owner(1), (0, 1));
        assert_eq!(model.action(1, 2), 5);
        assert_eq!(model.decode_action(4), (1, 1));
        assert_eq!(model.slot_function(2).name(), "c");
        assert_eq!(model.max_demand_load(), 20.0);
    }

    #[test]
    fn reject_invalid_values() {
        let (t, p) = line();
        let f = TrafficFlow::new(vec![p.clone()], vec![10.0]);
        let bad_load = Service::new("s", vec![Function::new("a", f64::NAN, 0.0, true)], f.clone());
        assert!(matches!(
            Model::new(t.clone(), vec![bad_load]),
            Err(ModelError::InvalidLoadRatio(0, 0, _))
        ));
        let bad_demand = Service::new(
            "s",
            vec![Function::new("a", 1.0, 0.0, true)],
            TrafficFlow::new(vec![p], vec![f64::INFINITY]),
        );
        assert!(matches!(
            Model::new(t.clone(), vec![bad_demand]),
            Err(ModelError::InvalidDemand(0, 0, _))
        ));
        assert_eq!(Model::new(t, vec![]).unwrap_err(), ModelError::NoServices);

        let mut zero = Topology::new();
        let n = zero.add_node("n");
        zero.add_server("x", n, 0.0).unwrap();
        let s = Service::new("s", vec![], TrafficFlow::new(vec![], vec![]));
        assert_eq!(
            Model::new(zero, vec![s]).unwrap_err(),
            ModelError::InvalidServerCapacity(0, 0.0)
        );
    }

    #[test]
    fn drop_paths_exceeding_delay() {
        let (t, p) = line();
        let short = t.path(vec![p.nodes()[0]]).unwrap();
        let s = Service::new(
            "s",
            vec![Function::new("a", 1.0, 0.0, true).with_processing_delay(1.0)],
            TrafficFlow::new(vec![p, short.clone()], vec![1.0]),
        )
        .with_max_delay(3.0);
        let model = Model::new(t, vec![s]).unwrap();
        assert_eq!(model.services()[0].flow().paths(), &[short]);
        assert_eq!(model.path_servers(0, 0), &[0]);
        assert!(!model.service_reaches_server(0, 1));
    }
}
