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

//! # Utilization Accountant
//!
//! Derives which server processes which function for every demand, and the resulting server and
//! link utilization, from a placement and its [`RoutingPlan`]. All values are recomputed from
//! scratch for every placement.

use crate::environment::Environment;
use crate::feasibility::RoutingPlan;
use crate::model::{Model, ServerId};

/// # Function Activation per Demand
///
/// For every service, demand and function, the server which processes the function for that
/// demand. This is the first server along the assigned path on which the function is active.
/// Unassigned demands are not processed anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemandActivation {
    /// indexed by service, demand and function
    hosts: Vec<Vec<Vec<Option<ServerId>>>>,
}

impl DemandActivation {
    /// Compute the activation from the placement and the demand assignment.
    pub fn compute(model: &Model, env: &Environment, plan: &RoutingPlan) -> Self {
        let hosts = model
            .services()
            .iter()
            .enumerate()
            .map(|(s, service)| {
                plan.service_assignments(s)
                    .iter()
                    .map(|assignment| {
                        (0..service.functions().len())
                            .map(|v| {
                                let slot = model.slot(s, v);
                                assignment.path().and_then(|p| {
                                    model
                                        .path_servers(s, p)
                                        .iter()
                                        .copied()
                                        .find(|x| env.is_active(*x, slot))
                                })
                            })
                            .collect()
                    })
                    .collect()
            })
            .collect();
        Self { hosts }
    }

    /// Returns the server processing function `function` of service `service` for demand
    /// `demand`.
    pub fn host(&self, service: usize, demand: usize, function: usize) -> Option<ServerId> {
        self.hosts[service][demand][function]
    }

    /// Returns true if `server` processes the function for the demand.
    pub fn hosts_demand(
        &self,
        server: ServerId,
        service: usize,
        function: usize,
        demand: usize,
    ) -> bool {
        self.host(service, demand, function) == Some(server)
    }

    /// Collapse the activation across demands: the result is indexed by action, and is true if
    /// the server processes the function for at least one demand.
    pub fn function_servers(&self, model: &Model) -> Vec<bool> {
        let mut result = vec![false; model.num_actions()];
        for (s, demands) in self.hosts.iter().enumerate() {
            for functions in demands {
                for (v, host) in functions.iter().enumerate() {
                    if let Some(x) = host {
                        result[model.action(*x, model.slot(s, v))] = true;
                    }
                }
            }
        }
        result
    }

    /// Returns the processed load (demand volume times load ratio) of every pair of server and
    /// slot, indexed by action.
    pub fn function_load(&self, model: &Model) -> Vec<f64> {
        let mut result = vec![0.0; model.num_actions()];
        for (s, demands) in self.hosts.iter().enumerate() {
            let service = &model.services()[s];
            for (d, functions) in demands.iter().enumerate() {
                let traffic = service.flow().demands()[d];
                for (v, host) in functions.iter().enumerate() {
                    if let Some(x) = host {
                        result[model.action(*x, model.slot(s, v))] +=
                            traffic * service.functions()[v].load_ratio();
                    }
                }
            }
        }
        result
    }
}

/// Compute the utilization of every server. Every active function adds its processed traffic
/// times its load ratio, plus its overhead times its load ratio, divided by the server capacity.
/// Values above 1 are possible, they are penalized by the cost function.
pub fn server_utilization(
    model: &Model,
    env: &Environment,
    activation: &DemandActivation,
) -> Vec<f64> {
    model
        .topology()
        .servers()
        .iter()
        .map(|server| {
            let x = server.id();
            let mut utilization = 0.0;
            for (s, service) in model.services().iter().enumerate() {
                for (v, function) in service.functions().iter().enumerate() {
                    if !env.is_active(x, model.slot(s, v)) {
                        continue;
                    }
                    let demands: f64 = service
                        .flow()
                        .demands()
                        .iter()
                        .enumerate()
                        .filter(|(d, _)| activation.hosts_demand(x, s, v, *d))
                        .map(|(_, t)| *t)
                        .sum();
                    utilization += (demands * function.load_ratio()
                        + function.load_ratio() * function.overhead())
                        / server.capacity();
                }
            }
            utilization
        })
        .collect()
}

/// Compute the utilization of every link (indexed by the link index): the sum of the volume of
/// every demand whose assigned path traverses the link, divided by the link capacity.
pub fn link_utilization(model: &Model, plan: &RoutingPlan) -> Vec<f64> {
    let topo = model.topology();
    let mut utilization = vec![0.0; topo.num_links()];
    for (s, service) in model.services().iter().enumerate() {
        for (d, traffic) in service.flow().demands().iter().enumerate() {
            if let Some(p) = plan.assignment(s, d).path() {
                for l in service.flow().paths()[p].links() {
                    if let Ok(link) = topo.link(*l) {
                        utilization[l.index()] += traffic / link.capacity;
                    }
                }
            }
        }
    }
    utilization
}
