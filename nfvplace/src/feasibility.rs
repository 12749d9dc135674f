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

//! # Feasibility Engine
//!
//! Computes, for a placement, which candidate paths of every service are admissible, and assigns
//! every traffic demand to a single admissible path without exceeding any link capacity.
//!
//! The assignment is first-fit: demands are processed in their configured order, and every
//! demand takes the first admissible path (in candidate order) on which it still fits. Services
//! are processed in their configured order and share the link traffic, so the result is
//! deterministic, but not necessarily the best possible assignment.

use crate::environment::Environment;
use crate::model::{Model, Path, Traffic};

use log::*;

/// Returns true if candidate path `path` of service `service` is admissible: every function of
/// the chain is active on at least one server traversed by the path. A service with an empty
/// chain is admissible on every candidate path.
pub fn is_admissible(model: &Model, env: &Environment, service: usize, path: usize) -> bool {
    let servers = model.path_servers(service, path);
    (0..model.services()[service].functions().len()).all(|v| {
        let slot = model.slot(service, v);
        servers.iter().any(|x| env.is_active(*x, slot))
    })
}

/// Returns the indices of all admissible candidate paths of the service, in the configured
/// candidate order.
pub fn admissible_paths(model: &Model, env: &Environment, service: usize) -> Vec<usize> {
    (0..model.services()[service].flow().paths().len())
        .filter(|p| is_admissible(model, env, service, *p))
        .collect()
}

/// Returns the admissible paths of every service, indexed by the service.
pub fn services_admissible_paths(model: &Model, env: &Environment) -> Vec<Vec<usize>> {
    (0..model.num_services()).map(|s| admissible_paths(model, env, s)).collect()
}

/// Result of assigning a single demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemandAssignment {
    /// The demand is routed over the candidate path with the given index.
    Assigned(usize),
    /// No admissible path has enough link capacity left for the demand.
    Infeasible,
}

impl DemandAssignment {
    /// Returns the index of the assigned candidate path, if any.
    pub fn path(&self) -> Option<usize> {
        match self {
            Self::Assigned(p) => Some(*p),
            Self::Infeasible => None,
        }
    }

    /// Returns true if the demand is assigned to a path.
    pub fn is_assigned(&self) -> bool {
        matches!(self, Self::Assigned(_))
    }
}

/// Assign every demand of the service to the first admissible path that still fits.
/// `link_traffic` holds the traffic already routed over every link (indexed by the link index),
/// and is updated for every assigned demand. A rejected demand leaves the link traffic
/// untouched, and is returned as [`DemandAssignment::Infeasible`]; in that case, the assignment
/// of the whole service has failed.
pub fn assign_demands(
    model: &Model,
    service: usize,
    admissible: &[usize],
    link_traffic: &mut [Traffic],
) -> Vec<DemandAssignment> {
    let flow = model.services()[service].flow();
    flow.demands()
        .iter()
        .map(|traffic| {
            admissible
                .iter()
                .copied()
                .find(|p| route_demand(model, &flow.paths()[*p], *traffic, link_traffic))
                .map(DemandAssignment::Assigned)
                .unwrap_or(DemandAssignment::Infeasible)
        })
        .collect()
}

/// Try to add the demand to every link of the path. If any link would exceed its capacity,
/// nothing is changed and false is returned. A link may be filled up to exactly its capacity.
/// Traffic is accumulated in absolute units and compared against the capacity, such that the
/// check does not depend on summing up rounded ratios.
fn route_demand(
    model: &Model,
    path: &Path,
    traffic: Traffic,
    link_traffic: &mut [Traffic],
) -> bool {
    let topo = model.topology();
    let mut updated: Vec<(usize, Traffic)> = Vec::with_capacity(path.hops());
    for l in path.links() {
        let capacity = match topo.link(*l) {
            Ok(link) => link.capacity,
            Err(_) => return false,
        };
        let load = link_traffic[l.index()] + traffic;
        if load > capacity {
            return false;
        }
        updated.push((l.index(), load));
    }
    for (l, load) in updated {
        link_traffic[l] = load;
    }
    true
}

/// # Routing Plan
///
/// Admissible paths and the demand assignment of every service, for one placement. The plan is
/// derived from the environment and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingPlan {
    admissible: Vec<Vec<usize>>,
    assignments: Vec<Vec<DemandAssignment>>,
}

impl RoutingPlan {
    /// Compute the admissible paths of all services, and assign all demands, processing the
    /// services in their configured order.
    pub fn compute(model: &Model, env: &Environment) -> Self {
        let admissible = services_admissible_paths(model, env);
        let mut link_traffic = vec![0.0; model.topology().num_links()];
        let assignments = admissible
            .iter()
            .enumerate()
            .map(|(s, paths)| assign_demands(model, s, paths, &mut link_traffic))
            .collect::<Vec<_>>();
        let plan = Self { admissible, assignments };
        if log_enabled!(Level::Trace) {
            trace!("infeasible services: {:?}", plan.infeasible_services().collect::<Vec<_>>());
        }
        plan
    }

    /// Returns true if every demand of every service is assigned to a path.
    pub fn is_feasible(&self) -> bool {
        self.assignments.iter().flatten().all(|a| a.is_assigned())
    }

    /// Returns an iterator over all services with at least one unassigned demand.
    pub fn infeasible_services(&self) -> impl Iterator<Item = usize> + '_ {
        self.assignments
            .iter()
            .enumerate()
            .filter(|(_, a)| a.iter().any(|d| !d.is_assigned()))
            .map(|(s, _)| s)
    }

    /// Returns the admissible paths of the service
    pub fn admissible_paths(&self, service: usize) -> &[usize] {
        &self.admissible[service]
    }

    /// Returns the assignment of every demand of the service
    pub fn service_assignments(&self, service: usize) -> &[DemandAssignment] {
        &self.assignments[service]
    }

    /// Returns the assignment of a single demand
    pub fn assignment(&self, service: usize, demand: usize) -> DemandAssignment {
        self.assignments[service][demand]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Function, Service, Topology, TrafficFlow};

    /// ```text
    /// x0     x1     x2
    /// a ---- b ---- d
    ///  \           /
    ///   '--- c ---'
    ///        x3
    /// ```
    fn model(demands: Vec<f64>, chain: Vec<Function>) -> Model {
        let mut t = Topology::new();
        let a = t.add_node("a");
        let b = t.add_node("b");
        let c = t.add_node("c");
        let d = t.add_node("d");
        t.add_link(a, b, 100.0);
        t.add_link(b, d, 100.0);
        t.add_link(a, c, 100.0);
        t.add_link(c, d, 100.0);
        t.add_server("x0", a, 100.0).unwrap();
        t.add_server("x1", b, 100.0).unwrap();
        t.add_server("x2", d, 100.0).unwrap();
        t.add_server("x3", c, 100.0).unwrap();
        let paths = t.candidate_paths(a, d, None).unwrap();
        let s = Service::new("s0", chain, TrafficFlow::new(paths, demands));
        Model::new(t, vec![s]).unwrap()
    }

    fn chain() -> Vec<Function> {
        vec![Function::new("f0", 0.5, 0.0, true), Function::new("f1", 0.5, 0.0, true)]
    }

    #[test]
    fn admissibility() {
        let m = model(vec![10.0], chain());
        // f0 on x1 (upper path only), f1 on x2 (both paths)
        let mut env = Environment::from_activations(&m, &[(1, 0, 0), (2, 0, 1)]).unwrap();
        assert_eq!(admissible_paths(&m, &env, 0), vec![0]);
        // f0 on x0 (both paths)
        env.set_active(0, 0, true);
        assert_eq!(admissible_paths(&m, &env, 0), vec![0, 1]);
        // nothing is admissible without f1
        env.set_active(2, 1, false);
        assert!(admissible_paths(&m, &env, 0).is_empty());
    }

    #[test]
    fn empty_chain_is_always_admissible() {
        let m = model(vec![10.0], vec![]);
        let env = Environment::empty(&m);
        assert_eq!(admissible_paths(&m, &env, 0), vec![0, 1]);
    }

    #[test]
    fn admissibility_is_monotone() {
        let m = model(vec![10.0], chain());
        for bits in 0..(1u32 << m.num_actions()) {
            let placement = (0..m.num_actions()).map(|i| bits & (1 << i) != 0).collect();
            let env = Environment::from_placement(&m, placement).unwrap();
            let before = admissible_paths(&m, &env, 0);
            for a in 0..m.num_actions() {
                if env.placement()[a] {
                    continue;
                }
                let mut next = env.clone();
                next.apply(&m, a);
                let after = admissible_paths(&m, &next, 0);
                assert!(before.iter().all(|p| after.contains(p)));
            }
        }
    }

    #[test]
    fn first_fit_assignment() {
        let m = model(vec![60.0, 60.0, 60.0], chain());
        let env = Environment::from_activations(&m, &[(0, 0, 0), (2, 0, 1)]).unwrap();
        let admissible = admissible_paths(&m, &env, 0);
        let mut traffic = vec![0.0; 4];
        let result = assign_demands(&m, 0, &admissible, &mut traffic);
        assert_eq!(
            result,
            vec![
                DemandAssignment::Assigned(0),
                DemandAssignment::Assigned(1),
                DemandAssignment::Infeasible
            ]
        );
        assert_eq!(traffic, vec![60.0, 60.0, 60.0, 60.0]);
    }

    #[test]
    fn link_capacity_is_never_exceeded() {
        let m = model(vec![30.0, 50.0, 40.0, 20.0, 70.0, 10.0], chain());
        let env = Environment::from_activations(&m, &[(0, 0, 0), (2, 0, 1)]).unwrap();
        let plan = RoutingPlan::compute(&m, &env);
        let demands = m.services()[0].flow().demands();
        for l in m.topology().links() {
            let traffic: f64 = plan
                .service_assignments(0)
                .iter()
                .zip(demands)
                .filter_map(|(a, t)| a.path().map(|p| (p, t)))
                .filter(|(p, _)| m.services()[0].flow().paths()[*p].traverses_link(l))
                .map(|(_, t)| *t)
                .sum();
            assert!(traffic <= m.topology().link(l).unwrap().capacity);
        }
        assert!(!plan.is_feasible());
    }

    #[test]
    fn demands_may_fill_a_link_exactly() {
        let m = model(vec![33.0, 56.0, 11.0, 0.1, 0.2, 99.7], chain());
        // only the upper path is admissible
        let env = Environment::from_activations(&m, &[(1, 0, 0), (2, 0, 1)]).unwrap();
        let plan = RoutingPlan::compute(&m, &env);
        assert_eq!(&plan.service_assignments(0)[..3], &[DemandAssignment::Assigned(0); 3]);
        assert_eq!(&plan.service_assignments(0)[3..], &[DemandAssignment::Infeasible; 3]);

        let m = model(vec![0.1, 0.2, 99.7], chain());
        let env = Environment::from_activations(&m, &[(1, 0, 0), (2, 0, 1)]).unwrap();
        assert!(RoutingPlan::compute(&m, &env).is_feasible());
    }

    #[test]
    fn no_admissible_path_fails_every_demand() {
        let m = model(vec![1.0, 2.0], chain());
        let plan = RoutingPlan::compute(&m, &Environment::empty(&m));
        assert_eq!(plan.service_assignments(0), &[DemandAssignment::Infeasible; 2]);
        assert_eq!(plan.infeasible_services().collect::<Vec<_>>(), vec![0]);
    }
}
