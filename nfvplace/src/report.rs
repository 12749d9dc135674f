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

//! # Result Report
//!
//! Summary of a learning run: the number of migrations and replications relative to the initial
//! placement, the migration / replication objective, per-function utilization, path statistics
//! and formatted listings of the placement and the routes.

use crate::feasibility::{DemandAssignment, RoutingPlan};
use crate::learning::PlacementResult;
use crate::model::{printer, Model, ModelError};
use crate::utilization::DemandActivation;

use std::fmt;

/// Objective combining the number of migrations `m` and replications `r`. Exactly one variant
/// is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationObjective {
    /// `m + 0.001 r`
    Migrations,
    /// `r + 0.001 m`
    Replications,
    /// `m + r`
    MigrationsAndReplications,
}

impl MigrationObjective {
    /// Evaluate the objective
    pub fn value(&self, migrations: usize, replications: usize) -> f64 {
        let m = migrations as f64;
        let r = replications as f64;
        match self {
            Self::Migrations => m + 0.001 * r,
            Self::Replications => r + 0.001 * m,
            Self::MigrationsAndReplications => m + r,
        }
    }
}

/// Number of migrations: pairs of server and function slot which are active in `initial`, but not
/// in `current`. Both are indexed by action.
pub fn migrations(initial: &[bool], current: &[bool]) -> usize {
    initial.iter().zip(current).filter(|(a, b)| **a && !**b).count()
}

/// Number of replications: for every function slot, the number of servers on which it is active,
/// minus one. Slots that are not active anywhere count as zero.
pub fn replications(model: &Model, current: &[bool]) -> usize {
    (0..model.total_slots())
        .map(|slot| {
            (0..model.num_servers())
                .filter(|x| current.get(model.action(*x, slot)).copied().unwrap_or(false))
                .count()
                .saturating_sub(1)
        })
        .sum()
}

/// Utilization of every pair of server and function slot (indexed by action): the load processed
/// by the function on that server, divided by the server capacity.
pub fn function_utilization(model: &Model, activation: &DemandActivation) -> Vec<f64> {
    activation
        .function_load(model)
        .into_iter()
        .enumerate()
        .map(|(action, load)| {
            let (x, _) = model.decode_action(action);
            load / model.topology().servers()[x].capacity()
        })
        .collect()
}

/// Average number of links of the paths used by all assigned demands. Returns 0 if no demand is
/// assigned.
pub fn average_path_length(model: &Model, routing: &RoutingPlan) -> f64 {
    let lengths: Vec<usize> = assigned_paths(model, routing)
        .map(|(s, _, p)| model.services()[s].flow().paths()[p].links().len())
        .collect();
    if lengths.is_empty() {
        0.0
    } else {
        lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
    }
}

/// Total traffic carried by all links: every assigned demand counts once for every link of its
/// path.
pub fn total_link_traffic(model: &Model, routing: &RoutingPlan) -> f64 {
    assigned_paths(model, routing)
        .map(|(s, d, p)| {
            let flow = model.services()[s].flow();
            flow.demands()[d] * flow.paths()[p].links().len() as f64
        })
        .sum()
}

/// Formatted route of every demand, like `s0 d1 (40): n0 -> n1`.
pub fn routes(model: &Model, routing: &RoutingPlan) -> Result<Vec<String>, ModelError> {
    let mut result = Vec::new();
    for (s, service) in model.services().iter().enumerate() {
        for (d, demand) in service.flow().demands().iter().enumerate() {
            let route = match routing.assignment(s, d) {
                DemandAssignment::Assigned(p) => {
                    printer::node_path(model.topology(), &service.flow().paths()[p])?
                }
                DemandAssignment::Infeasible => String::from("infeasible"),
            };
            result.push(format!("s{} d{} ({}): {}", s, d, demand, route));
        }
    }
    Ok(result)
}

/// `(service, demand, path)` of every assigned demand
fn assigned_paths<'a>(
    model: &'a Model,
    routing: &'a RoutingPlan,
) -> impl Iterator<Item = (usize, usize, usize)> + 'a {
    (0..model.num_services()).flat_map(move |s| {
        routing
            .service_assignments(s)
            .iter()
            .enumerate()
            .filter_map(move |(d, a)| a.path().map(|p| (s, d, p)))
    })
}

/// # Report
///
/// Summary of a [`PlacementResult`], ready to be printed.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Terminal state of the reasoning episode, formatted
    pub state: String,
    /// Number of steps of the reasoning episode
    pub steps: usize,
    /// True if every demand is assigned
    pub feasible: bool,
    /// Cost of the final placement
    pub cost: f64,
    /// Number of migrations relative to the initial placement
    pub migrations: usize,
    /// Number of replications of the final placement
    pub replications: usize,
    /// Value of the chosen migration objective
    pub objective: f64,
    /// Utilization of every server
    pub server_utilization: Vec<f64>,
    /// Utilization of every link
    pub link_utilization: Vec<f64>,
    /// Average number of links of the used paths
    pub average_path_length: f64,
    /// Total traffic on all links
    pub link_traffic: f64,
    /// Functions on every server
    pub placement: Vec<String>,
    /// Route of every demand
    pub routes: Vec<String>,
}

impl Report {
    /// Create the report of a learning result. Migrations and replications are computed on the
    /// functions that actually process demands in the final placement.
    pub fn new(
        model: &Model,
        result: &PlacementResult,
        objective: MigrationObjective,
    ) -> Result<Self, ModelError> {
        let evaluation = &result.evaluation;
        let used = evaluation.activation.function_servers(model);
        let migrations = migrations(result.initial.placement(), &used);
        let replications = replications(model, &used);
        Ok(Self {
            state: format!("{:?}", result.state),
            steps: result.steps,
            feasible: evaluation.is_feasible(),
            cost: evaluation.cost,
            migrations,
            replications,
            objective: objective.value(migrations, replications),
            server_utilization: evaluation.server_utilization.clone(),
            link_utilization: evaluation.link_utilization.clone(),
            average_path_length: average_path_length(model, &evaluation.routing),
            link_traffic: total_link_traffic(model, &evaluation.routing),
            placement: printer::placement(model, result.environment.placement()),
            routes: routes(model, &evaluation.routing)?,
        })
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "state: {} after {} steps", self.state, self.steps)?;
        if self.feasible {
            writeln!(f, "cost: {}", self.cost)?;
        } else {
            writeln!(f, "cost: infeasible")?;
        }
        writeln!(
            f,
            "migrations: {}, replications: {}, objective: {}",
            self.migrations, self.replications, self.objective
        )?;
        writeln!(
            f,
            "average path length: {:.2}, traffic on links: {}",
            self.average_path_length, self.link_traffic
        )?;
        writeln!(f, "server utilization: {:.3?}", self.server_utilization)?;
        writeln!(f, "link utilization: {:.3?}", self.link_utilization)?;
        writeln!(f, "placement:")?;
        for line in self.placement.iter() {
            writeln!(f, "    {}", line)?;
        }
        writeln!(f, "routes:")?;
        for line in self.routes.iter() {
            writeln!(f, "    {}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migration_objective_is_exclusive() {
        assert_eq!(MigrationObjective::Migrations.value(2, 1000), 3.0);
        assert_eq!(MigrationObjective::Replications.value(1000, 2), 3.0);
        assert_eq!(MigrationObjective::MigrationsAndReplications.value(2, 3), 5.0);
    }

    #[test]
    fn count_migrations() {
        let initial = vec![true, true, false, false];
        let current = vec![false, true, true, false];
        assert_eq!(migrations(&initial, &current), 1);
        assert_eq!(migrations(&initial, &initial), 0);
    }
}
