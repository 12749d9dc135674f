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

//! # Cost and Reward
//!
//! Utilization is mapped to a scalar cost with a piecewise-linear convex [`CostCurve`], and the
//! cost is mapped to a scalar reward with a [`RewardMode`]. Placements with an infeasible demand
//! assignment are scored with [`WORST_COST`].

use crate::config::ConfigError;
use crate::environment::Environment;
use crate::feasibility::RoutingPlan;
use crate::model::Model;
use crate::utilization::{link_utilization, server_utilization, DemandActivation};

/// Cost of a placement for which no feasible demand assignment exists.
pub const WORST_COST: f64 = f64::MAX;

/// Number of decimal digits to which the cost is rounded.
pub const COST_PRECISION: i32 = 4;

/// Linear function `slope * u + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFunction {
    /// Slope of the function
    pub slope: f64,
    /// Intercept of the function
    pub intercept: f64,
}

impl LinearFunction {
    /// Evaluate the function at `u`
    pub fn eval(&self, u: f64) -> f64 {
        self.slope * u + self.intercept
    }
}

/// # Cost Curve
///
/// Ordered set of linear functions. The cost at utilization `u` is the maximum over all
/// functions, which is a piecewise-linear convex approximation of a convex cost function. All
/// slopes are non-negative, so the cost never decreases with increasing utilization.
#[derive(Debug, Clone, PartialEq)]
pub struct CostCurve {
    functions: Vec<LinearFunction>,
}

impl Default for CostCurve {
    fn default() -> Self {
        Self::convex()
    }
}

impl CostCurve {
    /// Create a new cost curve from `(slope, intercept)` pairs. The curve must contain at least
    /// one function, and every slope must be finite and non-negative.
    pub fn new(functions: Vec<(f64, f64)>) -> Result<Self, ConfigError> {
        if functions.is_empty() {
            return Err(ConfigError::EmptyCostCurve);
        }
        for (slope, intercept) in functions.iter().copied() {
            if !slope.is_finite() || !intercept.is_finite() || slope < 0.0 {
                return Err(ConfigError::InvalidCostFunction(slope, intercept));
            }
        }
        Ok(Self {
            functions: functions
                .into_iter()
                .map(|(slope, intercept)| LinearFunction { slope, intercept })
                .collect(),
        })
    }

    /// Cost curve with a single function, `cost(u) = u`.
    pub fn linear() -> Self {
        Self { functions: vec![LinearFunction { slope: 1.0, intercept: 0.0 }] }
    }

    /// Six-segment convex curve, which is cheap for low utilization and grows steeply when the
    /// resource approaches (and exceeds) its capacity.
    pub fn convex() -> Self {
        let functions = [
            (1.0, 0.0),
            (3.0, -2.0 / 3.0),
            (10.0, -16.0 / 3.0),
            (70.0, -178.0 / 3.0),
            (500.0, -1468.0 / 3.0),
            (5000.0, -16318.0 / 3.0),
        ];
        Self {
            functions: functions
                .iter()
                .map(|(slope, intercept)| LinearFunction { slope: *slope, intercept: *intercept })
                .collect(),
        }
    }

    /// Returns the linear functions of the curve
    pub fn functions(&self) -> &[LinearFunction] {
        &self.functions
    }

    /// Evaluate the curve at utilization `u`.
    pub fn eval(&self, u: f64) -> f64 {
        self.functions.iter().map(|f| f.eval(u)).fold(f64::NEG_INFINITY, f64::max)
    }

    /// Average cost over all entities (servers or links), rounded to [`COST_PRECISION`] digits.
    /// The cost of an empty utilization vector is 0.
    pub fn cost(&self, utilization: &[f64]) -> f64 {
        if utilization.is_empty() {
            return 0.0;
        }
        let total: f64 = utilization.iter().map(|u| self.eval(*u)).sum();
        round(total / utilization.len() as f64, COST_PRECISION)
    }
}

/// Round `value` to `digits` decimal digits.
pub fn round(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

/// Resources over which the cost is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostScope {
    /// Average cost over all servers
    Servers,
    /// Average cost over all links
    Links,
    /// Mean of the server cost and the link cost
    ServersAndLinks,
}

impl Default for CostScope {
    fn default() -> Self {
        Self::Servers
    }
}

/// Mapping from cost to reward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RewardMode {
    /// Sparse reward: `success` if the cost reaches the target, `failure` otherwise.
    Binary {
        /// Reward if the cost is at or below the target
        success: f64,
        /// Reward if the cost is above the target
        failure: f64,
    },
    /// Reward `1 - cost`, never below `floor`. Infeasible placements get `floor`.
    Proportional {
        /// Lowest possible reward
        floor: f64,
    },
}

impl Default for RewardMode {
    fn default() -> Self {
        Self::Binary { success: 100.0, failure: -1.0 }
    }
}

impl RewardMode {
    /// Compute the reward of a step with the given cost and target cost.
    pub fn reward(&self, cost: f64, target: f64) -> f64 {
        match self {
            Self::Binary { success, failure } => {
                if cost <= target {
                    *success
                } else {
                    *failure
                }
            }
            Self::Proportional { floor } => {
                if !cost.is_finite() || cost >= WORST_COST {
                    *floor
                } else {
                    (1.0 - cost).max(*floor)
                }
            }
        }
    }

    /// Returns false if any of the rewards is not finite.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Binary { success, failure } => success.is_finite() && failure.is_finite(),
            Self::Proportional { floor } => floor.is_finite(),
        }
    }
}

/// # Evaluation of a Placement
///
/// All values derived from a placement: the routing plan, the activation per demand, the
/// utilization of every server and link, and the cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Admissible paths and demand assignment
    pub routing: RoutingPlan,
    /// Server processing every function for every demand
    pub activation: DemandActivation,
    /// Utilization of every server
    pub server_utilization: Vec<f64>,
    /// Utilization of every link
    pub link_utilization: Vec<f64>,
    /// Cost of the placement, or [`WORST_COST`] if it is infeasible
    pub cost: f64,
}

impl Evaluation {
    /// Returns true if every demand is assigned to a path.
    pub fn is_feasible(&self) -> bool {
        self.routing.is_feasible()
    }
}

/// # Evaluator
/// Computes the [`Evaluation`] of a placement, using a cost curve and a cost scope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluator {
    curve: CostCurve,
    scope: CostScope,
}

impl Evaluator {
    /// Create a new evaluator
    pub fn new(curve: CostCurve, scope: CostScope) -> Self {
        Self { curve, scope }
    }

    /// Returns the cost curve
    pub fn curve(&self) -> &CostCurve {
        &self.curve
    }

    /// Returns the cost scope
    pub fn scope(&self) -> CostScope {
        self.scope
    }

    /// Compute the cost from the server and link utilization.
    pub fn cost(&self, server_utilization: &[f64], link_utilization: &[f64]) -> f64 {
        match self.scope {
            CostScope::Servers => self.curve.cost(server_utilization),
            CostScope::Links => self.curve.cost(link_utilization),
            CostScope::ServersAndLinks => round(
                (self.curve.cost(server_utilization) + self.curve.cost(link_utilization)) / 2.0,
                COST_PRECISION,
            ),
        }
    }

    /// Evaluate the placement: compute the routing plan, the activation per demand, the
    /// utilization and the cost.
    pub fn evaluate(&self, model: &Model, env: &Environment) -> Evaluation {
        let routing = RoutingPlan::compute(model, env);
        let activation = DemandActivation::compute(model, env, &routing);
        let server_utilization = server_utilization(model, env, &activation);
        let link_utilization = link_utilization(model, &routing);
        let cost = if routing.is_feasible() {
            self.cost(&server_utilization, &link_utilization)
        } else {
            WORST_COST
        };
        Evaluation { routing, activation, server_utilization, link_utilization, cost }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn curve_is_maximum_of_functions() {
        let c = CostCurve::new(vec![(1.0, 0.0), (4.0, -2.0)]).unwrap();
        assert_approx_eq!(c.eval(0.5), 0.5);
        assert_approx_eq!(c.eval(1.0), 2.0);
        assert_approx_eq!(c.cost(&[0.5, 1.0]), 1.25);
        assert_eq!(c.cost(&[]), 0.0);
        assert_eq!(CostCurve::linear().cost(&[0.123456]), 0.1235);
    }

    #[test]
    fn invalid_curves() {
        assert_eq!(CostCurve::new(vec![]), Err(ConfigError::EmptyCostCurve));
        assert!(CostCurve::new(vec![(-1.0, 0.0)]).is_err());
        assert!(CostCurve::new(vec![(1.0, f64::NAN)]).is_err());
    }

    #[test]
    fn cost_is_monotone() {
        let c = CostCurve::convex();
        let mut previous = c.cost(&[0.2, 0.0, 0.5]);
        for i in 1..300 {
            let u = i as f64 / 100.0;
            let cost = c.cost(&[0.2, u, 0.5]);
            assert!(cost >= previous, "cost decreased at u = {}", u);
            previous = cost;
        }
    }

    #[test]
    fn convex_curve_is_continuous() {
        let c = CostCurve::convex();
        assert_approx_eq!(c.eval(1.0 / 3.0), 1.0 / 3.0);
        assert_approx_eq!(c.eval(2.0 / 3.0), 4.0 / 3.0);
        assert_approx_eq!(c.eval(0.9), 10.0 * 0.9 - 16.0 / 3.0);
    }

    #[test]
    fn rewards() {
        let binary = RewardMode::default();
        assert_eq!(binary.reward(0.2, 0.3), 100.0);
        assert_eq!(binary.reward(0.3, 0.3), 100.0);
        assert_eq!(binary.reward(0.4, 0.3), -1.0);
        assert_eq!(binary.reward(WORST_COST, 0.3), -1.0);

        let proportional = RewardMode::Proportional { floor: -10.0 };
        assert_approx_eq!(proportional.reward(0.2, 0.3), 0.8);
        assert_eq!(proportional.reward(50.0, 0.3), -10.0);
        assert_eq!(proportional.reward(WORST_COST, 0.3), -10.0);
        assert!(!RewardMode::Proportional { floor: f64::NEG_INFINITY }.is_valid());
    }

    #[test]
    fn cost_scope() {
        let e = Evaluator::new(CostCurve::linear(), CostScope::ServersAndLinks);
        assert_approx_eq!(e.cost(&[0.2, 0.4], &[1.0]), 0.65);
        let e = Evaluator::new(CostCurve::linear(), CostScope::Links);
        assert_approx_eq!(e.cost(&[0.2, 0.4], &[1.0, 0.0]), 0.5);
    }
}
