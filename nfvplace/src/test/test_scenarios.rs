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

use crate::cost::{CostCurve, CostScope, Evaluator, RewardMode, WORST_COST};
use crate::environment::Environment;
use crate::example_scenarios::{ExampleScenario, LineScenario, RingScenario};
use crate::feasibility::{DemandAssignment, RoutingPlan};
use crate::mask::legal_actions;
use crate::model::Model;

use assert_approx_eq::assert_approx_eq;
use lazy_static::lazy_static;
use maplit::hashmap;
use std::collections::HashMap;

lazy_static! {
    static ref LINE: Model = LineScenario::model(0).unwrap();
    static ref LINE_OVERLOAD: Model = LineScenario::model(1).unwrap();
}

fn server_utilization_by_name(model: &Model, utilization: &[f64]) -> HashMap<String, f64> {
    model
        .topology()
        .servers()
        .iter()
        .map(|x| (x.name().to_string(), utilization[x.id()]))
        .collect()
}

#[test]
fn line_empty_placement_allows_both_servers() {
    let env = Environment::empty(&LINE);
    let mask = legal_actions(&LINE, &env, None);
    assert_eq!(LINE.num_actions(), 2);
    let expected = vec![LINE.action(0, 0), LINE.action(1, 0)];
    assert_eq!(mask.legal_actions().collect::<Vec<_>>(), expected);
}

#[test]
fn line_activation_reaches_target() {
    let env = Environment::from_activations(&LINE, &[(0, 0, 0)]).unwrap();
    let evaluator = Evaluator::new(CostCurve::linear(), CostScope::Servers);
    let eval = evaluator.evaluate(&LINE, &env);

    assert!(eval.is_feasible());
    assert_eq!(eval.routing.assignment(0, 0), DemandAssignment::Assigned(0));
    let expected = hashmap! {"x0".to_string() => 0.2, "x1".to_string() => 0.0};
    let utilization = server_utilization_by_name(&LINE, &eval.server_utilization);
    for (name, u) in expected {
        assert_approx_eq!(utilization[&name], u);
    }
    assert_approx_eq!(evaluator.curve().eval(eval.server_utilization[0]), 0.2);
    // averaged over both servers
    assert_approx_eq!(eval.cost, 0.1);
    assert_approx_eq!(eval.link_utilization[0], 0.2);
    assert_eq!(RewardMode::default().reward(eval.cost, 0.3), 100.0);
}

#[test]
fn line_overload_is_infeasible() {
    let env = Environment::from_activations(&LINE_OVERLOAD, &[(0, 0, 0)]).unwrap();
    let plan = RoutingPlan::compute(&LINE_OVERLOAD, &env);
    assert_eq!(plan.admissible_paths(0), &[0]);
    assert_eq!(plan.service_assignments(0), &[DemandAssignment::Infeasible]);
    assert!(!plan.is_feasible());
    assert_eq!(plan.infeasible_services().collect::<Vec<_>>(), vec![0]);

    let evaluator = Evaluator::new(CostCurve::linear(), CostScope::Servers);
    let eval = evaluator.evaluate(&LINE_OVERLOAD, &env);
    assert_eq!(eval.cost, WORST_COST);
    assert_eq!(eval.link_utilization, vec![0.0]);
    assert_eq!(RewardMode::default().reward(eval.cost, 0.3), -1.0);
    assert_eq!(RewardMode::Proportional { floor: -5.0 }.reward(eval.cost, 0.3), -5.0);
}

#[test]
fn line_overload_has_no_legal_activation() {
    // a single demand already fills a server
    let env = Environment::empty(&LINE_OVERLOAD);
    assert!(legal_actions(&LINE_OVERLOAD, &env, None).is_empty());
}

#[test]
fn ring_drops_slow_paths() {
    let model = RingScenario::model(0).unwrap();
    let num_paths: Vec<usize> =
        model.services().iter().map(|s| s.flow().paths().len()).collect();
    assert_eq!(num_paths, vec![2, 2, 1]);
    let dpi = &model.services()[2];
    let names: Vec<&str> = dpi.flow().paths()[0]
        .nodes()
        .iter()
        .map(|n| model.topology().get_node_name(*n).unwrap())
        .collect();
    assert_eq!(names, vec!["r4", "r5", "r0"]);
}

#[test]
fn ring_load_balancer_is_not_replicated() {
    let model = RingScenario::model(0).unwrap();
    let mut env = RingScenario::initial_placement(&model, 1).unwrap();
    let lb = model.slot(0, 1);
    assert_eq!(env.active_servers(lb).collect::<Vec<_>>(), vec![0]);
    env.apply(&model, model.action(1, lb));
    assert_eq!(env.active_servers(lb).collect::<Vec<_>>(), vec![1]);
    // firewall is replicable
    let fw = model.slot(0, 0);
    env.apply(&model, model.action(2, fw));
    assert_eq!(env.active_servers(fw).collect::<Vec<_>>(), vec![0, 2]);
}

#[test]
fn ring_initial_placement_misses_dpi() {
    let model = RingScenario::model(1).unwrap();
    let env = RingScenario::initial_placement(&model, 1).unwrap();
    let plan = RoutingPlan::compute(&model, &env);
    assert!(plan.admissible_paths(2).is_empty());
    assert_eq!(plan.infeasible_services().collect::<Vec<_>>(), vec![2]);
}
