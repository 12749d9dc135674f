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

use crate::cost::{CostScope, Evaluator, WORST_COST};
use crate::environment::Environment;
use crate::example_scenarios::{DiamondScenario, ExampleScenario, RingScenario};
use crate::feasibility::{admissible_paths, RoutingPlan};
use crate::mask::legal_actions;
use crate::model::Model;
use crate::utilization::link_utilization;

use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};

fn models() -> Vec<Model> {
    vec![DiamondScenario::model(0).unwrap(), RingScenario::model(0).unwrap()]
}

fn random_environment<R: Rng>(model: &Model, rng: &mut R) -> Environment {
    let placement = (0..model.num_actions()).map(|_| rng.gen_bool(0.4)).collect();
    Environment::from_placement(model, placement).unwrap()
}

#[test]
fn link_capacity_is_respected() {
    let mut rng = StdRng::seed_from_u64(1);
    for model in models() {
        for _ in 0..200 {
            let env = random_environment(&model, &mut rng);
            let plan = RoutingPlan::compute(&model, &env);
            for u in link_utilization(&model, &plan) {
                assert!(u <= 1.0 + 1e-9, "link utilization {} exceeds capacity", u);
            }
        }
    }
}

#[test]
fn activation_never_removes_admissible_paths() {
    let mut rng = StdRng::seed_from_u64(2);
    for model in models() {
        for _ in 0..100 {
            let env = random_environment(&model, &mut rng);
            for action in (0..model.num_actions()).filter(|a| !env.placement()[*a]) {
                let (_, slot) = model.decode_action(action);
                if !model.slot_function(slot).is_replicable() {
                    continue;
                }
                let mut next = env.clone();
                next.apply(&model, action);
                for s in 0..model.num_services() {
                    let before = admissible_paths(&model, &env, s);
                    let after = admissible_paths(&model, &next, s);
                    assert!(before.iter().all(|p| after.contains(p)));
                }
            }
        }
    }
}

#[test]
fn random_walk_respects_mask() {
    let mut rng = StdRng::seed_from_u64(3);
    for model in models() {
        let evaluator = Evaluator::default();
        let mut env = Environment::empty(&model);
        let mut previous = None;
        for _ in 0..300 {
            let mask = legal_actions(&model, &env, previous);
            if let Some(p) = previous {
                assert!(!mask.is_legal(p));
            }
            let action = match mask.legal_actions().choose(&mut rng) {
                Some(a) => a,
                None => break,
            };
            env.apply(&model, action);
            let eval = evaluator.evaluate(&model, &env);
            assert_eq!(eval.server_utilization.len(), model.num_servers());
            assert!(eval.cost == WORST_COST || eval.cost.is_finite());
            assert_eq!(eval.is_feasible(), eval.cost != WORST_COST);
            previous = Some(action);
        }
    }
}

#[test]
fn toggle_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(4);
    for model in models() {
        for _ in 0..50 {
            let env = random_environment(&model, &mut rng);
            let action = rng.gen_range(0, model.num_actions());
            let mut next = env.clone();
            next.apply(&model, action);
            next.apply(&model, action);
            assert_eq!(next.placement()[action], env.placement()[action]);
        }
    }
}

#[test]
fn more_load_never_decreases_cost() {
    let evaluator = Evaluator::new(Default::default(), CostScope::Servers);
    let mut utilization = vec![0.3, 0.1, 0.6];
    let mut previous = evaluator.cost(&utilization, &[]);
    for _ in 0..100 {
        utilization[1] += 0.02;
        let cost = evaluator.cost(&utilization, &[]);
        assert!(cost >= previous);
        previous = cost;
    }
}
