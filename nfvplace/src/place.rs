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

//! # NfvPlace
//! Wrapper functions to run the placement learner

use crate::config::LearningConfig;
use crate::environment::Environment;
use crate::learning::{LinearValueFunction, PlacementLearner, PlacementResult, ValueFunction};
use crate::model::Model;
use crate::Error;

use log::*;
use std::thread;

/// Learning rate of the [`LinearValueFunction`] used by [`place`] and [`place_parallel`].
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// # Learn a Placement
///
/// This is the main function to interact with the system. It runs the [`PlacementLearner`] with
/// a [`LinearValueFunction`].
///
/// ## Usage
///
/// ```
/// use nfvplace::config::LearningConfig;
/// use nfvplace::example_scenarios::{ExampleScenario, DiamondScenario};
/// use nfvplace::{place, Error};
///
/// fn main() -> Result<(), Error> {
///     let model = DiamondScenario::model(0)?;
///     let initial = DiamondScenario::initial_placement(&model, 0)?;
///     let config =
///         LearningConfig { training_iterations: 10, step_limit: 20, ..Default::default() };
///
///     let result = place(model, initial, DiamondScenario::target_cost(0), config)?;
///     println!("final cost: {}", result.cost());
///
///     Ok(())
/// }
/// ```
pub fn place(
    model: Model,
    initial: Environment,
    target_cost: f64,
    config: LearningConfig,
) -> Result<PlacementResult, Error> {
    let value_function =
        LinearValueFunction::new(model.state_len(), model.num_actions(), DEFAULT_LEARNING_RATE);
    place_with(model, initial, target_cost, config, value_function)
}

/// # Learn a Placement with a custom Value Function
///
/// Same as [`place`], but using the provided value function approximator.
pub fn place_with<V: ValueFunction>(
    model: Model,
    initial: Environment,
    target_cost: f64,
    config: LearningConfig,
    value_function: V,
) -> Result<PlacementResult, Error> {
    info!("Learning a placement...");
    let mut learner = PlacementLearner::new(model, initial, target_cost, config, value_function)?;
    let result = learner.work();
    if result.is_success() {
        info!("Found a placement with cost {}", result.cost());
    } else if result.is_feasible() {
        info!("Target not reached, best placement has cost {}", result.cost());
    } else {
        warn!("Could not find a feasible placement ({:?})", result.state);
    }
    Ok(result)
}

/// # Learn a Placement using multiple parallel threads
///
/// This function spawns `N` independent learners, each with its own agent, replay memory and
/// seed (`seed + i` for the `i`-th thread). The best result is returned: feasible results are
/// preferred over infeasible ones, and among those, the one with the lowest cost. Ties are
/// broken by the thread index.
///
/// If `n_threads` is `None`, one thread per CPU is spawned.
pub fn place_parallel(
    model: Model,
    initial: Environment,
    target_cost: f64,
    config: LearningConfig,
    n_threads: Option<usize>,
) -> Result<PlacementResult, Error> {
    config.validate()?;

    let n_threads = n_threads.unwrap_or_else(num_cpus::get).max(1);
    info!("Spawning {} threads", n_threads);

    let handles = (0..n_threads)
        .map(|i| {
            let m = model.clone();
            let e = initial.clone();
            let c = LearningConfig { seed: config.seed.wrapping_add(i as u64), ..config.clone() };
            thread::spawn(move || {
                let v =
                    LinearValueFunction::new(m.state_len(), m.num_actions(), DEFAULT_LEARNING_RATE);
                PlacementLearner::new(m, e, target_cost, c, v).map(|mut learner| learner.work())
            })
        })
        .collect::<Vec<_>>();

    let mut best: Option<PlacementResult> = None;
    let mut some_error: Option<Error> = None;

    // wait until all threads are done
    for (i, handle) in handles.into_iter().enumerate() {
        match handle.join() {
            Ok(Ok(result)) => {
                debug!("Thread {} finished with cost {}", i, result.cost());
                if best.as_ref().map(|b| is_better(&result, b)).unwrap_or(true) {
                    best = Some(result);
                }
            }
            Ok(Err(e)) => {
                warn!("Thread {} could not run: {}", i, e);
                some_error = Some(e.into());
            }
            Err(_) => {
                warn!("Thread {} panicked", i);
                some_error = Some(Error::WorkerPanicked);
            }
        }
    }

    match (best, some_error) {
        (Some(result), _) => {
            info!("Best placement has cost {} ({:?})", result.cost(), result.state);
            Ok(result)
        }
        (None, Some(e)) => {
            error!("Could not learn any placement: {}", e);
            Err(e)
        }
        (None, None) => Err(Error::WorkerPanicked),
    }
}

/// Returns true if `a` is strictly better than `b`.
fn is_better(a: &PlacementResult, b: &PlacementResult) -> bool {
    match (a.is_feasible(), b.is_feasible()) {
        (true, false) => true,
        (false, true) => false,
        _ => a.cost() < b.cost(),
    }
}
