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

use nfvplace::environment::Environment;
use nfvplace::example_scenarios::{DiamondScenario, ExampleScenario, LineScenario, RingScenario};
use nfvplace::model::{Model, ModelError};

use clap::{Args, ValueEnum};
use std::fmt;

#[derive(ValueEnum, Debug, Clone)]
pub enum Scenario {
    Line,
    Diamond,
    Ring,
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Scenario::Line => write!(f, "LineScenario"),
            Scenario::Diamond => write!(f, "DiamondScenario"),
            Scenario::Ring => write!(f, "RingScenario"),
        }
    }
}

#[derive(Args, Debug)]
pub struct ScenarioSelection {
    /// Scenario to use (from the example scenarios)
    #[clap(value_enum)]
    pub scenario: Scenario,
    /// Variant of the scenario
    #[clap(short = 'v', long, default_value = "0")]
    pub variant: usize,
    /// Target cost (the default of the scenario is used if not given)
    #[clap(long)]
    pub target: Option<f64>,
}

/// Returns the model, the initial placement and the target cost of the selected scenario.
pub fn get_scenario(args: &ScenarioSelection) -> Result<(Model, Environment, f64), ModelError> {
    let (model, initial, target) = match args.scenario {
        Scenario::Line => load::<LineScenario>(args.variant)?,
        Scenario::Diamond => load::<DiamondScenario>(args.variant)?,
        Scenario::Ring => load::<RingScenario>(args.variant)?,
    };
    log::info!("Using {} (variant {})", args.scenario, args.variant);
    Ok((model, initial, args.target.unwrap_or(target)))
}

fn load<S: ExampleScenario>(variant: usize) -> Result<(Model, Environment, f64), ModelError> {
    let model = S::model(variant)?;
    let initial = S::initial_placement(&model, variant)?;
    Ok((model, initial, S::target_cost(variant)))
}
