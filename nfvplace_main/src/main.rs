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

use nfvplace::config::LearningConfig;
use nfvplace::cost::{CostCurve, CostScope, RewardMode};
use nfvplace::report::{MigrationObjective, Report};
use nfvplace::{place, place_parallel};

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::*;
use std::error::Error;

mod example_scenarios;
use example_scenarios::*;

fn main() -> Result<(), Box<dyn Error>> {
    // run clap
    let args = CommandLineArguments::parse();

    // initialize the env logger
    pretty_env_logger::init();

    // match on the action
    match args.cmd {
        MainCommand::Learn { scenario, learning } => {
            let (model, initial, target) = get_scenario(&scenario)?;
            info!(
                "Problem has {} servers, {} services and {} actions",
                model.num_servers(),
                model.num_services(),
                model.num_actions()
            );
            let result = place(model.clone(), initial, target, learning.config())?;
            let report = Report::new(&model, &result, learning.objective.into())?;
            info!("Result:\n{}", report);
        }
        MainCommand::Parallel { scenario, learning, num_threads } => {
            let (model, initial, target) = get_scenario(&scenario)?;
            let num_threads = num_threads.unwrap_or_else(num_cpus::get);
            info!("Learning with {} independent runs", num_threads);
            let config = learning.config();
            let result = place_parallel(model.clone(), initial, target, config, Some(num_threads))?;
            let report = Report::new(&model, &result, learning.objective.into())?;
            info!("Best result:\n{}", report);
        }
    }
    Ok(())
}

/// This is the binary to learn a placement of network function chains. This program will
/// prepare one of the example scenarios, run the learning heuristic with the options provided,
/// and print the resulting placement, routes and utilization.
#[derive(Parser, Debug)]
#[clap(name = "NfvPlace (Binary)", author = "Tibor Schneider")]
struct CommandLineArguments {
    /// Action to perform
    #[clap(subcommand)]
    cmd: MainCommand,
}

#[derive(Subcommand, Debug)]
enum MainCommand {
    /// Learn a placement with a single learner
    #[clap(name = "learn")]
    Learn {
        /// Scenario to solve
        #[clap(flatten)]
        scenario: ScenarioSelection,
        /// Learning options
        #[clap(flatten)]
        learning: LearningArguments,
    },
    /// Learn a placement with multiple independent learners, and keep the best result
    #[clap(name = "parallel")]
    Parallel {
        /// Scenario to solve
        #[clap(flatten)]
        scenario: ScenarioSelection,
        /// Learning options
        #[clap(flatten)]
        learning: LearningArguments,
        /// Number of parallel learners (one per CPU by default)
        #[clap(long)]
        num_threads: Option<usize>,
    },
}

#[derive(Args, Debug)]
struct LearningArguments {
    /// Number of training episodes
    #[clap(short = 'n', long, default_value = "100")]
    training_iterations: usize,
    /// Maximum number of steps per episode
    #[clap(short = 'l', long, default_value = "100")]
    step_limit: usize,
    /// Exploration rate
    #[clap(short = 'e', long, default_value = "0.3")]
    epsilon: f64,
    /// Decay of the exploration rate after every training episode
    #[clap(long, default_value = "1.0")]
    epsilon_decay: f64,
    /// Minimum exploration rate
    #[clap(long, default_value = "0.0")]
    epsilon_min: f64,
    /// Discount factor
    #[clap(long, default_value = "0.99")]
    discount: f64,
    /// Capacity of the replay memory
    #[clap(long, default_value = "100000")]
    memory_capacity: usize,
    /// Number of transitions in the replay memory before training starts
    #[clap(long, default_value = "1024")]
    start_size: usize,
    /// Size of a training batch
    #[clap(long, default_value = "1024")]
    batch_size: usize,
    /// Number of observed transitions between two training updates
    #[clap(long, default_value = "100")]
    train_frequency: usize,
    /// Threshold multiplier of the target cost
    #[clap(short = 't', long, default_value = "1.0")]
    threshold: f64,
    /// Random seed
    #[clap(short = 's', long, default_value = "42")]
    seed: u64,
    /// Mapping from cost to reward
    #[clap(value_enum, long, default_value = "binary")]
    reward: Reward,
    /// Lowest reward in proportional mode
    #[clap(long, default_value = "-1.0")]
    reward_floor: f64,
    /// Resources over which the cost is computed
    #[clap(value_enum, long, default_value = "servers")]
    scope: Scope,
    /// Cost curve
    #[clap(value_enum, long, default_value = "convex")]
    curve: Curve,
    /// Migration objective in the report
    #[clap(value_enum, long, default_value = "migrations")]
    objective: Objective,
}

impl LearningArguments {
    fn config(&self) -> LearningConfig {
        LearningConfig {
            training_iterations: self.training_iterations,
            step_limit: self.step_limit,
            epsilon: self.epsilon,
            epsilon_decay: self.epsilon_decay,
            epsilon_min: self.epsilon_min,
            discount: self.discount,
            memory_capacity: self.memory_capacity,
            start_size: self.start_size,
            batch_size: self.batch_size,
            train_frequency: self.train_frequency,
            threshold: self.threshold,
            reward_mode: match self.reward {
                Reward::Binary => RewardMode::default(),
                Reward::Proportional => RewardMode::Proportional { floor: self.reward_floor },
            },
            cost_scope: match self.scope {
                Scope::Servers => CostScope::Servers,
                Scope::Links => CostScope::Links,
                Scope::Both => CostScope::ServersAndLinks,
            },
            cost_curve: match self.curve {
                Curve::Linear => CostCurve::linear(),
                Curve::Convex => CostCurve::convex(),
            },
            seed: self.seed,
        }
    }
}

#[derive(ValueEnum, Debug, Clone)]
enum Reward {
    Binary,
    Proportional,
}

#[derive(ValueEnum, Debug, Clone)]
enum Scope {
    Servers,
    Links,
    Both,
}

#[derive(ValueEnum, Debug, Clone)]
enum Curve {
    Linear,
    Convex,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Objective {
    Migrations,
    Replications,
    Both,
}

impl From<Objective> for MigrationObjective {
    fn from(o: Objective) -> Self {
        match o {
            Objective::Migrations => MigrationObjective::Migrations,
            Objective::Replications => MigrationObjective::Replications,
            Objective::Both => MigrationObjective::MigrationsAndReplications,
        }
    }
}
