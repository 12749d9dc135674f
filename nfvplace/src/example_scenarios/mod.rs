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

//! Scenarios for testing

use crate::environment::Environment;
use crate::model::{Model, ModelError};

mod line;
pub use line::LineScenario;

mod diamond;
pub use diamond::DiamondScenario;

mod ring;
pub use ring::RingScenario;

/// Trait for easier access to example scenarios.
pub trait ExampleScenario {
    /// Get the model of the chosen variant.
    fn model(variant: usize) -> Result<Model, ModelError>;
    /// Get the initial placement of the chosen variant.
    fn initial_placement(model: &Model, variant: usize) -> Result<Environment, ModelError>;
    /// Get the target cost of the chosen variant.
    fn target_cost(variant: usize) -> f64;
}
