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

//! # Helper (printer) functions for the Model
//! Module containing helper functions to get formatted strings about the topology, the services
//! and the placement actions.

use crate::model::{Model, ModelError, Path, Topology};

use itertools::Itertools;

/// Get the path as a string of node names, like `n0 -> n1 -> n2`.
pub fn node_path(topo: &Topology, path: &Path) -> Result<String, ModelError> {
    Ok(path
        .nodes()
        .iter()
        .map(|n| topo.get_node_name(*n))
        .collect::<Result<Vec<_>, _>>()?
        .join(" -> "))
}

/// Get the short name of a function slot, like `s0v1` for the second function of the first
/// service.
pub fn slot(model: &Model, slot: usize) -> String {
    let (s, v) = model.slot_owner(slot);
    format!("s{}v{}", s, v)
}

/// Get the formatted string of a placement action, with the function and server names inserted.
pub fn action(model: &Model, action: usize) -> Result<String, ModelError> {
    if action >= model.num_actions() {
        return Err(ModelError::IndexOutOfRange("action", action));
    }
    let (x, slot_idx) = model.decode_action(action);
    let server = model.topology().server(x)?;
    let (s, _) = model.slot_owner(slot_idx);
    Ok(format!(
        "toggle {} ({} of {}) on {}",
        slot(model, slot_idx),
        model.slot_function(slot_idx).name(),
        model.service(s)?.name(),
        server.name()
    ))
}

/// Get the list of functions in a placement for each server, like `x0: s0v0, s1v0`.
pub fn placement(model: &Model, placement: &[bool]) -> Vec<String> {
    model
        .topology()
        .servers()
        .iter()
        .map(|server| {
            let functions = (0..model.total_slots())
                .filter(|v| placement.get(model.action(server.id(), *v)).copied().unwrap_or(false))
                .map(|v| slot(model, v))
                .join(", ");
            format!("{}: {}", server.name(), functions)
        })
        .collect()
}
