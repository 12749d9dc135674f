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

//! Module containing all type definitions

use petgraph::prelude::*;
use thiserror::Error;

type IndexType = u32;
/// Node Identification (and index into the graph)
pub type NodeId = NodeIndex<IndexType>;
/// Link Identification (and index into the graph)
pub type LinkId = EdgeIndex<IndexType>;
/// Server Identification (index into the server list of the topology)
pub type ServerId = usize;
/// Amount of traffic carried by a demand, or processed by a function
pub type Traffic = f64;
/// Physical network graph. Nodes carry their name, edges carry the link properties.
pub type PhysicalNetwork = Graph<String, Link, Undirected, IndexType>;

/// # Physical Link
/// Properties of a link in the physical network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    /// Capacity of the link, in units of traffic
    pub capacity: f64,
    /// Propagation delay of the link
    pub delay: f64,
}

/// Model Errors
#[derive(Error, Debug, PartialEq)]
pub enum ModelError {
    /// Node is not present in the topology
    #[error("Node was not found in topology: {0:?}")]
    NodeNotFound(NodeId),
    /// Node name is not present in the topology
    #[error("Node name was not found in topology: {0}")]
    NodeNameNotFound(String),
    /// Two nodes on a path are not adjacent
    #[error("Link does not exist: {0:?} -- {1:?}")]
    NodesNotConnected(NodeId, NodeId),
    /// A path without any node
    #[error("Path must contain at least one node")]
    EmptyPath,
    /// Server capacity is not a positive, finite number
    #[error("Invalid capacity of server {0}: {1}")]
    InvalidServerCapacity(ServerId, f64),
    /// Link capacity is not a positive, finite number
    #[error("Invalid capacity of link {0:?}: {1}")]
    InvalidLinkCapacity(LinkId, f64),
    /// Link delay is negative or not finite
    #[error("Invalid delay of link {0:?}: {1}")]
    InvalidLinkDelay(LinkId, f64),
    /// Load ratio of a function is negative or not finite
    #[error("Invalid load ratio of function {1} in service {0}: {2}")]
    InvalidLoadRatio(usize, usize, f64),
    /// Overhead of a function is negative or not finite
    #[error("Invalid overhead of function {1} in service {0}: {2}")]
    InvalidOverhead(usize, usize, f64),
    /// Processing delay of a function is negative or not finite
    #[error("Invalid processing delay of function {1} in service {0}: {2}")]
    InvalidProcessingDelay(usize, usize, f64),
    /// Traffic demand is negative or not finite
    #[error("Invalid volume of demand {1} in service {0}: {2}")]
    InvalidDemand(usize, usize, f64),
    /// Maximum delay of a service is negative or not finite
    #[error("Invalid maximum delay of service {0}: {1}")]
    InvalidMaxDelay(usize, f64),
    /// A candidate path traverses a link which does not exist in the topology
    #[error("Candidate path {1} of service {0} uses an unknown link {2:?}")]
    UnknownLink(usize, usize, LinkId),
    /// The model contains no service
    #[error("The model contains no service")]
    NoServices,
    /// The model contains no server
    #[error("The model contains no server")]
    NoServers,
    /// Index is out of range
    #[error("{0} index out of range: {1}")]
    IndexOutOfRange(&'static str, usize),
}
