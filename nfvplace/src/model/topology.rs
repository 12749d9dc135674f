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

//! # Physical Topology
//!
//! The topology holds the physical network graph (nodes and capacitated links) and the servers,
//! each of which is attached to exactly one node. The core only reads the topology, it is never
//! modified while learning.

use crate::model::{Link, LinkId, ModelError, NodeId, PhysicalNetwork, ServerId};

use petgraph::algo::all_simple_paths;
use std::collections::HashMap;

/// # Server
/// Compute resource attached to a node of the physical network.
#[derive(Debug, Clone, PartialEq)]
pub struct Server {
    id: ServerId,
    name: String,
    capacity: f64,
    node: NodeId,
}

impl Server {
    /// Returns the server id (its index in the topology)
    pub fn id(&self) -> ServerId {
        self.id
    }

    /// Returns the name of the server
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the capacity of the server, in units of processed traffic
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Returns the node to which the server is attached
    pub fn node(&self) -> NodeId {
        self.node
    }
}

/// # Path
/// Route through the physical network, stored both as the sequence of nodes and the sequence of
/// links in between. A path with a single node is valid and has no links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    nodes: Vec<NodeId>,
    links: Vec<LinkId>,
}

impl Path {
    /// Returns the nodes of the path, in traversal order
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Returns the links of the path, in traversal order
    pub fn links(&self) -> &[LinkId] {
        &self.links
    }

    /// Returns the number of hops (links) of the path
    pub fn hops(&self) -> usize {
        self.links.len()
    }

    /// Returns true if the path traverses the node
    pub fn traverses_node(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// Returns true if the path traverses the link
    pub fn traverses_link(&self, link: LinkId) -> bool {
        self.links.contains(&link)
    }
}

/// # Topology
/// Physical network and the servers attached to it.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    graph: PhysicalNetwork,
    servers: Vec<Server>,
    names: HashMap<String, NodeId>,
}

impl Topology {
    /// Generate an empty topology
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new node to the physical network and return its id. Names are not required to be
    /// unique, but [`Topology::get_node_id`] only finds the node that was added last with a given
    /// name. Nodes added earlier with the same name stay in the network, and are only reachable by
    /// their id.
    pub fn add_node(&mut self, name: impl Into<String>) -> NodeId {
        let name = name.into();
        let id = self.graph.add_node(name.clone());
        self.names.insert(name, id);
        id
    }

    /// Add a link between two nodes, with the given capacity and no propagation delay.
    pub fn add_link(&mut self, a: NodeId, b: NodeId, capacity: f64) -> LinkId {
        self.add_link_with_delay(a, b, capacity, 0.0)
    }

    /// Add a link between two nodes, with the given capacity and propagation delay.
    pub fn add_link_with_delay(
        &mut self,
        a: NodeId,
        b: NodeId,
        capacity: f64,
        delay: f64,
    ) -> LinkId {
        self.graph.add_edge(a, b, Link { capacity, delay })
    }

    /// Attach a new server to a node. Returns an error if the node does not exist.
    pub fn add_server(
        &mut self,
        name: impl Into<String>,
        node: NodeId,
        capacity: f64,
    ) -> Result<ServerId, ModelError> {
        if self.graph.node_weight(node).is_none() {
            return Err(ModelError::NodeNotFound(node));
        }
        let id = self.servers.len();
        self.servers.push(Server { id, name: name.into(), capacity, node });
        Ok(id)
    }

    /// Returns a reference to the physical network graph
    pub fn graph(&self) -> &PhysicalNetwork {
        &self.graph
    }

    /// Returns all servers, ordered by their id
    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    /// Returns the server with the given id
    pub fn server(&self, server: ServerId) -> Result<&Server, ModelError> {
        self.servers.get(server).ok_or(ModelError::IndexOutOfRange("server", server))
    }

    /// Returns an iterator over all servers attached to the given node
    pub fn servers_at(&self, node: NodeId) -> impl Iterator<Item = &Server> {
        self.servers.iter().filter(move |s| s.node == node)
    }

    /// Returns the number of servers
    pub fn num_servers(&self) -> usize {
        self.servers.len()
    }

    /// Returns the number of links
    pub fn num_links(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns an iterator over all link ids, ordered by their index
    pub fn links(&self) -> impl Iterator<Item = LinkId> + '_ {
        self.graph.edge_indices()
    }

    /// Returns the properties of a link
    pub fn link(&self, link: LinkId) -> Result<&Link, ModelError> {
        self.graph.edge_weight(link).ok_or(ModelError::IndexOutOfRange("link", link.index()))
    }

    /// Returns the node id of the node with the given name. If the name was used more than
    /// once, the node added last is returned.
    pub fn get_node_id(&self, name: &str) -> Result<NodeId, ModelError> {
        self.names.get(name).copied().ok_or_else(|| ModelError::NodeNameNotFound(name.to_string()))
    }

    /// Returns the name of the node
    pub fn get_node_name(&self, node: NodeId) -> Result<&str, ModelError> {
        self.graph.node_weight(node).map(|n| n.as_str()).ok_or(ModelError::NodeNotFound(node))
    }

    /// Build a path from a sequence of nodes. Every two consecutive nodes must be connected by a
    /// link.
    pub fn path(&self, nodes: Vec<NodeId>) -> Result<Path, ModelError> {
        if nodes.is_empty() {
            return Err(ModelError::EmptyPath);
        }
        for n in nodes.iter() {
            if self.graph.node_weight(*n).is_none() {
                return Err(ModelError::NodeNotFound(*n));
            }
        }
        let links = nodes
            .windows(2)
            .map(|w| {
                self.graph.find_edge(w[0], w[1]).ok_or(ModelError::NodesNotConnected(w[0], w[1]))
            })
            .collect::<Result<Vec<LinkId>, ModelError>>()?;
        Ok(Path { nodes, links })
    }

    /// Build a path from a sequence of node names.
    pub fn path_by_name(&self, names: &[&str]) -> Result<Path, ModelError> {
        let nodes = names.iter().map(|n| self.get_node_id(n)).collect::<Result<Vec<_>, _>>()?;
        self.path(nodes)
    }

    /// Enumerate all simple paths from `src` to `dst` with at most `max_hops` links. The result
    /// is ordered by the number of hops first, and then by the node indices along the path, such
    /// that the order is deterministic.
    pub fn candidate_paths(
        &self,
        src: NodeId,
        dst: NodeId,
        max_hops: Option<usize>,
    ) -> Result<Vec<Path>, ModelError> {
        if self.graph.node_weight(src).is_none() {
            return Err(ModelError::NodeNotFound(src));
        }
        if self.graph.node_weight(dst).is_none() {
            return Err(ModelError::NodeNotFound(dst));
        }
        if src == dst {
            return Ok(vec![Path { nodes: vec![src], links: Vec::new() }]);
        }
        let max_intermediate = max_hops.map(|h| h.saturating_sub(1));
        let mut node_paths: Vec<Vec<NodeId>> =
            all_simple_paths(&self.graph, src, dst, 0, max_intermediate).collect();
        if max_hops == Some(0) {
            node_paths.clear();
        }
        node_paths.sort_by(|a, b| {
            a.len()
                .cmp(&b.len())
                .then_with(|| a.iter().map(|n| n.index()).cmp(b.iter().map(|n| n.index())))
        });
        node_paths.into_iter().map(|nodes| self.path(nodes)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ```text
    /// a ---- b
    /// |      |
    /// c ---- d
    /// ```
    fn square() -> (Topology, [NodeId; 4]) {
        let mut t = Topology::new();
        let a = t.add_node("a");
        let b = t.add_node("b");
        let c = t.add_node("c");
        let d = t.add_node("d");
        t.add_link(a, b, 10.0);
        t.add_link(a, c, 10.0);
        t.add_link(b, d, 10.0);
        t.add_link(c, d, 10.0);
        (t, [a, b, c, d])
    }

    #[test]
    fn path_from_nodes() {
        let (t, [a, b, _, d]) = square();
        let p = t.path(vec![a, b, d]).unwrap();
        assert_eq!(p.hops(), 2);
        assert!(p.traverses_node(b));
        assert_eq!(p.links()[0], t.graph().find_edge(a, b).unwrap());
        assert_eq!(t.path(vec![a, d]), Err(ModelError::NodesNotConnected(a, d)));
        assert_eq!(t.path(vec![]), Err(ModelError::EmptyPath));
    }

    #[test]
    fn candidate_paths_are_ordered() {
        let (t, [a, b, c, d]) = square();
        let paths = t.candidate_paths(a, d, None).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].nodes(), &[a, b, d]);
        assert_eq!(paths[1].nodes(), &[a, c, d]);
        assert!(t.candidate_paths(a, d, Some(1)).unwrap().is_empty());
        assert_eq!(t.candidate_paths(a, a, None).unwrap()[0].nodes(), &[a]);
    }

    #[test]
    fn servers() {
        let (mut t, [a, b, _, _]) = square();
        let s0 = t.add_server("x0", a, 100.0).unwrap();
        let s1 = t.add_server("x1", b, 50.0).unwrap();
        assert_eq!(t.servers_at(a).map(|s| s.id()).collect::<Vec<_>>(), vec![s0]);
        assert_eq!(t.server(s1).unwrap().capacity(), 50.0);
        assert!(t.add_server("x2", NodeId::new(42), 1.0).is_err());
        assert_eq!(t.get_node_id("b"), Ok(b));
        assert!(t.get_node_id("z").is_err());
    }

    #[test]
    fn path_from_names() {
        let (t, [a, _, c, d]) = square();
        assert_eq!(t.path_by_name(&["a", "c", "d"]).unwrap().nodes(), &[a, c, d]);
        let missing = ModelError::NodeNameNotFound("z".to_string());
        assert_eq!(t.path_by_name(&["a", "z"]), Err(missing));
        assert_eq!(t.path_by_name(&["a", "d"]), Err(ModelError::NodesNotConnected(a, d)));
    }

    #[test]
    fn duplicate_node_names() {
        let (mut t, [a, _, _, _]) = square();
        let a2 = t.add_node("a");
        assert_ne!(a, a2);
        assert_eq!(t.graph().node_count(), 5);
        assert_eq!(t.get_node_id("a"), Ok(a2));
        assert_eq!(t.get_node_name(a), Ok("a"));
        assert!(t.path(vec![a, a2]).is_err());
    }
}
