use std::{collections::HashMap, io::BufRead};

use petgraph::graph::{NodeIndex, UnGraph};
use serde::Deserialize;

use crate::GraphError;

/// The part of a user line needed to build the graph.
#[derive(Debug, Clone, Deserialize)]
struct UserFriends {
    user_id: String,
    #[serde(default)]
    friends: Vec<String>,
}

/// Undirected friendship graph over user IDs.
///
/// Users keep their insertion order, which is also the node order of
/// [`to_d3`](FriendshipGraph::to_d3).
#[derive(Debug, Clone)]
pub struct FriendshipGraph {
    graph: UnGraph<String, ()>,
    user_index: HashMap<String, NodeIndex>,
}

impl Default for FriendshipGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl FriendshipGraph {
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: UnGraph::new_undirected(),
            user_index: HashMap::new(),
        }
    }

    /// Builds the graph from a JSON-lines user file.
    ///
    /// Every line must hold a `user_id`; `friends` defaults to empty and all
    /// other fields are ignored. Blank lines are skipped. Friends that never
    /// appear as a `user_id` still become nodes.
    pub fn read_user_graph<R>(reader: R) -> Result<Self, GraphError>
    where
        R: BufRead,
    {
        let mut graph = Self::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let user: UserFriends =
                serde_json::from_str(&line).map_err(|source| GraphError::User {
                    line: index + 1,
                    source,
                })?;
            graph.add_user(&user.user_id);
            for friend in &user.friends {
                graph.add_friendship(&user.user_id, friend);
            }
        }
        log::info!(
            "read friendship graph: {} users, {} friendships",
            graph.user_count(),
            graph.friendship_count()
        );
        Ok(graph)
    }

    /// Adds a user if not yet present and returns its node.
    pub fn add_user(&mut self, user_id: &str) -> NodeIndex {
        if let Some(&idx) = self.user_index.get(user_id) {
            return idx;
        }
        let idx = self.graph.add_node(user_id.to_owned());
        self.user_index.insert(user_id.to_owned(), idx);
        idx
    }

    /// Records a friendship, adding both users as needed.
    ///
    /// Adding the same friendship again (in either direction) has no effect.
    pub fn add_friendship(&mut self, user_id: &str, friend_id: &str) {
        let a = self.add_user(user_id);
        let b = self.add_user(friend_id);
        self.graph.update_edge(a, b, ());
    }

    #[must_use]
    pub fn contains_user(&self, user_id: &str) -> bool {
        self.user_index.contains_key(user_id)
    }

    #[must_use]
    pub fn are_friends(&self, user_id: &str, friend_id: &str) -> bool {
        match (self.user_index.get(user_id), self.user_index.get(friend_id)) {
            (Some(&a), Some(&b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    #[must_use]
    pub fn user_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn friendship_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// User IDs in insertion order.
    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    /// Friendships as `(user, friend)` pairs in insertion order.
    pub fn friendships(&self) -> impl Iterator<Item = (&str, &str)> {
        self.graph.raw_edges().iter().map(|edge| {
            (
                self.graph[edge.source()].as_str(),
                self.graph[edge.target()].as_str(),
            )
        })
    }
}
