//! Friendship graph construction and D3 force-directed export
//!
//! Users and their friendships are read from a JSON-lines user file, where
//! each line carries a `user_id` and a `friends` list:
//!
//! ```json
//! {"user_id": "u1", "friends": ["u2", "u3"], "review_count": 12}
//! ```
//!
//! The graph is undirected and simple: a friendship listed by both users
//! becomes one edge.
//!
//! # Examples
//!
//! ```
//! use friendgraph_graph::FriendshipGraph;
//!
//! let input = r#"{"user_id": "u1", "friends": ["u2", "u3"]}
//! {"user_id": "u2", "friends": ["u1"]}
//! "#;
//! let graph = FriendshipGraph::read_user_graph(input.as_bytes()).unwrap();
//! assert_eq!(graph.user_count(), 3);
//! assert_eq!(graph.friendship_count(), 2);
//!
//! let d3 = graph.to_d3();
//! assert_eq!(d3.nodes[0].name, "u1");
//! assert_eq!(d3.links[0].value, 1);
//! ```

pub use self::{d3::*, graph::*};

mod d3;
mod graph;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum GraphError {
    #[display("failed to read or write graph data")]
    Io(#[error(source)] std::io::Error),
    #[display("invalid user on line {line}")]
    #[from(skip)]
    User {
        line: usize,
        source: serde_json::Error,
    },
    #[display("failed to serialize D3 graph")]
    Serialize(#[error(source)] serde_json::Error),
}
