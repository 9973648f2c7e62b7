use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::{FriendshipGraph, GraphError};

/// Graph in the node/link shape expected by a D3 force-directed layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct D3Graph {
    pub nodes: Vec<D3Node>,
    pub links: Vec<D3Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct D3Node {
    pub name: String,
}

/// Link between two nodes, referenced by user ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct D3Link {
    pub source: String,
    pub target: String,
    /// Link weight; every friendship weighs 1
    pub value: u32,
}

impl FriendshipGraph {
    #[must_use]
    pub fn to_d3(&self) -> D3Graph {
        D3Graph {
            nodes: self
                .users()
                .map(|name| D3Node {
                    name: name.to_owned(),
                })
                .collect(),
            links: self
                .friendships()
                .map(|(source, target)| D3Link {
                    source: source.to_owned(),
                    target: target.to_owned(),
                    value: 1,
                })
                .collect(),
        }
    }

    /// Writes the D3 representation as compact JSON.
    pub fn write_d3<W>(&self, writer: W) -> Result<(), GraphError>
    where
        W: Write,
    {
        serde_json::to_writer(writer, &self.to_d3())?;
        Ok(())
    }
}
