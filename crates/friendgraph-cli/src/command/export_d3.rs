use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use friendgraph_graph::FriendshipGraph;

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct ExportD3Arg {
    /// Combined user file with `user_id` and `friends` on every line
    users: PathBuf,

    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ExportD3Arg) -> anyhow::Result<()> {
    let reader = util::open_reader("users", &arg.users)?;
    let graph = FriendshipGraph::read_user_graph(reader)
        .with_context(|| format!("Failed to read users file: {}", arg.users.display()))?;

    let mut output = Output::from_output_path(arg.output.clone())?;
    graph
        .write_d3(&mut output)
        .with_context(|| format!("Failed to write D3 graph to {}", output.display_path()))?;
    output.finish()?;
    log::info!(
        "exported {} users and {} friendships to {}",
        graph.user_count(),
        graph.friendship_count(),
        output.display_path()
    );
    Ok(())
}
