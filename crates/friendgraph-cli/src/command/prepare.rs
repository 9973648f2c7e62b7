use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use friendgraph_pipeline::{
    loader::{self, AttributeMap},
    pipeline::{self, PipelineConfig},
    record::UserRecord,
};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg64;

use crate::{
    schema::dataset::{DatasetFile, DatasetMetadata},
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct PrepareArg {
    /// Path to the pipeline configuration JSON file
    #[arg(long)]
    config: PathBuf,

    /// Combined user file (one JSON object per line)
    #[arg(long, required_unless_present = "attribute", conflicts_with = "attribute")]
    users: Option<PathBuf>,

    /// Processed attribute file as NAME=PATH; repeat to join several attributes
    #[arg(long, value_parser = parse_named_path)]
    attribute: Vec<(String, PathBuf)>,

    /// Seed for sampling and shuffling (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Share of the balanced dataset used for training (overrides the config)
    #[arg(long)]
    training_fraction: Option<f64>,

    /// Keep the balanced dataset in sampling order instead of shuffling it
    #[arg(long)]
    no_shuffle: bool,

    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

fn parse_named_path(s: &str) -> Result<(String, PathBuf), String> {
    let (name, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=PATH, got '{s}'"))?;
    if name.is_empty() || path.is_empty() {
        return Err(format!("expected NAME=PATH, got '{s}'"));
    }
    Ok((name.to_owned(), PathBuf::from(path)))
}

pub(crate) fn run(arg: &PrepareArg) -> anyhow::Result<()> {
    let mut config: PipelineConfig = util::read_json_file("pipeline config", &arg.config)?;
    if let Some(seed) = arg.seed {
        config.seed = Some(seed);
    }
    if let Some(fraction) = arg.training_fraction {
        config.training_fraction = fraction;
    }
    if arg.no_shuffle {
        config.shuffle = false;
    }
    config
        .validate()
        .with_context(|| format!("Invalid pipeline config: {}", arg.config.display()))?;

    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    log::info!("using seed {seed}");

    let records = load_records(arg, &config)?;
    let mut rng = Pcg64::seed_from_u64(seed);
    let prepared =
        pipeline::prepare(records, &config, &mut rng).context("Failed to prepare dataset")?;

    let file = DatasetFile {
        metadata: DatasetMetadata {
            created_at: chrono::Utc::now(),
            seed,
            label_attribute: config.label_attribute,
            schema: config.schema,
            training_fraction: config.training_fraction,
            population: prepared.population,
            sampled: prepared.sampled,
            normalization: prepared.normalization,
        },
        split: prepared.split,
    };
    Output::save_json(&file, arg.output.clone())
}

fn load_records(arg: &PrepareArg, config: &PipelineConfig) -> anyhow::Result<Vec<UserRecord>> {
    if let Some(path) = &arg.users {
        let reader = util::open_reader("users", path)?;
        return loader::read_users(reader, &config.input_attributes())
            .with_context(|| format!("Failed to read users file: {}", path.display()));
    }

    let maps = arg
        .attribute
        .iter()
        .map(|(name, path)| -> anyhow::Result<(String, AttributeMap)> {
            let reader = util::open_reader("attribute", path)?;
            let map = loader::read_attribute_map(reader)
                .with_context(|| format!("Failed to read attribute file: {}", path.display()))?;
            log::info!("read {} values of '{name}' from {}", map.len(), path.display());
            Ok((name.clone(), map))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(loader::join_attribute_maps(&maps))
}
