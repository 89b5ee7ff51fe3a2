use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info};

use kdsearch::core::logging::init_logging;
use kdsearch::core::retrieval::{load_gallery, read_features};
use kdsearch::{ImageRetriever, RetrievalConfig};

/// Ranks gallery images by similarity to query images, using their
/// pre-extracted features.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (`key = value` lines, or TOML if it ends in `.toml`)
    #[clap(short, long, default_value = "spcbir.config")]
    config: PathBuf,

    /// Nearest gallery features found per query feature (overrides spKNN)
    #[clap(long)]
    knn: Option<usize>,

    /// Gallery images listed per query (overrides spNumOfSimilarImages)
    #[clap(long)]
    similar: Option<usize>,

    /// Feature files of the query images
    #[clap(required = true)]
    queries: Vec<PathBuf>,
}

fn load_config(cli: &Cli) -> Result<RetrievalConfig> {
    let mut config = RetrievalConfig::load_from_file(&cli.config)
        .with_context(|| format!("loading configuration '{}'", cli.config.display()))?;
    if let Some(knn) = cli.knn {
        config.knn = knn;
    }
    if let Some(similar) = cli.similar {
        config.num_of_similar_images = similar;
    }
    config.validate().context("applying command line overrides")?;

    if config.extraction_mode {
        bail!(
            "spExtractionMode = true is not supported: extract features beforehand \
             and set spExtractionMode = false"
        );
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    init_logging(&config).context("initialising logging")?;

    let gallery = load_gallery(&config).context("loading gallery features")?;
    let retriever = ImageRetriever::new(&gallery, &config)?;

    for query in &cli.queries {
        let features = read_features(query, 0, config.pca_dimension)
            .with_context(|| format!("reading query features '{}'", query.display()))?;
        let ranking = retriever.rank(&features)?;
        info!(query = %query.display(), matches = ranking.len(), "query ranked");

        println!("Best candidates for - {} - are:", query.display());
        for image in ranking {
            println!("{}", config.image_path(image.image_index)?.display());
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(&cli).inspect_err(|e| error!("{e:#}"))
}
