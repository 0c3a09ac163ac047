use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use colour_palette::{
    ClusterSpace, ImageSource, KmeansParams, Palette, PaletteConfig, Pipeline, SwatchBoard,
};
use anyhow::Context;
use anyhow::Result;

/// Extract the dominant colours of images with k-means.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Image files or directories of images
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Number of colors in the palette
    #[arg(short = 'k', long, default_value_t = 6)]
    clusters: usize,

    /// Maximum k-means iterations
    #[arg(long, default_value_t = 20)]
    max_iter: usize,

    /// Seed for k-means initialisation
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Cluster in CIE Lab instead of RGB
    #[arg(long)]
    lab: bool,

    /// Print the palette as JSON
    #[arg(long)]
    json: bool,

    /// Show the six-slot swatch row instead of every entry
    #[arg(long, conflicts_with = "json")]
    swatches: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = PaletteConfig::default()
        .with_cluster_count(args.clusters)
        .with_kmeans(KmeansParams {
            max_iterations: args.max_iter,
            seed: args.seed,
            space: if args.lab { ClusterSpace::Lab } else { ClusterSpace::Rgb },
            ..KmeansParams::default()
        });
    let pipeline = Pipeline::new(config);
    let mut board = SwatchBoard::default();

    for input in &args.inputs {
        let palette = pipeline
            .run(&ImageSource::from(input.as_path()))
            .with_context(|| format!("palette extraction failed for {}", input.display()))?;

        if args.json {
            println!("{}", to_json(input, &palette));
        } else if args.swatches {
            board.apply(&palette);
            println!("{}", input.display());
            let row: Vec<String> = board
                .slots()
                .iter()
                .map(|s| {
                    let [r, g, b] = s.rgb;
                    format!(" {} ", s.label).as_str().on_truecolor(r, g, b).to_string()
                })
                .collect();
            println!("{}", row.join(""));
        } else {
            println!("{}", input.display());
            for entry in &palette {
                let [r, g, b] = entry.rgb();
                println!(
                    "  {}  {}  {:>6}  {:5.1}%",
                    "      ".on_truecolor(r, g, b),
                    entry.hex(),
                    entry.count,
                    palette.share(entry) * 100.0
                );
            }
        }
    }

    Ok(())
}

fn to_json(input: &Path, palette: &Palette) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = palette
        .iter()
        .map(|e| serde_json::json!({ "hex": e.hex(), "count": e.count }))
        .collect();
    serde_json::json!({
        "source": input.display().to_string(),
        "samples": palette.total(),
        "palette": entries,
    })
}
