//! wavefront - Inspect and re-export Wavefront OBJ models
//!
//! Usage:
//!   wavefront model.obj                     Summarize groups and the built mesh
//!   wavefront model.obj --group wheel       Build from the group named "wheel"
//!   wavefront model.obj -o out.obj          Write the built mesh back as OBJ

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use wavefront_core::GeometrySource;
use wavefront_obj::{write_obj_file, ObjLoader};

mod settings;

use settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "wavefront", version, about = "Inspect and re-export Wavefront OBJ models")]
struct Cli {
    /// OBJ file to load
    input: PathBuf,

    /// Build the mesh from the group with this name
    #[arg(long, conflicts_with = "group_index")]
    group: Option<String>,

    /// Build the mesh from the group at this index
    #[arg(long)]
    group_index: Option<usize>,

    /// Write the built mesh to this OBJ file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip normals when loading and writing
    #[arg(long)]
    no_normals: bool,

    /// Skip texture coordinates when loading and writing
    #[arg(long)]
    no_tex_coords: bool,

    /// Store the effective load/output flags as the new defaults
    #[arg(long)]
    save_settings: bool,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    let mut settings = Settings::load();
    if cli.no_normals {
        settings.load.load_normals = false;
        settings.output.include_normals = false;
    }
    if cli.no_tex_coords {
        settings.load.load_tex_coords = false;
        settings.output.include_tex_coords = false;
    }
    if cli.save_settings {
        settings.save().context("Failed to save settings")?;
    }

    info!("Loading {:?}", cli.input);
    let mut loader = ObjLoader::open(&cli.input, settings.load);
    if let Some(name) = &cli.group {
        loader.select_group_name(name.as_str());
    }
    if let Some(index) = cli.group_index {
        loader.select_group_index(index);
    }

    let model = loader
        .model()
        .with_context(|| format!("Failed to load {:?}", cli.input))?;
    for warning in loader.warnings() {
        warn!("{}", warning);
    }

    println!(
        "{} positions, {} normals, {} texcoords, {} materials",
        model.pools.positions.len(),
        model.pools.normals.len(),
        model.pools.tex_coords.len(),
        model.materials.len()
    );
    for (index, group) in loader.groups().iter().enumerate() {
        println!(
            "  [{}] {:<24} {:>6} faces {:>6} triangles{}{}",
            index,
            group.name,
            group.faces.len(),
            group.num_triangles(),
            if group.has_normals { "  normals" } else { "" },
            if group.has_tex_coords { "  texcoords" } else { "" },
        );
    }

    let mesh = loader.output_mesh().context("Failed to build mesh")?;
    let attribs: Vec<String> = mesh.attribs().iter().map(|a| a.to_string()).collect();
    println!(
        "mesh ({}): {} vertices, {} indices [{}]",
        loader.selection(),
        loader.num_vertices()?,
        loader.num_indices()?,
        attribs.join(", ")
    );

    if let Some(output) = &cli.output {
        write_obj_file(output, &loader, &settings.output)
            .with_context(|| format!("Failed to write {:?}", output))?;
    }

    Ok(())
}
