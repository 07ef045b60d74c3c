//! meshview command line.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use meshview::RunConfig;
use meshview_core::{Result, ViewerOptions};

#[derive(Parser)]
#[command(name = "meshview")]
#[command(version, about = "Interactive OBJ viewer next to a looping video")]
struct Cli {
    /// Directory containing the .obj meshes (and, by default, trackedvideo.mp4).
    folder: PathBuf,

    /// Video to play in the right viewport.
    #[arg(short, long)]
    video: Option<PathBuf>,

    /// JSON file overriding the default viewer options.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Swap the Y and Z axes of every loaded vertex.
    #[arg(long)]
    swap_yz: bool,
}

impl Cli {
    fn into_config(self) -> Result<RunConfig> {
        let mut options = match &self.config {
            Some(path) => ViewerOptions::load(path)?,
            None => ViewerOptions::default(),
        };
        if self.swap_yz {
            options.swap_yz = true;
        }
        Ok(RunConfig {
            asset_dir: self.folder,
            video: self.video,
            options,
        })
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.into_config().and_then(meshview::run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
