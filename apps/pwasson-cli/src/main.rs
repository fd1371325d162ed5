mod demo;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use pwasson_common::EngineConfig;
use pwasson_input::Key;
use pwasson_render::{DebugTextRenderer, RenderView, Renderer};
use pwasson_scene::Scene;
use tracing_subscriber::EnvFilter;

use crate::demo::Demo;

#[derive(Parser)]
#[command(name = "pwasson", about = "Headless driver for the pwasson 2D physics engine")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Print the engine configuration as YAML
    Config {
        /// Load and validate this file instead of printing the defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run the platform demo without a window
    Run {
        /// Number of frames to feed the loop driver
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// Number of random blocks to spawn
        #[arg(short, long, default_value = "50")]
        blocks: usize,
        /// Seed for block placement
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Simulated real time per frame, in milliseconds
        #[arg(long, default_value = "17")]
        frame_ms: u64,
        /// Keys held for the whole run, comma separated (e.g. "right,space")
        #[arg(long, value_delimiter = ',')]
        hold: Vec<String>,
        /// Engine configuration file (.yaml, .yml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the scene every N steps (0 prints only the final frame)
        #[arg(long, default_value = "0")]
        print_every: u64,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<EngineConfig> {
    Ok(match path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("pwasson v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", pwasson_common::crate_info());
            println!("kernel: {}", pwasson_kernel::crate_info());
            println!("input: {}", pwasson_input::crate_info());
            println!("scene: {}", pwasson_scene::crate_info());
            println!("render: {}", pwasson_render::crate_info());
        }
        Commands::Config { config } => {
            let config = load_config(config.as_ref())?;
            print!("{}", config.to_yaml()?);
        }
        Commands::Run {
            frames,
            blocks,
            seed,
            frame_ms,
            hold,
            config,
            print_every,
        } => {
            let config = load_config(config.as_ref())?;
            let mut scene = Scene::new("main", &config)?;
            let mut demo = Demo::build(&mut scene, blocks, seed)?;
            for name in &hold {
                let key: Key = name.parse()?;
                demo.keys_mut().key_down(key);
            }

            let renderer = DebugTextRenderer::new();
            let elapsed = Duration::from_millis(frame_ms);
            let mut steps = 0u64;
            let mut contacts = 0usize;
            let mut skipped = 0usize;

            for _ in 0..frames {
                let Some(report) = scene.advance(elapsed, &mut demo)? else {
                    continue;
                };
                steps += 1;
                contacts += report.stats.contacts;
                skipped += report.stats.skipped_pairs;
                if print_every > 0 && report.tick.frame % print_every == 0 {
                    let view = RenderView {
                        frame: report.tick.frame,
                        fps: scene.clock().fps(),
                        ..RenderView::default()
                    };
                    print!("{}", renderer.render(&scene, &view));
                }
            }

            let view = RenderView {
                frame: scene.clock().frames(),
                fps: scene.clock().fps(),
                ..RenderView::default()
            };
            print!("{}", renderer.render(&scene, &view));

            tracing::info!(frames, steps, contacts, skipped, "run complete");
            if let Some(player) = scene.world().get(demo.player()) {
                println!(
                    "player: pos=({:.2}, {:.2}) vel=({:.2}, {:.2}) jumping={} landings={} resets={}",
                    player.position.x,
                    player.position.y,
                    player.velocity.x,
                    player.velocity.y,
                    demo.is_jumping(),
                    demo.landings(),
                    demo.resets()
                );
            }
        }
    }

    Ok(())
}
