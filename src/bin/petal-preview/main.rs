// petal-preview - Render the petal field to a PNG without a browser
//
// Steps the same field the web driver runs, then rasterizes the final
// frame. Handy for tuning density and motion ranges in a config file.
//
// Usage: cargo run --bin petal-preview -- --width 1920 --height 1080 --frames 300 -o petals.png

#[cfg(not(target_arch = "wasm32"))]
mod raster;

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = cli::Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if cli.verbose > 0 {
        log::set_max_level(match cli.verbose {
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    }

    cli::run(cli)
}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::fs;
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};
    use clap::Parser;
    use petal_engine::driver::Viewport;
    use petal_engine::render::SpriteStyle;
    use petal_engine::{FieldConfig, NullRenderer, PetalField};

    use crate::raster::RasterRenderer;

    #[derive(Parser)]
    #[command(name = "petal-preview")]
    #[command(about = "Render a frame of the falling-petal background to PNG", long_about = None)]
    #[command(version)]
    pub struct Cli {
        /// Viewport width in CSS pixels
        #[arg(long, default_value_t = 1280.0)]
        pub width: f64,

        /// Viewport height in CSS pixels
        #[arg(long, default_value_t = 720.0)]
        pub height: f64,

        /// Device pixel ratio of the output image
        #[arg(long, default_value_t = 1.0)]
        pub dpr: f64,

        /// Frames to simulate before capturing
        #[arg(long, default_value_t = 180)]
        pub frames: u32,

        /// Simulated time per frame (ms)
        #[arg(long, default_value_t = 16.67)]
        pub frame_ms: f64,

        #[arg(long, default_value_t = 1)]
        pub seed: u64,

        /// JSON file overriding field settings
        #[arg(long)]
        pub config: Option<PathBuf>,

        /// Background colour, #rrggbb or #rrggbbaa
        #[arg(long, default_value = "#1d1a2b")]
        pub background: String,

        #[arg(short, long, default_value = "petals.png")]
        pub output: PathBuf,

        /// Verbosity level (can be repeated for more detail)
        #[arg(short, long, action = clap::ArgAction::Count)]
        pub verbose: u8,
    }

    pub fn run(cli: Cli) -> Result<()> {
        let config = match &cli.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                FieldConfig::from_json(&json)?
            }
            None => FieldConfig::default(),
        };
        let background = parse_hex(&cli.background)?;

        let vp = Viewport::new(cli.width, cli.height, cli.dpr);
        let (bw, bh) = vp.backing_size();
        if bw == 0 || bh == 0 {
            bail!("viewport {}x{} has no pixels", cli.width, cli.height);
        }

        let style = SpriteStyle::from_config(&config);
        let mut field = PetalField::new(config, cli.seed)?;
        field.reinitialize(vp.width, vp.height);
        log::info!("simulating {} petals for {} frames", field.len(), cli.frames);

        for _ in 1..cli.frames.max(1) {
            field.step(cli.frame_ms, &mut NullRenderer);
        }

        let mut raster = RasterRenderer::new(bw, bh, vp.dpr, background, style);
        field.step(cli.frame_ms, &mut raster);

        raster
            .into_image()
            .save(&cli.output)
            .with_context(|| format!("writing {}", cli.output.display()))?;
        log::info!("wrote {} ({}x{})", cli.output.display(), bw, bh);
        Ok(())
    }

    pub fn parse_hex(s: &str) -> Result<[u8; 4]> {
        let hex = s.trim_start_matches('#');
        let v = u32::from_str_radix(hex, 16).with_context(|| format!("bad colour {s:?}"))?;
        match hex.len() {
            6 => Ok([(v >> 16) as u8, (v >> 8) as u8, v as u8, 255]),
            8 => Ok([(v >> 24) as u8, (v >> 16) as u8, (v >> 8) as u8, v as u8]),
            _ => bail!("bad colour {s:?}: expected #rrggbb or #rrggbbaa"),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn hex_colours() {
            assert_eq!(parse_hex("#1d1a2b").unwrap(), [0x1d, 0x1a, 0x2b, 255]);
            assert_eq!(parse_hex("ff000080").unwrap(), [255, 0, 0, 0x80]);
            assert!(parse_hex("#fff").is_err());
            assert!(parse_hex("#zzzzzz").is_err());
        }

        #[test]
        fn cli_defaults() {
            let cli = Cli::parse_from(["petal-preview"]);
            assert_eq!(cli.width, 1280.0);
            assert_eq!(cli.frames, 180);
            assert_eq!(cli.output, PathBuf::from("petals.png"));
        }
    }
}
