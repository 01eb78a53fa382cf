use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use cursor_trails::{EffectKind, GlyphSource, HostRegion, TrailConfig, TrailError};

#[derive(Parser, Debug)]
#[command(name = "cursor-trails", version, about = "Sprites that follow the mouse pointer")]
struct Cli {
    /// Effect to run: springy or fade.
    #[arg(long)]
    effect: Option<EffectKind>,
    /// JSON configuration file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Emoji or image path to use as a sprite. Repeat for several.
    #[arg(long = "glyph")]
    glyphs: Vec<GlyphSource>,
    /// Sprite size in pixels.
    #[arg(long)]
    glyph_size: Option<u32>,
    /// Confine the effect to a region of the window: x,y,width,height.
    #[arg(long, value_parser = parse_host)]
    host: Option<HostRegion>,
    /// Initial window width.
    #[arg(long)]
    width: Option<u32>,
    /// Initial window height.
    #[arg(long)]
    height: Option<u32>,
    /// Print the resolved configuration as JSON and exit.
    #[arg(long)]
    dump_config: bool,
}

fn parse_host(s: &str) -> Result<HostRegion, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid host region '{}': {}", s, e))?;
    match parts[..] {
        [x, y, width, height] => Ok(HostRegion::new(x, y, width, height)),
        _ => Err(format!("host region needs 4 values x,y,width,height, got '{}'", s)),
    }
}

impl Cli {
    fn into_config(self) -> Result<(TrailConfig, bool), TrailError> {
        let mut config = match &self.config {
            Some(path) => {
                log::info!("loading config from {}", path.display());
                TrailConfig::load(path)?
            }
            None => TrailConfig::default(),
        };

        if let Some(effect) = self.effect {
            config.effect = effect;
        }
        if !self.glyphs.is_empty() {
            config.glyphs = self.glyphs;
        }
        if let Some(size) = self.glyph_size {
            config.glyph_size = Some(size);
        }
        if let Some(host) = self.host {
            config.host_surface = Some(host);
        }
        if let Some(width) = self.width {
            config.window_size[0] = width;
        }
        if let Some(height) = self.height {
            config.window_size[1] = height;
        }
        Ok((config, self.dump_config))
    }
}

fn run(cli: Cli) -> Result<(), TrailError> {
    let (config, dump) = cli.into_config()?;
    if dump {
        println!("{}", config.resolved().to_json()?);
        return Ok(());
    }
    config.validate()?;
    cursor_trails::run(config)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
