#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!(
        "The wavepng CLI requires the \"cli\" feature. Rebuild with `--features cli` to enable it."
    );
}

#[cfg(feature = "cli")]
mod cli {
    use std::io::{self, Write};
    use std::path::{Path, PathBuf};

    use anyhow::{bail, Context};
    use clap::Parser;
    use wavepng::export::{default_output_name, save_png, write_png};
    use wavepng::render::{ColorZone, DrawStyle, RenderConfig, Rgb, WaveformRenderer};

    #[derive(Parser, Debug)]
    #[command(name = "wavepng")]
    #[command(about = "Render a waveform image from PCM WAV audio")]
    pub struct Args {
        /// WAV file per channel (one, or two with --stereo), or a single MP3 with --mp3
        #[arg(required = true, num_args = 1..=2)]
        inputs: Vec<PathBuf>,

        /// Output PNG path, `-` for stdout (default: first input with .png extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON render configuration; other flags override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Output height in pixels
        #[arg(long)]
        height: Option<u32>,

        /// Stroke color (#rrggbb)
        #[arg(long, value_parser = parse_color)]
        foreground: Option<Rgb>,

        /// Background color (#rrggbb); transparent when omitted
        #[arg(long, value_parser = parse_color)]
        background: Option<Rgb>,

        /// Transparent background, overriding a color from --config
        #[arg(long, conflicts_with = "background")]
        transparent: bool,

        /// Keep one point out of every DETAIL (larger = coarser)
        #[arg(long)]
        detail: Option<u32>,

        /// Render two channels stacked vertically
        #[arg(long)]
        stereo: bool,

        /// Draw style: waveform or bars
        #[arg(long, value_parser = parse_style)]
        style: Option<DrawStyle>,

        /// Color zone MIN:MAX:#rrggbb in seconds, repeatable; later zones win
        #[arg(long = "zone", value_parser = parse_zone)]
        zones: Vec<ColorZone>,

        /// Treat the input as MP3 and decode it with lame first
        #[arg(long)]
        mp3: bool,

        /// lame binary to use with --mp3
        #[arg(long, default_value = "lame")]
        lame: PathBuf,

        /// Debug logging (RUST_LOG takes precedence)
        #[arg(short, long)]
        verbose: bool,
    }

    fn parse_color(value: &str) -> Result<Rgb, String> {
        value.parse().map_err(|e: wavepng::WaveformError| e.to_string())
    }

    fn parse_style(value: &str) -> Result<DrawStyle, String> {
        value.parse().map_err(|e: wavepng::WaveformError| e.to_string())
    }

    fn parse_zone(value: &str) -> Result<ColorZone, String> {
        value.parse().map_err(|e: wavepng::WaveformError| e.to_string())
    }

    impl Args {
        /// Config file (if any) with command-line overrides applied
        pub fn render_config(&self) -> anyhow::Result<RenderConfig> {
            let mut config = match &self.config {
                Some(path) => RenderConfig::from_json_file(path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => RenderConfig::default(),
            };

            if let Some(width) = self.width {
                config.width = width;
            }
            if let Some(height) = self.height {
                config.height = height;
            }
            if let Some(color) = self.foreground {
                config.foreground = color;
            }
            if self.transparent {
                config.background = None;
            } else if self.background.is_some() {
                config.background = self.background;
            }
            if let Some(detail) = self.detail {
                config.detail = detail;
            }
            if self.stereo {
                config.stereo = true;
            }
            if let Some(style) = self.style {
                config.style = style;
            }
            config.zones.extend(self.zones.iter().copied());

            config.validate()?;
            Ok(config)
        }
    }

    fn init_logging(verbose: bool) {
        let default = if verbose { "debug" } else { "info" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
            .format_timestamp_millis()
            .init();
    }

    fn render_wav(config: RenderConfig, inputs: &[PathBuf]) -> anyhow::Result<image::RgbaImage> {
        let mut renderer = WaveformRenderer::new(config)?;
        let image = renderer
            .render_files(inputs)
            .with_context(|| format!("rendering {}", describe(inputs)))?;
        Ok(image)
    }

    #[cfg(feature = "lame")]
    fn render_mp3(args: &Args, config: RenderConfig) -> anyhow::Result<image::RgbaImage> {
        if args.inputs.len() != 1 {
            bail!("--mp3 takes exactly one input file");
        }
        let lame = wavepng::transcode::LameTranscoder::with_binary(&args.lame);
        let streams = lame
            .transcode(&args.inputs[0], config.stereo)
            .with_context(|| format!("transcoding {}", args.inputs[0].display()))?;
        render_wav(config, streams.paths())
    }

    #[cfg(not(feature = "lame"))]
    fn render_mp3(_args: &Args, _config: RenderConfig) -> anyhow::Result<image::RgbaImage> {
        bail!("MP3 input requires the \"lame\" feature")
    }

    fn describe(inputs: &[PathBuf]) -> String {
        inputs
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn run() -> anyhow::Result<()> {
        let args = Args::parse();
        init_logging(args.verbose);

        let config = args.render_config()?;
        log::info!(
            "rendering {} as {} {}x{} (detail {}, {})",
            describe(&args.inputs),
            config.style,
            config.width,
            config.height,
            config.detail,
            if config.stereo { "stereo" } else { "mono" }
        );

        let image = if args.mp3 {
            render_mp3(&args, config)?
        } else {
            render_wav(config, &args.inputs)?
        };

        let output = args
            .output
            .clone()
            .unwrap_or_else(|| default_output_name(&args.inputs[0]));
        if output == Path::new("-") {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write_png(&image, &mut lock).context("writing PNG to stdout")?;
            lock.flush()?;
        } else {
            save_png(&image, &output).with_context(|| format!("writing {}", output.display()))?;
            log::info!("wrote {}", output.display());
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
fn main() {
    if let Err(err) = cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
