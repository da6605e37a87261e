use anyhow::Context;
use fingerpaint::{config::Config, preview, DrawingSurface, PointerEvent, Touch};
use gumdrop::Options;
use std::path::PathBuf;

#[derive(gumdrop::Options, Debug)]
pub struct Args {
    #[options(help = "Show this message")]
    help: bool,

    #[options(help = "Print the version", short = "V")]
    pub version: bool,

    #[options(help = "Config file location")]
    pub config: Option<PathBuf>,

    #[options(help = "Print the default config file and exit", no_short)]
    pub print_default_config: bool,

    #[options(help = "Render the width picker swatch at this width", no_short)]
    pub preview_width: Option<f32>,

    #[options(help = "Replay a two-finger scribble and save it here", no_short)]
    pub demo: Option<PathBuf>,

    #[options(help = "Where to write the swatch", short = "o")]
    pub output: Option<PathBuf>,
}

fn two_finger_scribble() -> Vec<PointerEvent> {
    let mut events = vec![PointerEvent::new(vec![
        Touch::start(0, 40., 60.),
        Touch::start(1, 40., 180.),
    ])];

    events.extend((1..=24).map(|step| {
        let x = 40. + step as f32 * 22.;
        let wave = (step as f32 * 0.6).sin() * 30.;
        PointerEvent::new(vec![
            Touch::moved(0, x, 60. + wave),
            Touch::moved(1, x, 180. - wave),
        ])
    }));

    events.push(Touch::end(0, 568., 60.).into());
    events.push(Touch::end(1, 568., 180.).into());
    events
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse_args_default_or_exit();

    if args.version {
        println!("fingerpaint util version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.print_default_config {
        println!("{}", Config::new().to_ron_string()?);
        return Ok(());
    }

    let config = match args.config.as_ref() {
        Some(path) => Config::from_disk(path),
        None => Config::from_disk(&Config::config_path()?),
    };

    if let Some(width) = args.preview_width {
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from("preview.png"));
        preview::width_preview(config.stroke_color, width)?
            .export_to_file(&output)
            .with_context(|| format!("writing swatch to {}", output.display()))?;
        println!("wrote {}", output.display());
    }

    if let Some(output) = args.demo.as_ref() {
        let mut surface = DrawingSurface::with_config(608, 240, &config, ())?;
        for event in two_finger_scribble() {
            surface.on_pointer_event(&event);
        }

        surface
            .export_to_file(output)
            .with_context(|| format!("writing demo to {}", output.display()))?;
        println!("wrote {}", output.display());
    }

    Ok(())
}
