#[cfg(not(target_os = "android"))]
fn main() -> anyhow::Result<()> {
    use addonpack_platform::CreationParams;
    use addonpack_platform_desktop::DesktopDevice;
    use anyhow::Context;
    use clap::Parser;
    use tracing_subscriber::EnvFilter;

    /// Extracts the bundled add-ons pack into the game's data directory.
    #[derive(Parser, Debug)]
    #[command(name = "addonpack", version)]
    struct Args {
        /// Window width in pixels.
        #[arg(long, default_value_t = 800)]
        width: u32,

        /// Window height in pixels.
        #[arg(long, default_value_t = 600)]
        height: u32,

        /// Start fullscreen on the primary output.
        #[arg(long)]
        fullscreen: bool,

        /// Present frames without waiting for vertical sync.
        #[arg(long)]
        no_vsync: bool,

        /// Enable joystick polling.
        #[arg(long)]
        joystick: bool,

        /// Directory holding the bundled assets.
        #[arg(long, default_value = "data")]
        data_dir: std::path::PathBuf,
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let params = CreationParams {
        window_width: args.width,
        window_height: args.height,
        fullscreen: args.fullscreen,
        vsync: !args.no_vsync,
        joystick_support: args.joystick,
        ..CreationParams::default()
    };

    let assets = addonpack_app::assets::DirAssets::open(&args.data_dir)
        .with_context(|| format!("reading assets from {}", args.data_dir.display()))?;
    let mut device = DesktopDevice::new(params).context("initializing the window")?;
    let search = addonpack_app::install::desktop_search_paths();
    addonpack_app::run(&mut device, Box::new(assets), &search)
}

#[cfg(target_os = "android")]
fn main() {}
