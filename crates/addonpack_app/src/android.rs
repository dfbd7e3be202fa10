//! Android entry point and APK asset access.
//!
//! The APK cannot be enumerated at runtime, so the build bundles a
//! `data/files.txt` manifest listing every asset; loading goes through
//! the NDK asset manager.

use std::ffi::CString;
use std::io::{self, Read};
use std::path::PathBuf;

use android_activity::AndroidApp;
use ndk::asset::AssetManager;

use addonpack_platform::CreationParams;
use addonpack_platform_android::AndroidDevice;

use crate::assets::AssetSource;
use crate::install;

struct ApkAssets {
    manager: AssetManager,
    names: Vec<String>,
}

impl ApkAssets {
    fn new(app: &AndroidApp) -> io::Result<Self> {
        let manager = app
            .asset_manager()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no APK asset manager"))?;
        let mut listing = String::new();
        open_asset(&manager, "data/files.txt")?.read_to_string(&mut listing)?;
        let names = listing
            .lines()
            .filter_map(|line| {
                let line = line.trim();
                if line.is_empty() {
                    None
                } else {
                    Some(line.strip_prefix("data/").unwrap_or(line).to_string())
                }
            })
            .collect();
        Ok(Self { manager, names })
    }
}

fn open_asset(manager: &AssetManager, path: &str) -> io::Result<ndk::asset::Asset> {
    let cpath = CString::new(path)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "asset name with NUL"))?;
    manager
        .open(&cpath)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no asset {path}")))
}

impl AssetSource for ApkAssets {
    fn list(&self) -> &[String] {
        &self.names
    }

    fn load(&self, name: &str) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        open_asset(&self.manager, &format!("data/{name}"))?.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

/// Places the game might keep its data, most specific first. Storage
/// layouts vary a lot across vendors, so this is a broad sweep.
fn search_paths(app: &AndroidApp) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for var in [install::DATA_DIR_ENV, "EXTERNAL_STORAGE", "SECONDARY_STORAGE"] {
        if let Ok(dir) = std::env::var(var) {
            paths.push(PathBuf::from(dir));
        }
    }
    if let Some(dir) = app.external_data_path() {
        paths.push(dir);
    }
    if let Some(dir) = app.internal_data_path() {
        paths.push(dir);
    }
    paths.push(PathBuf::from("/sdcard/"));
    paths.push(PathBuf::from("/storage/sdcard0/"));
    paths.push(PathBuf::from("/storage/sdcard1/"));
    paths.push(PathBuf::from(format!(
        "/data/data/{}/files/",
        install::PROJECT_ID
    )));
    paths
}

fn run_app(app: AndroidApp) -> anyhow::Result<()> {
    let assets = ApkAssets::new(&app)?;
    let search = search_paths(&app);
    let params = CreationParams {
        fullscreen: true,
        ..CreationParams::default()
    };
    let mut device = AndroidDevice::new(app, params)?;
    crate::run(&mut device, Box::new(assets), &search)
}

#[no_mangle]
fn android_main(app: AndroidApp) {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Info)
            .with_tag("addonpack"),
    );
    if let Err(err) = run_app(app) {
        log::error!("fatal: {err:#}");
    }
}
