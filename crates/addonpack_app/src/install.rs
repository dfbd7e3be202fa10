//! Installation state machine and game directory discovery.
//!
//! The pack carries its payload under an `extract/` prefix inside the
//! assets, plus an optional `extract_settings.txt` that names the pack
//! and its completion marker. Installation copies one payload file per
//! step so a render loop can draw progress between files.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::assets::AssetSource;

/// Asset name prefix selecting the files that get installed.
pub const PAYLOAD_PREFIX: &str = "extract/";

/// Game data directory names probed inside each search path.
pub const GAME_DIR: &str = "stk";
pub const GAME_DIR_ALT: &str = "supertuxkart";

/// Environment variable that overrides the search list.
pub const DATA_DIR_ENV: &str = "SUPERTUXKART_DATADIR";

/// Package identifier, used for the fallback app-data path on Android.
pub const PROJECT_ID: &str = "org.supertuxkart.stk";

/// Values parsed from `extract_settings.txt`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstallSettings {
    /// Window caption and heading.
    pub title: String,
    /// Marker file name touched in the destination once extraction
    /// finished, and checked on startup to detect a prior install.
    pub marker: String,
    /// Background image shown behind the text panel.
    pub screenshot: String,
}

impl Default for InstallSettings {
    fn default() -> Self {
        Self {
            title: "Add-ons pack".into(),
            marker: ".addon_extracted".into(),
            screenshot: String::new(),
        }
    }
}

/// Parses the `key=value` lines of `extract_settings.txt`. Unknown keys
/// and malformed lines are ignored; `name` sets the marker to
/// `.{name}_extracted`.
pub fn parse_settings(text: &str) -> InstallSettings {
    let mut settings = InstallSettings::default();
    for line in text.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim_end_matches(['\r']);
        match key {
            "name" => settings.marker = format!(".{value}_extracted"),
            "title" => settings.title = value.to_string(),
            "screenshot" => settings.screenshot = value.to_string(),
            _ => {}
        }
    }
    settings
}

/// Finds an installed game data directory. Each search path is probed
/// for `stk/.extracted` and then `supertuxkart/.extracted`; the first
/// hit wins.
pub fn find_game_data_dir(search: &[PathBuf]) -> Option<PathBuf> {
    for base in search {
        for name in [GAME_DIR, GAME_DIR_ALT] {
            let dir = base.join(name);
            if dir.join(".extracted").is_file() {
                info!(dir = %dir.display(), "found game data directory");
                return Some(dir);
            }
        }
    }
    None
}

/// Search paths probed on desktop. The game keeps its downloaded data
/// next to the working directory there.
pub fn desktop_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        paths.push(PathBuf::from(dir));
    }
    paths.push(PathBuf::from("./external_data"));
    paths
}

/// What the installer is currently doing. Drives the scene's texts and
/// button states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstallState {
    /// No game data directory was found; installation is impossible.
    DestinationNotFound,
    /// A destination exists and the pack has not been installed yet.
    NotInstalled,
    /// The completion marker is already present in the destination.
    AlreadyInstalled,
    /// Extraction is running, one file per step.
    Installing,
    /// Extraction finished and the marker was written.
    Installed,
    /// A file failed to extract; the run was abandoned.
    Failed,
}

/// Copies the payload into the game data directory one file per
/// [`step`](Installer::step) call.
pub struct Installer {
    assets: Box<dyn AssetSource>,
    payload: Vec<String>,
    next: usize,
    destination: Option<PathBuf>,
    marker: String,
    state: InstallState,
}

impl Installer {
    pub fn new(
        assets: Box<dyn AssetSource>,
        destination: Option<PathBuf>,
        settings: &InstallSettings,
    ) -> Self {
        let payload: Vec<String> = assets
            .list()
            .iter()
            .filter(|name| name.starts_with(PAYLOAD_PREFIX))
            .cloned()
            .collect();
        let state = match &destination {
            None => InstallState::DestinationNotFound,
            Some(dir) if dir.join(&settings.marker).is_file() => InstallState::AlreadyInstalled,
            Some(_) => InstallState::NotInstalled,
        };
        debug!(files = payload.len(), ?state, "installer ready");
        Self {
            assets,
            payload,
            next: 0,
            destination,
            marker: settings.marker.clone(),
            state,
        }
    }

    pub fn state(&self) -> InstallState {
        self.state
    }

    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    /// Fraction of the payload written so far, in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        match self.state {
            InstallState::Installed | InstallState::AlreadyInstalled => 1.0,
            InstallState::Installing if !self.payload.is_empty() => {
                self.next as f32 / self.payload.len() as f32
            }
            _ => 0.0,
        }
    }

    /// Starts (or restarts) extraction. Refused while already running
    /// or without a destination.
    pub fn begin(&mut self) -> bool {
        match self.state {
            InstallState::Installing | InstallState::DestinationNotFound => false,
            _ => {
                self.next = 0;
                self.state = InstallState::Installing;
                info!(files = self.payload.len(), "starting extraction");
                true
            }
        }
    }

    /// Extracts the next payload file. Writes the completion marker and
    /// flips to [`InstallState::Installed`] once every file is out; any
    /// write error abandons the run as [`InstallState::Failed`].
    pub fn step(&mut self) {
        if self.state != InstallState::Installing {
            return;
        }
        let Some(dest) = self.destination.clone() else {
            self.state = InstallState::Failed;
            return;
        };
        if self.next >= self.payload.len() {
            match touch(&dest.join(&self.marker)) {
                Ok(()) => {
                    info!("extraction complete");
                    self.state = InstallState::Installed;
                }
                Err(err) => {
                    warn!(%err, "could not write completion marker");
                    self.state = InstallState::Failed;
                }
            }
            return;
        }
        let name = self.payload[self.next].clone();
        if let Err(err) = self.extract_one(&dest, &name) {
            warn!(file = %name, %err, "extraction failed");
            self.state = InstallState::Failed;
            return;
        }
        self.next += 1;
    }

    fn extract_one(&self, dest: &Path, name: &str) -> io::Result<()> {
        let rest = name.strip_prefix(PAYLOAD_PREFIX).unwrap_or(name);
        let target = dest.join(rest);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = self.assets.load(name)?;
        debug!(file = %rest, size = bytes.len(), "extracting");
        std::fs::write(target, bytes)
    }
}

fn touch(path: &Path) -> io::Result<()> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use crate::test_dir::TestDir;

    fn pack() -> Box<MemoryAssets> {
        Box::new(MemoryAssets::new(vec![
            ("extract_settings.txt".into(), b"name=testpack".to_vec()),
            ("extract/readme.txt".into(), b"hello".to_vec()),
            ("extract/music/a.ogg".into(), b"12345".to_vec()),
            ("icon.png".into(), b"ignored".to_vec()),
        ]))
    }

    #[test]
    fn settings_lines_override_the_defaults() {
        let settings = parse_settings("name=voxel\ntitle=Voxel pack\nbogus line\nother=1");
        assert_eq!(settings.marker, ".voxel_extracted");
        assert_eq!(settings.title, "Voxel pack");
        assert_eq!(parse_settings("").marker, ".addon_extracted");
    }

    #[test]
    fn discovery_prefers_the_short_directory_name() {
        let dir = TestDir::new("discovery");
        dir.write("stk/.extracted", b"");
        dir.write("supertuxkart/.extracted", b"");
        let found = find_game_data_dir(&[dir.path().to_path_buf()]).unwrap();
        assert!(found.ends_with("stk"));
    }

    #[test]
    fn discovery_falls_back_to_the_long_name() {
        let dir = TestDir::new("discovery_alt");
        dir.write("supertuxkart/.extracted", b"");
        let found = find_game_data_dir(&[dir.path().to_path_buf()]).unwrap();
        assert!(found.ends_with("supertuxkart"));
        assert!(find_game_data_dir(&[dir.path().join("empty")]).is_none());
    }

    #[test]
    fn full_run_writes_payload_and_marker() {
        let dir = TestDir::new("full_run");
        dir.write("stk/.extracted", b"");
        let dest = dir.path().join("stk");
        let settings = parse_settings("name=testpack");
        let mut installer = Installer::new(pack(), Some(dest.clone()), &settings);
        assert_eq!(installer.state(), InstallState::NotInstalled);

        assert!(installer.begin());
        assert!(!installer.begin());
        installer.step();
        assert_eq!(installer.progress(), 0.5);
        installer.step();
        installer.step();
        assert_eq!(installer.state(), InstallState::Installed);
        assert_eq!(installer.progress(), 1.0);
        assert_eq!(std::fs::read(dest.join("readme.txt")).unwrap(), b"hello");
        assert_eq!(std::fs::read(dest.join("music/a.ogg")).unwrap(), b"12345");
        assert!(dest.join(".testpack_extracted").is_file());
    }

    #[test]
    fn existing_marker_reports_already_installed() {
        let dir = TestDir::new("already");
        dir.write("stk/.testpack_extracted", b"");
        let settings = parse_settings("name=testpack");
        let installer = Installer::new(pack(), Some(dir.path().join("stk")), &settings);
        assert_eq!(installer.state(), InstallState::AlreadyInstalled);
        assert_eq!(installer.progress(), 1.0);
    }

    #[test]
    fn missing_destination_blocks_installation() {
        let mut installer = Installer::new(pack(), None, &InstallSettings::default());
        assert_eq!(installer.state(), InstallState::DestinationNotFound);
        assert!(!installer.begin());
    }

    #[test]
    fn write_failure_abandons_the_run() {
        let dir = TestDir::new("failure");
        // Destination never created on disk, and the payload contains a
        // nested path whose parent cannot be made under a file.
        let dest = dir.path().join("blocker");
        dir.write("blocker", b"a plain file");
        let mut installer = Installer::new(pack(), Some(dest), &InstallSettings::default());
        installer.begin();
        installer.step();
        installer.step();
        assert_eq!(installer.state(), InstallState::Failed);
        assert_eq!(installer.progress(), 0.0);
    }
}
