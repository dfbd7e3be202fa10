//! The single installer screen.
//!
//! Everything is laid out against a scale derived from the window
//! height, so the screen keeps its proportions across resolutions and
//! fullscreen toggles. Painting produces a [`FramePaint`] rather than
//! touching the GPU; the surface crate turns it into a frame.

use addonpack_platform::{Color, Event, FramePaint, KeyId, MouseAction, MouseButton};
use tracing::debug;

use crate::install::{InstallState, Installer};

const BACKGROUND: Color = [0.12, 0.12, 0.14, 1.0];
const PANEL: Color = [0.0, 0.0, 0.0, 0.6];
const PROGRESS_TRACK: Color = [0.25, 0.25, 0.28, 1.0];
const PROGRESS_FILL: Color = [0.15, 0.65, 0.85, 1.0];
const BUTTON_ACTIVE: Color = [0.2, 0.45, 0.75, 1.0];
const BUTTON_INACTIVE: Color = [0.3, 0.3, 0.32, 1.0];

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

#[derive(Debug)]
struct Button {
    label: &'static str,
    rect: Rect,
    active: bool,
}

/// Device operations the scene wants performed, collected during event
/// handling and drained by the main loop once per frame.
#[derive(Debug, Default)]
pub struct SceneRequests {
    pub close: bool,
    pub toggle_fullscreen: bool,
    pub toggle_cursor: bool,
}

pub struct Scene {
    installer: Installer,
    install_button: Button,
    close_button: Button,
    progress_rect: Rect,
    panel_rect: Rect,
    status: &'static str,
    detail: &'static str,
    shown_state: InstallState,
    requests: SceneRequests,
}

impl Scene {
    pub fn new(installer: Installer, width: f32, height: f32) -> Self {
        let mut scene = Self {
            installer,
            install_button: Button {
                label: "Install",
                rect: Rect::default(),
                active: true,
            },
            close_button: Button {
                label: "Close",
                rect: Rect::default(),
                active: true,
            },
            progress_rect: Rect::default(),
            panel_rect: Rect::default(),
            status: "",
            detail: "",
            shown_state: InstallState::NotInstalled,
            requests: SceneRequests::default(),
        };
        scene.apply_state(scene.installer.state());
        scene.layout(width, height);
        scene
    }

    /// Recomputes every rectangle for the given window size. Cheap, so
    /// the main loop calls it each frame instead of tracking resizes.
    pub fn layout(&mut self, width: f32, height: f32) {
        let scale = height / 600.0;
        let btn_width = 128.0 * scale;
        let btn_height = 36.0 * scale;
        let center = (width - btn_width) / 2.0;
        let btn_y = height * 0.93 - 70.0 * scale;
        self.install_button.rect = Rect {
            x: center - 100.0 * scale,
            y: btn_y,
            width: btn_width,
            height: btn_height,
        };
        self.close_button.rect = Rect {
            x: center + 100.0 * scale,
            y: btn_y,
            width: btn_width,
            height: btn_height,
        };
        self.progress_rect = Rect {
            x: 0.0,
            y: height * 0.925,
            width,
            height: height * 0.05,
        };
        self.panel_rect = Rect {
            x: 0.0,
            y: height * 0.1,
            width,
            height: height * 0.35,
        };
    }

    fn apply_state(&mut self, state: InstallState) {
        self.shown_state = state;
        match state {
            InstallState::DestinationNotFound => {
                self.status = "Game data directory was not found.";
                self.detail = "Start the game at least once, then run this installer again.";
                self.install_button.active = false;
                self.close_button.active = true;
            }
            InstallState::NotInstalled => {
                self.status = "Ready to install.";
                self.detail = "Press Install to extract the pack into the game.";
                self.install_button.label = "Install";
                self.install_button.active = true;
                self.close_button.active = true;
            }
            InstallState::AlreadyInstalled => {
                self.status = "This pack is already installed.";
                self.detail = "Press Reinstall to extract it again.";
                self.install_button.label = "Reinstall";
                self.install_button.active = true;
                self.close_button.active = true;
            }
            InstallState::Installing => {
                self.status = "Installing...";
                self.detail = "Please wait.";
                self.install_button.active = false;
                self.close_button.active = false;
            }
            InstallState::Installed => {
                self.status = "Installation finished.";
                self.detail = "You can close this window and start the game.";
                self.install_button.label = "Reinstall";
                self.install_button.active = true;
                self.close_button.active = true;
            }
            InstallState::Failed => {
                self.status = "Installation failed.";
                self.detail = "Check free space and permissions, then try again.";
                self.install_button.label = "Install";
                self.install_button.active = true;
                self.close_button.active = true;
            }
        }
        debug!(?state, status = self.status, "scene state");
    }

    pub fn status_line(&self) -> &str {
        self.status
    }

    pub fn detail_line(&self) -> &str {
        self.detail
    }

    /// Advances extraction while it is running and refreshes the texts
    /// whenever the installer changed state.
    pub fn update(&mut self, _dt: f32) {
        if self.installer.state() == InstallState::Installing {
            self.installer.step();
        }
        let state = self.installer.state();
        if state != self.shown_state {
            self.apply_state(state);
        }
    }

    /// Handles one device event. Returns whether the event was consumed.
    pub fn on_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Mouse(mouse) => {
                if mouse.action == MouseAction::Pressed(MouseButton::Left) {
                    self.on_click(mouse.x as f32, mouse.y as f32);
                }
                true
            }
            Event::Key(key) if key.pressed => match key.id {
                KeyId::Escape | KeyId::Q => {
                    if self.installer.state() != InstallState::Installing {
                        self.requests.close = true;
                    }
                    true
                }
                // Unclaimed keys fall through to window controls.
                KeyId::H if !key.control => {
                    self.requests.toggle_cursor = true;
                    false
                }
                KeyId::F if !key.control => {
                    self.requests.toggle_fullscreen = true;
                    false
                }
                _ => false,
            },
            _ => false,
        }
    }

    fn on_click(&mut self, x: f32, y: f32) {
        if self.install_button.active && self.install_button.rect.contains(x, y) {
            if self.installer.begin() {
                self.apply_state(self.installer.state());
            }
        } else if self.close_button.active && self.close_button.rect.contains(x, y) {
            self.requests.close = true;
        }
    }

    /// Takes the pending device requests, leaving none behind.
    pub fn take_requests(&mut self) -> SceneRequests {
        std::mem::take(&mut self.requests)
    }

    pub fn paint(&self) -> FramePaint {
        let mut paint = FramePaint::new(BACKGROUND);
        push_rect(&mut paint, self.panel_rect, PANEL);
        push_rect(&mut paint, self.progress_rect, PROGRESS_TRACK);
        let mut fill = self.progress_rect;
        fill.width *= self.installer.progress();
        push_rect(&mut paint, fill, PROGRESS_FILL);
        for button in [&self.install_button, &self.close_button] {
            let color = if button.active {
                BUTTON_ACTIVE
            } else {
                BUTTON_INACTIVE
            };
            push_rect(&mut paint, button.rect, color);
        }
        paint
    }
}

fn push_rect(paint: &mut FramePaint, rect: Rect, color: Color) {
    paint.rect(rect.x, rect.y, rect.width, rect.height, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use addonpack_platform::{ButtonStates, KeyEvent, MouseEvent};

    use crate::assets::MemoryAssets;
    use crate::install::InstallSettings;
    use crate::test_dir::TestDir;

    fn scene_with_destination(dir: &TestDir) -> Scene {
        dir.write("stk/.extracted", b"");
        let assets = Box::new(MemoryAssets::new(vec![(
            "extract/a.txt".into(),
            b"x".to_vec(),
        )]));
        let installer = Installer::new(
            assets,
            Some(dir.path().join("stk")),
            &InstallSettings::default(),
        );
        Scene::new(installer, 800.0, 600.0)
    }

    fn left_press(x: i32, y: i32) -> Event {
        Event::Mouse(MouseEvent {
            action: MouseAction::Pressed(MouseButton::Left),
            x,
            y,
            wheel: 0.0,
            shift: false,
            control: false,
            buttons: ButtonStates {
                left: true,
                middle: false,
                right: false,
            },
        })
    }

    fn key(id: KeyId) -> Event {
        Event::Key(KeyEvent {
            id,
            text: None,
            pressed: true,
            shift: false,
            control: false,
        })
    }

    #[test]
    fn buttons_keep_their_proportions_when_resized() {
        let dir = TestDir::new("scene_layout");
        let mut scene = scene_with_destination(&dir);
        let small = scene.install_button.rect;
        scene.layout(1600.0, 1200.0);
        let big = scene.install_button.rect;
        assert!((big.width - small.width * 2.0).abs() < 0.01);
        assert!((big.height - small.height * 2.0).abs() < 0.01);
    }

    #[test]
    fn clicking_install_starts_extraction_and_finishes() {
        let dir = TestDir::new("scene_install");
        let mut scene = scene_with_destination(&dir);
        let rect = scene.install_button.rect;
        let handled = scene.on_event(&left_press(
            (rect.x + rect.width / 2.0) as i32,
            (rect.y + rect.height / 2.0) as i32,
        ));
        assert!(handled);
        assert_eq!(scene.shown_state, InstallState::Installing);
        assert_eq!(scene.status_line(), "Installing...");

        scene.update(0.016);
        scene.update(0.016);
        assert_eq!(scene.shown_state, InstallState::Installed);
    }

    #[test]
    fn close_is_refused_while_installing() {
        let dir = TestDir::new("scene_close");
        let mut scene = scene_with_destination(&dir);
        let rect = scene.install_button.rect;
        scene.on_event(&left_press(
            (rect.x + 1.0) as i32,
            (rect.y + 1.0) as i32,
        ));
        assert!(scene.on_event(&key(KeyId::Escape)));
        assert!(!scene.take_requests().close);

        // Finish the run, then Escape closes.
        scene.update(0.016);
        scene.update(0.016);
        assert!(scene.on_event(&key(KeyId::Escape)));
        assert!(scene.take_requests().close);
    }

    #[test]
    fn unclaimed_window_keys_become_requests() {
        let dir = TestDir::new("scene_keys");
        let mut scene = scene_with_destination(&dir);
        assert!(!scene.on_event(&key(KeyId::F)));
        assert!(!scene.on_event(&key(KeyId::H)));
        let requests = scene.take_requests();
        assert!(requests.toggle_fullscreen);
        assert!(requests.toggle_cursor);
        assert!(!scene.take_requests().toggle_fullscreen);
    }

    #[test]
    fn finished_install_can_be_redone() {
        let dir = TestDir::new("scene_reinstall");
        let mut scene = scene_with_destination(&dir);
        let rect = scene.install_button.rect;
        let center = left_press(
            (rect.x + rect.width / 2.0) as i32,
            (rect.y + rect.height / 2.0) as i32,
        );
        scene.on_event(&center);
        scene.update(0.016);
        scene.update(0.016);
        assert_eq!(scene.shown_state, InstallState::Installed);
        assert!(scene.install_button.active);
        assert_eq!(scene.install_button.label, "Reinstall");

        scene.on_event(&center);
        assert_eq!(scene.shown_state, InstallState::Installing);
    }

    #[test]
    fn missing_destination_disables_install() {
        let assets = Box::new(MemoryAssets::new(vec![]));
        let installer = Installer::new(assets, None, &InstallSettings::default());
        let mut scene = Scene::new(installer, 800.0, 600.0);
        assert!(!scene.install_button.active);
        let rect = scene.install_button.rect;
        scene.on_event(&left_press((rect.x + 1.0) as i32, (rect.y + 1.0) as i32));
        assert_eq!(scene.shown_state, InstallState::DestinationNotFound);
    }
}
