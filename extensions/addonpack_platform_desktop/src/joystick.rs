//! Joystick input through the kernel's legacy js interface.
//!
//! Each slot is probed at a handful of well-known device paths and the
//! first node that opens wins. Files are opened non-blocking; every pump
//! cycle drains the pending raw reports, merges them into a per-device
//! snapshot and emits at most one snapshot event per device.

use std::fs::{File, OpenOptions};
use std::io::Read;
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;

use addonpack_platform::{JoystickDescriptor, JoystickSnapshot, JOYSTICK_CHANNELS};
use tracing::{debug, trace};

const MAX_SLOTS: u32 = 8;

const JSIOCGAXES: libc::c_ulong = 0x8001_6a11;
const JSIOCGBUTTONS: libc::c_ulong = 0x8001_6a12;
const JSIOCGNAME_128: libc::c_ulong = 0x8080_6a13;

const JS_EVENT_BUTTON: u8 = 0x01;
const JS_EVENT_AXIS: u8 = 0x02;
/// Synthetic init reports carry this flag on top of the kind.
const JS_EVENT_INIT: u8 = 0x80;

/// One raw 8-byte report from the kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RawReport {
    pub time_ms: u32,
    pub value: i16,
    pub kind: u8,
    pub number: u8,
}

pub(crate) fn parse_report(buf: &[u8; 8]) -> RawReport {
    RawReport {
        time_ms: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
        value: i16::from_le_bytes([buf[4], buf[5]]),
        kind: buf[6],
        number: buf[7],
    }
}

/// Merges one report into a snapshot. Returns `false` for reports that
/// address a channel past what the snapshot carries.
pub(crate) fn apply_report(snapshot: &mut JoystickSnapshot, report: &RawReport) -> bool {
    let channel = report.number as usize;
    if channel >= JOYSTICK_CHANNELS {
        return false;
    }
    match report.kind & !JS_EVENT_INIT {
        JS_EVENT_BUTTON => snapshot.buttons[channel] = report.value != 0,
        JS_EVENT_AXIS => snapshot.axes[channel] = report.value as i32,
        _ => return false,
    }
    true
}

/// Decodes the name buffer the JSIOCGNAME ioctl filled in. The kernel
/// NUL-terminates names shorter than the buffer; a name that fills the
/// whole buffer has no terminator.
pub(crate) fn name_from_ioctl(buf: &[u8]) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

struct JoystickDevice {
    file: File,
    snapshot: JoystickSnapshot,
    axes: u8,
    buttons: u8,
    name: String,
}

impl JoystickDevice {
    fn open(slot: u32) -> Option<Self> {
        let candidates = [
            format!("/dev/js{slot}"),
            format!("/dev/input/js{slot}"),
            format!("/dev/joy{slot}"),
        ];
        let file = candidates.iter().find_map(|path| {
            OpenOptions::new()
                .read(true)
                .custom_flags(libc::O_NONBLOCK)
                .open(path)
                .ok()
        })?;

        let fd = file.as_raw_fd();
        let mut axes: u8 = 0;
        let mut buttons: u8 = 0;
        let mut name_buf = [0u8; 128];
        unsafe {
            libc::ioctl(fd, JSIOCGAXES, &mut axes);
            libc::ioctl(fd, JSIOCGBUTTONS, &mut buttons);
            libc::ioctl(fd, JSIOCGNAME_128, name_buf.as_mut_ptr());
        }
        let name = name_from_ioctl(&name_buf);

        Some(Self {
            file,
            snapshot: JoystickSnapshot::new(slot),
            axes,
            buttons,
            name,
        })
    }

    /// Drains and merges pending reports. Returns whether anything was read.
    fn drain(&mut self) -> bool {
        let mut read_any = false;
        let mut buf = [0u8; 8];
        loop {
            match self.file.read(&mut buf) {
                Ok(8) => {
                    read_any = true;
                    apply_report(&mut self.snapshot, &parse_report(&buf));
                }
                Ok(_) => break,
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    trace!(id = self.snapshot.id, error = %e, "joystick read failed");
                    break;
                }
            }
        }
        read_any
    }
}

pub(crate) struct JoystickManager {
    devices: Vec<JoystickDevice>,
}

impl JoystickManager {
    /// Probes every slot once. Missing devices are not an error.
    pub fn activate() -> Self {
        let devices: Vec<_> = (0..MAX_SLOTS).filter_map(JoystickDevice::open).collect();
        for device in &devices {
            debug!(
                id = device.snapshot.id,
                name = %device.name,
                axes = device.axes,
                buttons = device.buttons,
                "joystick connected"
            );
        }
        Self { devices }
    }

    pub fn descriptors(&self) -> Vec<JoystickDescriptor> {
        self.devices
            .iter()
            .map(|d| JoystickDescriptor {
                id: d.snapshot.id,
                axes: d.axes,
                buttons: d.buttons,
                name: d.name.clone(),
            })
            .collect()
    }

    /// Polls every device; yields one snapshot per device and reports
    /// whether any raw input arrived this cycle.
    pub fn poll(&mut self, mut sink: impl FnMut(JoystickSnapshot)) -> bool {
        let mut activity = false;
        for device in &mut self.devices {
            activity |= device.drain();
            sink(device.snapshot);
        }
        activity
    }
}
