//! Accelerometer and gyroscope plumbing over the raw sensor NDK API.
//!
//! The queue starts with nothing enabled; each sensor is switched on and
//! off independently with its own sample interval, and only enabled
//! sensors contribute samples to [`Sensors::poll`].

use addonpack_platform::MotionVector;
use tracing::{debug, warn};

const SENSOR_TYPE_ACCELEROMETER: i32 = ndk_sys::ASENSOR_TYPE_ACCELEROMETER as i32;
const SENSOR_TYPE_GYROSCOPE: i32 = ndk_sys::ASENSOR_TYPE_GYROSCOPE as i32;

const LOOPER_IDENT: i32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SensorKind {
    Accelerometer,
    Gyroscope,
}

struct SensorSlot {
    sensor: *const ndk_sys::ASensor,
    active: bool,
}

impl SensorSlot {
    fn lookup(manager: *mut ndk_sys::ASensorManager, kind: i32) -> Self {
        let sensor = unsafe { ndk_sys::ASensorManager_getDefaultSensor(manager, kind) };
        Self {
            sensor,
            active: false,
        }
    }
}

/// Owns one sensor event queue on the calling thread's looper.
pub(crate) struct Sensors {
    queue: *mut ndk_sys::ASensorEventQueue,
    accelerometer: SensorSlot,
    gyroscope: SensorSlot,
}

impl Sensors {
    /// Creates the queue and looks up the hardware, enabling nothing yet.
    /// Returns `None` when neither sensor exists or the queue cannot be
    /// created.
    pub fn new() -> Option<Self> {
        unsafe {
            let manager = ndk_sys::ASensorManager_getInstance();
            if manager.is_null() {
                return None;
            }

            let looper = ndk_sys::ALooper_prepare(
                ndk_sys::ALOOPER_PREPARE_ALLOW_NON_CALLBACKS as i32,
            );
            if looper.is_null() {
                warn!("no looper for the sensor queue");
                return None;
            }

            let accelerometer = SensorSlot::lookup(manager, SENSOR_TYPE_ACCELEROMETER);
            let gyroscope = SensorSlot::lookup(manager, SENSOR_TYPE_GYROSCOPE);
            if accelerometer.sensor.is_null() && gyroscope.sensor.is_null() {
                debug!("no motion sensors available");
                return None;
            }

            let queue = ndk_sys::ASensorManager_createEventQueue(
                manager,
                looper,
                LOOPER_IDENT,
                None,
                std::ptr::null_mut(),
            );
            if queue.is_null() {
                warn!("sensor event queue creation failed");
                return None;
            }

            Some(Self {
                queue,
                accelerometer,
                gyroscope,
            })
        }
    }

    fn slot(&mut self, kind: SensorKind) -> &mut SensorSlot {
        match kind {
            SensorKind::Accelerometer => &mut self.accelerometer,
            SensorKind::Gyroscope => &mut self.gyroscope,
        }
    }

    /// Enables one sensor at the requested sample interval. Returns whether
    /// the sensor is now delivering samples.
    pub fn activate(&mut self, kind: SensorKind, interval_us: u32) -> bool {
        let queue = self.queue;
        let slot = self.slot(kind);
        if slot.sensor.is_null() {
            debug!(?kind, "sensor not present");
            return false;
        }
        unsafe {
            if ndk_sys::ASensorEventQueue_enableSensor(queue, slot.sensor) != 0 {
                warn!(?kind, "sensor refused to enable");
                return false;
            }
            ndk_sys::ASensorEventQueue_setEventRate(
                queue,
                slot.sensor,
                interval_us.min(i32::MAX as u32) as i32,
            );
        }
        slot.active = true;
        true
    }

    /// Stops one sensor's sample delivery. Already-inactive sensors are
    /// left alone.
    pub fn deactivate(&mut self, kind: SensorKind) {
        let queue = self.queue;
        let slot = self.slot(kind);
        if !slot.active {
            return;
        }
        unsafe {
            ndk_sys::ASensorEventQueue_disableSensor(queue, slot.sensor);
        }
        slot.active = false;
    }

    /// Drains every queued sample, one callback per sample in queue order.
    pub fn poll(&mut self, mut sink: impl FnMut(SensorKind, MotionVector)) {
        const BATCH: usize = 8;
        let mut events: [ndk_sys::ASensorEvent; BATCH] = unsafe { std::mem::zeroed() };
        loop {
            let read = unsafe {
                ndk_sys::ASensorEventQueue_getEvents(
                    self.queue,
                    events.as_mut_ptr(),
                    BATCH,
                )
            };
            if read <= 0 {
                break;
            }
            for event in &events[..read as usize] {
                let kind = match event.type_ {
                    SENSOR_TYPE_ACCELEROMETER => SensorKind::Accelerometer,
                    SENSOR_TYPE_GYROSCOPE => SensorKind::Gyroscope,
                    _ => continue,
                };
                let v = unsafe { event.__bindgen_anon_1.vector.__bindgen_anon_1.v };
                sink(
                    kind,
                    MotionVector {
                        x: v[0] as f64,
                        y: v[1] as f64,
                        z: v[2] as f64,
                    },
                );
            }
        }
    }
}

impl Drop for Sensors {
    fn drop(&mut self) {
        self.deactivate(SensorKind::Accelerometer);
        self.deactivate(SensorKind::Gyroscope);
        unsafe {
            let manager = ndk_sys::ASensorManager_getInstance();
            if !manager.is_null() {
                ndk_sys::ASensorManager_destroyEventQueue(manager, self.queue);
            }
        }
    }
}
