//! Persisted image layout
//!
//! | Offset | Field              | Type |
//! |--------|--------------------|------|
//! | 0      | leak.seconds       | i32  |
//! | 4      | rpm.seconds        | i32  |
//! | 8      | rpm.duty           | i16  |
//! | 10     | rpm.rpm            | i32  |
//! | 14     | fullflow.seconds   | i32  |
//! | 18     | pwm.pulses         | i32  |
//! | 22     | pwm.pulse_width_us | i64  |

use injector_hal::storage::ERASED_BYTE;

use crate::params::{FullFlowParams, LeakTestParams, ParameterStore, PwmParams, RpmParams};

/// Size of the encoded image in bytes
pub const IMAGE_LEN: usize = 30;

/// Raw field values as stored, before any range checking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PersistedImage {
    pub leak_seconds: i32,
    pub rpm_seconds: i32,
    pub rpm_duty: i16,
    pub rpm_rpm: i32,
    pub full_flow_seconds: i32,
    pub pwm_pulses: i32,
    pub pwm_pulse_width_us: i64,
}

/// Sequential little-endian writer over a fixed buffer
struct Writer<'a> {
    buf: &'a mut [u8; IMAGE_LEN],
    pos: usize,
}

impl Writer<'_> {
    fn put<const N: usize>(&mut self, bytes: [u8; N]) {
        self.buf[self.pos..self.pos + N].copy_from_slice(&bytes);
        self.pos += N;
    }
}

/// Sequential little-endian reader over a fixed buffer
struct Reader<'a> {
    buf: &'a [u8; IMAGE_LEN],
    pos: usize,
}

impl Reader<'_> {
    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        out
    }
}

impl PersistedImage {
    /// Snapshot of a parameter store
    pub fn from_store(store: &ParameterStore) -> Self {
        Self {
            leak_seconds: store.leak_test().seconds(),
            rpm_seconds: store.rpm().seconds(),
            rpm_duty: store.rpm().duty(),
            rpm_rpm: store.rpm().rpm(),
            full_flow_seconds: store.full_flow().seconds(),
            pwm_pulses: store.pwm().pulses(),
            pwm_pulse_width_us: store.pwm().pulse_width_us(),
        }
    }

    /// Build a store from the raw values
    ///
    /// Fields are copied verbatim; call [`ParameterStore::sanitize`] to bring
    /// them back into range.
    pub fn into_store_unchecked(self) -> ParameterStore {
        ParameterStore {
            leak: LeakTestParams {
                seconds: self.leak_seconds,
            },
            rpm: RpmParams {
                seconds: self.rpm_seconds,
                rpm: self.rpm_rpm,
                duty: self.rpm_duty,
            },
            full_flow: FullFlowParams {
                seconds: self.full_flow_seconds,
            },
            pwm: PwmParams {
                pulses: self.pwm_pulses,
                pulse_width_us: self.pwm_pulse_width_us,
            },
        }
    }

    /// Encode in storage order
    pub fn to_bytes(&self) -> [u8; IMAGE_LEN] {
        let mut buf = [0u8; IMAGE_LEN];
        let mut w = Writer {
            buf: &mut buf,
            pos: 0,
        };
        w.put(self.leak_seconds.to_le_bytes());
        w.put(self.rpm_seconds.to_le_bytes());
        w.put(self.rpm_duty.to_le_bytes());
        w.put(self.rpm_rpm.to_le_bytes());
        w.put(self.full_flow_seconds.to_le_bytes());
        w.put(self.pwm_pulses.to_le_bytes());
        w.put(self.pwm_pulse_width_us.to_le_bytes());
        buf
    }

    /// Decode from storage order
    pub fn from_bytes(buf: &[u8; IMAGE_LEN]) -> Self {
        let mut r = Reader { buf, pos: 0 };
        Self {
            leak_seconds: i32::from_le_bytes(r.take()),
            rpm_seconds: i32::from_le_bytes(r.take()),
            rpm_duty: i16::from_le_bytes(r.take()),
            rpm_rpm: i32::from_le_bytes(r.take()),
            full_flow_seconds: i32::from_le_bytes(r.take()),
            pwm_pulses: i32::from_le_bytes(r.take()),
            pwm_pulse_width_us: i64::from_le_bytes(r.take()),
        }
    }

    /// Check whether raw bytes are an erased, never-written region
    pub fn is_blank(buf: &[u8; IMAGE_LEN]) -> bool {
        buf.iter().all(|&b| b == ERASED_BYTE)
    }
}
