// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`Device`] that records its calls instead of driving a context.
//!
//! [`RecordingDevice`] stands in for the GPU in tests and captures every
//! value transition the core actually forwarded. Because the core only
//! calls the device on genuine changes, the recorded log *is* the set of
//! real writes: counting entries verifies write-avoidance directly.

use strata_core::caps::{Capabilities, Vendor};
use strata_core::device::Device;
use strata_core::field::{Field, TextureId, Value};

/// One recorded device call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DeviceCall {
    /// A scalar field transition.
    Apply(Value),
    /// A texture-unit binding transition.
    BindTexture {
        /// The unit that was rebound.
        unit: u32,
        /// The texture it was bound to.
        texture: TextureId,
    },
}

/// Records every device call in order.
#[derive(Clone, Debug)]
pub struct RecordingDevice {
    caps: Capabilities,
    calls: Vec<DeviceCall>,
}

impl RecordingDevice {
    /// Creates a recorder reporting generic capabilities (no vendor, 32
    /// texture units).
    #[must_use]
    pub fn new() -> Self {
        Self::with_capabilities(Capabilities {
            vendor: Vendor::Unknown,
            version: String::from("0.0 recording"),
            extensions: String::new(),
            max_texture_coords: 8,
            max_texture_units: 32,
        })
    }

    /// Creates a recorder reporting the given capabilities, for tests that
    /// exercise capability-sensitive paths.
    #[must_use]
    pub fn with_capabilities(caps: Capabilities) -> Self {
        Self {
            caps,
            calls: Vec::new(),
        }
    }

    /// Returns the recorded calls in issue order.
    #[must_use]
    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    /// Returns the total number of recorded calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    /// Returns how many transitions were applied to a scalar field.
    #[must_use]
    pub fn applies_for(&self, field: Field) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DeviceCall::Apply(v) if v.field() == field))
            .count()
    }

    /// Returns how many binding transitions a texture unit saw.
    #[must_use]
    pub fn binds_for(&self, unit: u32) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DeviceCall::BindTexture { unit: u, .. } if *u == unit))
            .count()
    }

    /// Forgets all recorded calls (the capabilities stay).
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Default for RecordingDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for RecordingDevice {
    fn capabilities(&mut self) -> Capabilities {
        self.caps.clone()
    }

    fn apply(&mut self, value: Value) {
        self.calls.push(DeviceCall::Apply(value));
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureId) {
        self.calls.push(DeviceCall::BindTexture { unit, texture });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::field::FieldMask;
    use strata_core::state::RenderState;

    #[test]
    fn records_only_real_writes() {
        let mut state = RenderState::new(RecordingDevice::new());
        {
            let mut scope = state.scope(FieldMask::all());
            scope.set(Value::LineWidth(2.0));
            scope.set(Value::LineWidth(2.0));
            scope.bind_texture(1, TextureId(9));
        }
        let device = state.device();
        assert_eq!(device.applies_for(Field::LineWidth), 2);
        assert_eq!(device.binds_for(1), 2);
        assert_eq!(device.call_count(), 4);
    }

    #[test]
    fn custom_capabilities_flow_through() {
        let caps = Capabilities {
            vendor: Vendor::Nvidia,
            version: String::from("3.0"),
            extensions: String::from("GL_ARB_multitexture"),
            max_texture_coords: 8,
            max_texture_units: 4,
        };
        let state = RenderState::new(RecordingDevice::with_capabilities(caps));
        assert_eq!(state.capabilities().vendor, Vendor::Nvidia);
        assert_eq!(state.capabilities().max_texture_units, 4);
        assert!(state.capabilities().has_extension("GL_ARB_multitexture"));
    }

    #[test]
    fn clear_keeps_capabilities() {
        let mut device = RecordingDevice::new();
        device.apply(Value::DepthMask(false));
        device.clear();
        assert_eq!(device.call_count(), 0);
        assert_eq!(device.capabilities().max_texture_units, 32);
    }
}
