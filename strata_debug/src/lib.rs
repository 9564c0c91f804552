// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording and trace export for strata diagnostics.
//!
//! This crate provides [`Device`](strata_core::device::Device)
//! implementations for development and post-mortem analysis:
//!
//! - [`recorder::RecordingDevice`] — records every device call in order, for
//!   counting real writes in tests and inspecting a frame's traffic.
//! - [`chrome::export`] — writes a recorded call log as Chrome Trace Event
//!   Format JSON for loading into `chrome://tracing` or Perfetto.

pub mod chrome;
pub mod recorder;
