// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] writes a recorded device-call log as [Chrome Trace Event
//! Format][spec] JSON, suitable for loading into `chrome://tracing` or
//! [Perfetto](https://ui.perfetto.dev/). The core carries no clock, so the
//! call index stands in for the timestamp axis; what the view shows is the
//! *order and volume* of real writes, which is what write-avoidance tuning
//! needs.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value as Json, json};

use crate::recorder::DeviceCall;

/// Exports recorded device calls as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of instant events, one per call, in
/// issue order.
pub fn export(calls: &[DeviceCall], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Json> = Vec::with_capacity(calls.len());

    for (index, call) in calls.iter().enumerate() {
        match call {
            DeviceCall::Apply(value) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", value.field()),
                    "cat": "Apply",
                    "ts": index,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "value": format!("{value:?}"),
                    }
                }));
            }
            DeviceCall::BindTexture { unit, texture } => {
                events.push(json!({
                    "ph": "i",
                    "name": "BindTexture",
                    "cat": "Bind",
                    "ts": index,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "unit": unit,
                        "texture": texture.0,
                    }
                }));
            }
        }
    }

    serde_json::to_writer(&mut *writer, &events)?;
    writer.flush()
}
