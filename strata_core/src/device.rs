// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The boundary between tracked state and the real pipeline.
//!
//! `strata_core` owns the bookkeeping — which values the pipeline is set to,
//! which scopes saved what — but never talks to a graphics API itself. A
//! [`Device`] implementation translates each value transition into the
//! corresponding call on whatever context the application owns.
//!
//! The core guarantees *write-avoidance*: [`apply`](Device::apply) and
//! [`bind_texture`](Device::bind_texture) are invoked only when the logical
//! value actually differs from the last value applied, so an implementation
//! may forward every call unconditionally without redundant driver traffic.
//!
//! # Frame loop pseudocode
//!
//! A typical traversal brackets each node with a scope and a transform:
//!
//! ```rust,ignore
//! fn draw_node(state: &mut RenderState<GlDevice>, node: &Node) {
//!     let mut scope = state.scope(FieldMask::LINE_WIDTH | FieldMask::TEXTURE_UNITS);
//!     scope.set(Value::LineWidth(node.outline_width));
//!     scope.bind_texture(0, node.texture);
//!
//!     // ... emit primitives ...
//!
//!     // Dropping `scope` restores only what changed, with no device call
//!     // when the net change is zero.
//! }
//! ```
//!
//! Threading: a device is owned by exactly one [`RenderState`], which is
//! owned by the thread that owns the graphics context. Nothing here is
//! `Sync`, by contract rather than by marker.

use crate::caps::Capabilities;
use crate::field::{TextureId, Value};

/// Realizes tracked state transitions on a concrete graphics context.
///
/// Both real contexts and test doubles implement this trait; see
/// `strata_debug`'s recording device for the latter.
pub trait Device {
    /// Reports the driver's capabilities.
    ///
    /// Called exactly once, during [`RenderState::new`], after a valid
    /// context exists.
    ///
    /// [`RenderState::new`]: crate::state::RenderState::new
    fn capabilities(&mut self) -> Capabilities;

    /// Realizes one scalar field transition.
    fn apply(&mut self, value: Value);

    /// Realizes one texture-unit binding transition.
    fn bind_texture(&mut self, unit: u32, texture: TextureId);
}
