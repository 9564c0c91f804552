// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scoped render-state snapshots and classified affine transforms.
//!
//! `strata_core` provides the two hot-path pieces a retained scene traversal
//! needs on every frame: selective save/restore of pipeline state, and a
//! transform type whose composition methods skip full 4×4 arithmetic when
//! the accumulated transform is known to be simple. It is `no_std`
//! compatible (with `alloc`).
//!
//! # Architecture
//!
//! The traversal brackets each drawing block with a scope and a transform:
//!
//! ```text
//!   Device::capabilities() ──► RenderState::new()        (once, at startup)
//!
//!   per node:
//!   RenderState::scope(mask) ──► StateScope
//!        │  set() / bind_texture()  ──► Device::apply()  (only on change)
//!        ▼
//!   drop(StateScope) ──► restore touched fields          (only on change)
//!
//!   Transform3d::translate/scale/rotate ──► to_cols_array() ──► matrix upload
//! ```
//!
//! **[`field`]** — The enumerated tracked fields, their scope-mask bits, the
//! [`Value`](field::Value) tagged union, and the data-driven registration
//! table.
//!
//! **[`record`]** — Change-recording strategies: whole-value stacks for
//! scalar fields, sparse per-index stacks for the texture-unit collection.
//!
//! **[`state`]** — [`RenderState`](state::RenderState) (the explicitly owned
//! tracker, no global instance) and [`StateScope`](state::StateScope) (the
//! RAII guard whose nesting the borrow checker enforces).
//!
//! **[`device`]** — The [`Device`](device::Device) trait that realizes value
//! transitions on a concrete graphics context; called only on actual
//! changes.
//!
//! **[`caps`]** — Vendor classification and capability integers, queried
//! once at construction.
//!
//! **[`transform`]** — [`Transform3d`](transform::Transform3d), a 4×4
//! transform tagged with the elementary operations it is composed of;
//! translate/scale chains cost a handful of scalar operations instead of a
//! full multiply.
//!
//! # Concurrency
//!
//! Everything here is single-threaded by contract: pipeline state is
//! context-affine, and the thread that owns the context owns the
//! [`RenderState`](state::RenderState). There is no locking and nothing
//! blocks.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod caps;
pub mod device;
pub mod field;
pub mod record;
pub mod state;
pub mod transform;
