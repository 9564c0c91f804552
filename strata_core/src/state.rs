// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracked pipeline state with scoped, selective save/restore.
//!
//! [`RenderState`] is the single, explicitly owned representation of what
//! the pipeline is currently set to. It is constructed exactly once after
//! context creation and passed by reference wherever drawing code needs it;
//! there is no global instance.
//!
//! [`StateScope`] brackets a drawing block. On entry it declares, via a
//! [`FieldMask`], which fields it is willing to save; each first mutation of
//! a tracked field inside the scope pushes that field's pre-scope value onto
//! its recorder; on drop, every field the scope actually changed is restored,
//! and the device is called only for values that genuinely differ. A scope
//! that nets out to no change issues zero device calls.
//!
//! Scopes nest by reborrowing: the guard derefs to [`RenderState`], so an
//! inner scope is opened directly on the outer guard and the borrow checker
//! enforces the LIFO discipline at compile time. Early returns and panics
//! unwind through the guards in the right order.

use alloc::vec;
use alloc::vec::Vec;

use crate::caps::Capabilities;
use crate::device::Device;
use crate::field::{FIELDS, Field, FieldMask, TextureId, Value};
use crate::record::{DeltaRecorder, ValueRecorder};

/// Bookkeeping for one open scope.
#[derive(Debug)]
struct ScopeRecord {
    /// Fields this scope is willing to save.
    mask: FieldMask,
    /// Scalar fields already saved in this scope (at most one baseline per
    /// field per scope, no matter how many mutations).
    touched: FieldMask,
    /// Texture units already saved in this scope, in first-touch order.
    touched_units: Vec<u32>,
}

/// The tracked pipeline state, the device it drives, and the scope stack.
///
/// Except for the brief window between a mutation request and the device
/// call that realizes it, the stored values always equal what the pipeline
/// is actually configured to.
#[derive(Debug)]
pub struct RenderState<D: Device> {
    device: D,
    caps: Capabilities,
    values: [Value; Field::COUNT],
    units: Vec<TextureId>,
    recorders: [ValueRecorder<Value>; Field::COUNT],
    unit_recorder: DeltaRecorder<TextureId>,
    scopes: Vec<ScopeRecord>,
}

impl<D: Device> RenderState<D> {
    /// Creates the state tracker for a freshly created context.
    ///
    /// Queries [`Device::capabilities`] exactly once and seeds every field
    /// with the pipeline's start-up value; no other device calls are issued.
    pub fn new(mut device: D) -> Self {
        let caps = device.capabilities();
        let units = vec![TextureId::NONE; caps.max_texture_units as usize];
        Self {
            device,
            caps,
            values: core::array::from_fn(|i| Value::initial(Field::ALL[i])),
            units,
            recorders: core::array::from_fn(|_| ValueRecorder::new()),
            unit_recorder: DeltaRecorder::new(),
            scopes: Vec::new(),
        }
    }

    /// Returns the capabilities queried at construction.
    #[must_use]
    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    /// Returns the device.
    #[must_use]
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Returns the device mutably.
    ///
    /// Out-of-band device work (uploads, draws) goes through here; tracked
    /// fields must still be changed via [`set`](Self::set) so the bookkeeping
    /// stays truthful.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Returns the number of currently open scopes.
    #[must_use]
    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    /// Returns the current value of a scalar field.
    #[must_use]
    pub fn get(&self, field: Field) -> Value {
        self.values[field.index()]
    }

    /// Returns the current binding of a texture unit.
    ///
    /// # Panics
    ///
    /// Panics if `unit` is at or beyond
    /// [`max_texture_units`](Capabilities::max_texture_units).
    #[must_use]
    pub fn texture_binding(&self, unit: u32) -> TextureId {
        assert!(
            (unit as usize) < self.units.len(),
            "texture unit {unit} out of range ({} available)",
            self.units.len()
        );
        self.units[unit as usize]
    }

    /// Changes one scalar field.
    ///
    /// If the innermost open scope tracks the field and has not yet saved
    /// it, the current value is pushed as that scope's baseline first. The
    /// device is called only if the value actually changes, so repeated sets
    /// of the same value cost one call at most.
    ///
    /// Mutating a field the innermost scope does not track is allowed: no
    /// baseline is recorded and the change survives that scope's exit.
    /// Mutating with no scope open is how start-up configuration is done.
    pub fn set(&mut self, value: Value) {
        let field = value.field();
        let idx = field.index();
        if let Some(scope) = self.scopes.last_mut() {
            if scope.mask.contains(field.mask()) && !scope.touched.contains(field.mask()) {
                scope.touched |= field.mask();
                self.recorders[idx].save(self.values[idx]);
            }
        }
        if self.values[idx] != value {
            self.values[idx] = value;
            self.device.apply(value);
        }
    }

    /// Changes one texture unit's binding.
    ///
    /// Tracked under [`FieldMask::TEXTURE_UNITS`] with the delta strategy:
    /// only the units a scope actually touches are saved and restored.
    ///
    /// # Panics
    ///
    /// Panics if `unit` is at or beyond
    /// [`max_texture_units`](Capabilities::max_texture_units).
    pub fn bind_texture(&mut self, unit: u32, texture: TextureId) {
        let i = unit as usize;
        assert!(
            i < self.units.len(),
            "texture unit {unit} out of range ({} available)",
            self.units.len()
        );
        if let Some(scope) = self.scopes.last_mut() {
            if scope.mask.contains(FieldMask::TEXTURE_UNITS) && !scope.touched_units.contains(&unit)
            {
                scope.touched_units.push(unit);
                self.unit_recorder.save(unit, self.units[i]);
            }
        }
        if self.units[i] != texture {
            self.units[i] = texture;
            self.device.bind_texture(unit, texture);
        }
    }

    /// Opens a scope tracking exactly the fields in `mask`.
    ///
    /// Constant time; touches neither the stored values nor the device.
    /// Dropping the returned guard restores every field the scope changed.
    pub fn scope(&mut self, mask: FieldMask) -> StateScope<'_, D> {
        self.scopes.push(ScopeRecord {
            mask,
            touched: FieldMask::empty(),
            touched_units: Vec::new(),
        });
        StateScope { state: self }
    }

    /// Restores everything the innermost scope changed, then closes it.
    fn pop_scope(&mut self) {
        let record = match self.scopes.pop() {
            Some(record) => record,
            None => panic!("scope stack underflow"),
        };
        for descriptor in &FIELDS {
            if !record.touched.contains(descriptor.mask) {
                continue;
            }
            let idx = descriptor.field.index();
            let baseline = self.recorders[idx].restore();
            if self.values[idx] != baseline {
                self.values[idx] = baseline;
                self.device.apply(baseline);
            }
        }
        for &unit in record.touched_units.iter().rev() {
            let baseline = self.unit_recorder.restore(unit);
            let i = unit as usize;
            if self.units[i] != baseline {
                self.units[i] = baseline;
                self.device.bind_texture(unit, baseline);
            }
        }
    }
}

/// RAII guard for one open scope.
///
/// Derefs to [`RenderState`], so mutations and nested scopes go directly
/// through the guard. Dropping it restores the fields this scope changed,
/// in registration order for scalars and reverse touch order for texture
/// units.
pub struct StateScope<'a, D: Device> {
    state: &'a mut RenderState<D>,
}

impl<D: Device> core::ops::Deref for StateScope<'_, D> {
    type Target = RenderState<D>;

    fn deref(&self) -> &RenderState<D> {
        self.state
    }
}

impl<D: Device> core::ops::DerefMut for StateScope<'_, D> {
    fn deref_mut(&mut self) -> &mut RenderState<D> {
        self.state
    }
}

impl<D: Device> Drop for StateScope<'_, D> {
    fn drop(&mut self) {
        self.state.pop_scope();
    }
}

impl<D: Device> core::fmt::Debug for StateScope<'_, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StateScope")
            .field("depth", &self.state.scope_depth())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::*;
    use crate::caps::Vendor;
    use crate::field::{CompareFunc, MatrixMode};

    /// Records every device call so tests can count real writes.
    #[derive(Debug, Default)]
    struct TestDevice {
        applies: Vec<Value>,
        binds: Vec<(u32, TextureId)>,
    }

    impl Device for TestDevice {
        fn capabilities(&mut self) -> Capabilities {
            Capabilities {
                vendor: Vendor::Unknown,
                version: String::from("2.1 test"),
                extensions: String::from("GL_ARB_multitexture"),
                max_texture_coords: 8,
                max_texture_units: 64,
            }
        }

        fn apply(&mut self, value: Value) {
            self.applies.push(value);
        }

        fn bind_texture(&mut self, unit: u32, texture: TextureId) {
            self.binds.push((unit, texture));
        }
    }

    fn new_state() -> RenderState<TestDevice> {
        RenderState::new(TestDevice::default())
    }

    fn applies_for(state: &RenderState<TestDevice>, field: Field) -> usize {
        state
            .device()
            .applies
            .iter()
            .filter(|v| v.field() == field)
            .count()
    }

    #[test]
    fn construction_issues_no_device_calls() {
        let state = new_state();
        assert!(state.device().applies.is_empty());
        assert!(state.device().binds.is_empty());
        assert_eq!(state.get(Field::LineWidth), Value::LineWidth(1.0));
        assert_eq!(state.capabilities().max_texture_units, 64);
    }

    #[test]
    fn double_set_same_value_issues_one_write() {
        let mut state = new_state();
        {
            let mut scope = state.scope(FieldMask::all());
            scope.set(Value::LineWidth(2.0));
            scope.set(Value::LineWidth(2.0));
            assert_eq!(applies_for(&scope, Field::LineWidth), 1);
        }
        // The restore transition back to 1.0 is the only other write.
        assert_eq!(applies_for(&state, Field::LineWidth), 2);
        assert_eq!(state.get(Field::LineWidth), Value::LineWidth(1.0));
    }

    #[test]
    fn set_to_current_value_is_free() {
        let mut state = new_state();
        {
            let mut scope = state.scope(FieldMask::all());
            scope.set(Value::LineWidth(1.0));
        }
        assert_eq!(applies_for(&state, Field::LineWidth), 0);
    }

    #[test]
    fn set_and_reset_nets_zero_restore_calls() {
        let mut state = new_state();
        {
            let mut scope = state.scope(FieldMask::all());
            scope.set(Value::DepthMask(false));
            scope.set(Value::DepthMask(true));
            assert_eq!(applies_for(&scope, Field::DepthMask), 2);
        }
        // Baseline equals the current value at exit: no third write.
        assert_eq!(applies_for(&state, Field::DepthMask), 2);
        assert_eq!(state.get(Field::DepthMask), Value::DepthMask(true));
    }

    #[test]
    fn scope_exit_restores_prior_value() {
        let mut state = new_state();
        state.set(Value::DepthFunc(CompareFunc::LessEqual));
        {
            let mut scope = state.scope(FieldMask::DEPTH_FUNC);
            scope.set(Value::DepthFunc(CompareFunc::Always));
            assert_eq!(
                scope.get(Field::DepthFunc),
                Value::DepthFunc(CompareFunc::Always)
            );
        }
        assert_eq!(
            state.get(Field::DepthFunc),
            Value::DepthFunc(CompareFunc::LessEqual)
        );
    }

    #[test]
    fn nested_scopes_restore_in_stages() {
        let mut state = new_state();
        state.set(Value::MatrixMode(MatrixMode::ModelView));
        {
            let mut outer = state.scope(FieldMask::MATRIX_MODE);
            outer.set(Value::MatrixMode(MatrixMode::Projection));
            {
                let mut inner = outer.scope(FieldMask::MATRIX_MODE);
                inner.set(Value::MatrixMode(MatrixMode::Texture));
                assert_eq!(inner.scope_depth(), 2);
            }
            // Inner exit restores the outer scope's value.
            assert_eq!(
                outer.get(Field::MatrixMode),
                Value::MatrixMode(MatrixMode::Projection)
            );
        }
        assert_eq!(
            state.get(Field::MatrixMode),
            Value::MatrixMode(MatrixMode::ModelView)
        );
        assert_eq!(state.scope_depth(), 0);
    }

    #[test]
    fn untracked_field_change_survives_inner_scope() {
        let mut state = new_state();
        {
            let mut outer = state.scope(FieldMask::all());
            outer.set(Value::LineWidth(2.0));
            {
                let mut inner = outer.scope(FieldMask::DEPTH_MASK);
                // Inner scope does not track line width; the change leaks
                // out of it by design.
                inner.set(Value::LineWidth(3.0));
            }
            assert_eq!(outer.get(Field::LineWidth), Value::LineWidth(3.0));
        }
        // The outer scope saved the pre-scope baseline on first touch.
        assert_eq!(state.get(Field::LineWidth), Value::LineWidth(1.0));
    }

    #[test]
    fn delta_strategy_restores_only_touched_units() {
        let mut state = new_state();
        state.bind_texture(0, TextureId(10));
        state.bind_texture(5, TextureId(11));
        let binds_before = state.device().binds.len();
        {
            let mut scope = state.scope(FieldMask::TEXTURE_UNITS);
            scope.bind_texture(0, TextureId(20));
            scope.bind_texture(5, TextureId(21));
            scope.bind_texture(5, TextureId(22));
        }
        // Two binds inside got first-touch baselines; unit 5 changed twice
        // but is restored once. 64 units exist; exactly 2 restores happen.
        assert_eq!(state.device().binds.len() - binds_before, 3 + 2);
        assert_eq!(state.texture_binding(0), TextureId(10));
        assert_eq!(state.texture_binding(5), TextureId(11));
        assert_eq!(state.texture_binding(1), TextureId::NONE);
    }

    #[test]
    fn rebinding_same_texture_is_free() {
        let mut state = new_state();
        state.bind_texture(3, TextureId(7));
        let binds_before = state.device().binds.len();
        {
            let mut scope = state.scope(FieldMask::TEXTURE_UNITS);
            scope.bind_texture(3, TextureId(7));
        }
        assert_eq!(state.device().binds.len(), binds_before);
    }

    #[test]
    fn nested_scopes_overlapping_units() {
        let mut state = new_state();
        state.bind_texture(2, TextureId(1));
        {
            let mut outer = state.scope(FieldMask::TEXTURE_UNITS);
            outer.bind_texture(2, TextureId(2));
            {
                let mut inner = outer.scope(FieldMask::TEXTURE_UNITS);
                inner.bind_texture(2, TextureId(3));
            }
            assert_eq!(outer.texture_binding(2), TextureId(2));
        }
        assert_eq!(state.texture_binding(2), TextureId(1));
    }

    #[test]
    fn empty_scope_is_silent() {
        let mut state = new_state();
        {
            let _scope = state.scope(FieldMask::all());
        }
        assert!(state.device().applies.is_empty());
        assert!(state.device().binds.is_empty());
    }

    #[test]
    fn guard_restores_on_early_return() {
        fn failing_draw(state: &mut RenderState<TestDevice>) -> Result<(), &'static str> {
            let mut scope = state.scope(FieldMask::DEPTH_MASK);
            scope.set(Value::DepthMask(false));
            Err("draw failed")
        }

        let mut state = new_state();
        assert!(failing_draw(&mut state).is_err());
        assert_eq!(state.get(Field::DepthMask), Value::DepthMask(true));
        assert_eq!(state.scope_depth(), 0);
    }

    #[test]
    fn startup_configuration_outside_scopes() {
        let mut state = new_state();
        state.set(Value::ShadeModel(crate::field::ShadeModel::Flat));
        assert_eq!(applies_for(&state, Field::ShadeModel), 1);
        // No scope open: no baseline, the change is permanent.
        assert_eq!(
            state.get(Field::ShadeModel),
            Value::ShadeModel(crate::field::ShadeModel::Flat)
        );
    }

    #[test]
    #[should_panic(expected = "texture unit 64 out of range")]
    fn out_of_range_unit_panics() {
        let mut state = new_state();
        state.bind_texture(64, TextureId(1));
    }

    #[test]
    #[should_panic(expected = "texture unit 99 out of range")]
    fn out_of_range_unit_query_panics() {
        let state = new_state();
        let _ = state.texture_binding(99);
    }
}
