// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The vocabulary of tracked pipeline fields.
//!
//! A *field* is one independently trackable piece of pipeline configuration
//! (line width, depth function, one texture unit's binding, ...). Scalar
//! fields are enumerated by [`Field`] and carry their payloads in the
//! [`Value`] tagged union; each `Value` variant names its owning field, so a
//! value can never be routed to the wrong slot. The indexed texture-unit
//! collection is tracked separately under [`FieldMask::TEXTURE_UNITS`] with
//! the sparse delta strategy.
//!
//! Registration is data-driven: [`FIELDS`] lists one [`FieldDescriptor`] per
//! scalar field, and the save/restore machinery in
//! [`state`](crate::state) walks that table rather than generating per-field
//! code.

use bitflags::bitflags;

use crate::record::Strategy;

bitflags! {
    /// Selects which fields a scope is willing to save.
    ///
    /// [`FieldMask::all()`] is the convenience "track everything" value.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct FieldMask: u16 {
        /// The active matrix stack selector.
        const MATRIX_MODE = 1 << 0;
        /// Flat or smooth shading.
        const SHADE_MODEL = 1 << 1;
        /// Rasterized line width.
        const LINE_WIDTH = 1 << 2;
        /// Line stipple repeat factor.
        const STIPPLE_FACTOR = 1 << 3;
        /// Line stipple bit pattern.
        const STIPPLE_PATTERN = 1 << 4;
        /// Depth buffer write mask.
        const DEPTH_MASK = 1 << 5;
        /// Depth comparison function.
        const DEPTH_FUNC = 1 << 6;
        /// Texture compression quality hint.
        const TEXTURE_COMPRESSION_HINT = 1 << 7;
        /// Perspective correction quality hint.
        const PERSPECTIVE_CORRECTION_HINT = 1 << 8;
        /// Blend source/destination factors (RGB and alpha).
        const BLEND_FUNC = 1 << 9;
        /// Blend equation.
        const BLEND_EQUATION = 1 << 10;
        /// Alpha test function and reference value.
        const ALPHA_TEST = 1 << 11;
        /// The indexed texture-unit binding collection (delta-tracked).
        const TEXTURE_UNITS = 1 << 12;
    }
}

/// One independently tracked scalar pipeline field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// The active matrix stack selector.
    MatrixMode,
    /// Flat or smooth shading.
    ShadeModel,
    /// Rasterized line width.
    LineWidth,
    /// Line stipple repeat factor.
    StippleFactor,
    /// Line stipple bit pattern.
    StipplePattern,
    /// Depth buffer write mask.
    DepthMask,
    /// Depth comparison function.
    DepthFunc,
    /// Texture compression quality hint.
    TextureCompressionHint,
    /// Perspective correction quality hint.
    PerspectiveCorrectionHint,
    /// Blend source/destination factors (RGB and alpha).
    BlendFunc,
    /// Blend equation.
    BlendEquation,
    /// Alpha test function and reference value.
    AlphaTest,
}

impl Field {
    /// Number of scalar fields.
    pub const COUNT: usize = 12;

    /// Every scalar field, in slot order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::MatrixMode,
        Self::ShadeModel,
        Self::LineWidth,
        Self::StippleFactor,
        Self::StipplePattern,
        Self::DepthMask,
        Self::DepthFunc,
        Self::TextureCompressionHint,
        Self::PerspectiveCorrectionHint,
        Self::BlendFunc,
        Self::BlendEquation,
        Self::AlphaTest,
    ];

    /// Returns this field's slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns this field's bit in a [`FieldMask`].
    #[inline]
    #[must_use]
    pub const fn mask(self) -> FieldMask {
        FieldMask::from_bits_truncate(1 << (self as u16))
    }
}

/// Static registration record for one scalar field.
#[derive(Clone, Copy, Debug)]
pub struct FieldDescriptor {
    /// The field being described.
    pub field: Field,
    /// The field's bit in a scope mask.
    pub mask: FieldMask,
    /// The change-recording strategy applied to this field.
    pub strategy: Strategy,
}

/// The field registration table, in slot order.
///
/// All scalar fields use the stack strategy; the texture-unit collection is
/// the sole delta-tracked entry and lives outside this table (it is indexed,
/// not a single slot).
pub const FIELDS: [FieldDescriptor; Field::COUNT] = {
    let mut table = [FieldDescriptor {
        field: Field::MatrixMode,
        mask: FieldMask::MATRIX_MODE,
        strategy: Strategy::Stack,
    }; Field::COUNT];
    let mut i = 0;
    while i < Field::COUNT {
        table[i] = FieldDescriptor {
            field: Field::ALL[i],
            mask: Field::ALL[i].mask(),
            strategy: Strategy::Stack,
        };
        i += 1;
    }
    table
};

/// The active matrix stack selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatrixMode {
    /// Model-view matrix stack.
    ModelView,
    /// Projection matrix stack.
    Projection,
    /// Texture matrix stack.
    Texture,
}

/// Flat or smooth polygon shading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShadeModel {
    /// One color per primitive.
    Flat,
    /// Interpolated vertex colors.
    Smooth,
}

/// Comparison function shared by the depth and alpha tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareFunc {
    /// Never passes.
    Never,
    /// Passes on strictly less.
    Less,
    /// Passes on equality.
    Equal,
    /// Passes on less or equal.
    LessEqual,
    /// Passes on strictly greater.
    Greater,
    /// Passes on inequality.
    NotEqual,
    /// Passes on greater or equal.
    GreaterEqual,
    /// Always passes.
    Always,
}

/// One source or destination blend factor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    /// Factor 0.
    Zero,
    /// Factor 1.
    One,
    /// Source color.
    SrcColor,
    /// One minus source color.
    OneMinusSrcColor,
    /// Destination color.
    DstColor,
    /// One minus destination color.
    OneMinusDstColor,
    /// Source alpha.
    SrcAlpha,
    /// One minus source alpha.
    OneMinusSrcAlpha,
    /// Destination alpha.
    DstAlpha,
    /// One minus destination alpha.
    OneMinusDstAlpha,
    /// Saturated source alpha.
    SrcAlphaSaturate,
}

/// How source and destination contributions are combined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlendEquation {
    /// Source + destination.
    Add,
    /// Source − destination.
    Subtract,
    /// Destination − source.
    ReverseSubtract,
    /// Component-wise minimum.
    Min,
    /// Component-wise maximum.
    Max,
}

/// Quality/speed preference for driver hints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HintMode {
    /// No preference.
    DontCare,
    /// Prefer speed.
    Fastest,
    /// Prefer quality.
    Nicest,
}

/// Separate RGB and alpha blend factors, set as one field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlendFunc {
    /// Source factor for the RGB channels.
    pub src_rgb: BlendFactor,
    /// Destination factor for the RGB channels.
    pub dst_rgb: BlendFactor,
    /// Source factor for the alpha channel.
    pub src_alpha: BlendFactor,
    /// Destination factor for the alpha channel.
    pub dst_alpha: BlendFactor,
}

impl BlendFunc {
    /// Creates a blend function applying the same factors to RGB and alpha.
    #[must_use]
    pub const fn new(src: BlendFactor, dst: BlendFactor) -> Self {
        Self {
            src_rgb: src,
            dst_rgb: dst,
            src_alpha: src,
            dst_alpha: dst,
        }
    }
}

/// Alpha test function plus reference value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlphaTest {
    /// The comparison applied to incoming alpha.
    pub func: CompareFunc,
    /// The reference value compared against, in [0, 1].
    pub reference: f32,
}

/// A texture object name as reported by the driver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

impl TextureId {
    /// The unbound texture.
    pub const NONE: Self = Self(0);
}

/// The current value of one scalar field.
///
/// Exactly one variant exists per [`Field`]; [`Value::field`] recovers the
/// owning field, which is how [`set`](crate::state::RenderState::set) routes
/// a value without a separate field argument.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    /// [`Field::MatrixMode`].
    MatrixMode(MatrixMode),
    /// [`Field::ShadeModel`].
    ShadeModel(ShadeModel),
    /// [`Field::LineWidth`].
    LineWidth(f32),
    /// [`Field::StippleFactor`].
    StippleFactor(i32),
    /// [`Field::StipplePattern`].
    StipplePattern(u16),
    /// [`Field::DepthMask`].
    DepthMask(bool),
    /// [`Field::DepthFunc`].
    DepthFunc(CompareFunc),
    /// [`Field::TextureCompressionHint`].
    TextureCompressionHint(HintMode),
    /// [`Field::PerspectiveCorrectionHint`].
    PerspectiveCorrectionHint(HintMode),
    /// [`Field::BlendFunc`].
    BlendFunc(BlendFunc),
    /// [`Field::BlendEquation`].
    BlendEquation(BlendEquation),
    /// [`Field::AlphaTest`].
    AlphaTest(AlphaTest),
}

impl Value {
    /// Returns the field this value belongs to.
    #[must_use]
    pub const fn field(self) -> Field {
        match self {
            Self::MatrixMode(_) => Field::MatrixMode,
            Self::ShadeModel(_) => Field::ShadeModel,
            Self::LineWidth(_) => Field::LineWidth,
            Self::StippleFactor(_) => Field::StippleFactor,
            Self::StipplePattern(_) => Field::StipplePattern,
            Self::DepthMask(_) => Field::DepthMask,
            Self::DepthFunc(_) => Field::DepthFunc,
            Self::TextureCompressionHint(_) => Field::TextureCompressionHint,
            Self::PerspectiveCorrectionHint(_) => Field::PerspectiveCorrectionHint,
            Self::BlendFunc(_) => Field::BlendFunc,
            Self::BlendEquation(_) => Field::BlendEquation,
            Self::AlphaTest(_) => Field::AlphaTest,
        }
    }

    /// Returns the pipeline's start-up value for `field`.
    ///
    /// These match the defaults a freshly created context reports, so a
    /// newly constructed [`RenderState`](crate::state::RenderState) agrees
    /// with the hardware without issuing any calls.
    #[must_use]
    pub const fn initial(field: Field) -> Self {
        match field {
            Field::MatrixMode => Self::MatrixMode(MatrixMode::ModelView),
            Field::ShadeModel => Self::ShadeModel(ShadeModel::Smooth),
            Field::LineWidth => Self::LineWidth(1.0),
            Field::StippleFactor => Self::StippleFactor(1),
            Field::StipplePattern => Self::StipplePattern(0xFFFF),
            Field::DepthMask => Self::DepthMask(true),
            Field::DepthFunc => Self::DepthFunc(CompareFunc::Less),
            Field::TextureCompressionHint => Self::TextureCompressionHint(HintMode::DontCare),
            Field::PerspectiveCorrectionHint => {
                Self::PerspectiveCorrectionHint(HintMode::DontCare)
            }
            Field::BlendFunc => Self::BlendFunc(BlendFunc::new(BlendFactor::One, BlendFactor::Zero)),
            Field::BlendEquation => Self::BlendEquation(BlendEquation::Add),
            Field::AlphaTest => Self::AlphaTest(AlphaTest {
                func: CompareFunc::Always,
                reference: 0.0,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_value_names_its_field() {
        for field in Field::ALL {
            assert_eq!(Value::initial(field).field(), field);
        }
    }

    #[test]
    fn field_masks_are_distinct_bits() {
        let mut seen = FieldMask::empty();
        for field in Field::ALL {
            assert!(
                !seen.intersects(field.mask()),
                "duplicate mask bit for {field:?}"
            );
            seen |= field.mask();
        }
        // Everything except the texture-unit collection.
        assert_eq!(seen | FieldMask::TEXTURE_UNITS, FieldMask::all());
    }

    #[test]
    fn slot_indices_match_table_order() {
        for (i, descriptor) in FIELDS.iter().enumerate() {
            assert_eq!(descriptor.field.index(), i);
            assert_eq!(descriptor.field.mask(), descriptor.mask);
        }
    }
}
