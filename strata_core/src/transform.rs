// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Classified column-major 4×4 transform.
//!
//! [`Transform3d`] pairs the numeric matrix with a [`TransformClass`] tag
//! recording which elementary operations (translation, scaling, rotation) the
//! transform is known, by construction, to be composed of. The composition
//! methods ([`translate`](Transform3d::translate),
//! [`scale`](Transform3d::scale), [`rotate`](Transform3d::rotate)) consult the
//! tag to skip the full 4×4 multiply in the common cases: a scene graph built
//! from thousands of translate/scale nodes per frame pays O(1)–O(3) scalar
//! operations per node instead of 64 multiply-adds.
//!
//! # Classification soundness
//!
//! The tag never claims structure the numbers lack:
//!
//! - `TRANSLATION` alone implies the upper-left 3×3 block is exactly identity.
//! - `SCALING` (alone or with `TRANSLATION`) implies the upper-left 3×3 block
//!   is diagonal.
//! - The all-bits value [`TransformClass::IDENTITY`] is reserved for the
//!   numeric identity matrix, which is vacuously a pure translation, scaling,
//!   and rotation at once.
//!
//! Any operation that cannot maintain a claim downgrades the tag toward
//! [`TransformClass::empty()`] (no structural knowledge).

use core::ops::{AddAssign, DivAssign, Mul, MulAssign, SubAssign};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use bitflags::bitflags;

bitflags! {
    /// Which elementary operations a [`Transform3d`] is composed of.
    ///
    /// The empty set means *unknown*: no structural claim is made and full
    /// 4×4 arithmetic is required. The all-bits value is reserved for the
    /// numeric identity.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TransformClass: u8 {
        /// Composed only of translations (and the identity).
        const TRANSLATION = 1 << 0;
        /// Composed only of axis-aligned scales (and the identity).
        const SCALING = 1 << 1;
        /// Composed only of rotations (and the identity).
        const ROTATION = 1 << 2;
        /// The numeric identity matrix.
        const IDENTITY = Self::TRANSLATION.bits() | Self::SCALING.bits() | Self::ROTATION.bits();
    }
}

/// A unit-intent quaternion for [`Transform3d::rotate_quat`].
///
/// The rotation methods normalize before use, so callers may pass
/// unnormalized values; a zero-magnitude quaternion is rejected as a no-op.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Quaternion {
    /// Vector part, x.
    pub x: f64,
    /// Vector part, y.
    pub y: f64,
    /// Vector part, z.
    pub z: f64,
    /// Scalar part.
    pub w: f64,
}

impl Quaternion {
    /// Creates a quaternion from its four components.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Returns the squared magnitude.
    #[inline]
    #[must_use]
    pub fn magnitude_squared(self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }
}

/// A column-major 4×4 affine transform with a structural classification tag.
///
/// Each inner array is one *column* of the matrix, matching the memory layout
/// expected by GPU matrix-upload calls. Composition methods compose on the
/// right (`M ← M · E`), i.e. each call applies in the local coordinate frame
/// established by the calls before it, like a GL matrix stack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    cols: [[f64; 4]; 4],
    class: TransformClass,
}

impl Transform3d {
    /// The 4×4 identity, classified as such.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
        class: TransformClass::IDENTITY,
    };

    /// Creates a transform from a column-major 2-D array.
    ///
    /// The result carries no structural claim (unknown classification), since
    /// arbitrary contents cannot be trusted to match any tag.
    #[inline]
    #[must_use]
    pub const fn from_cols_array_2d(cols: [[f64; 4]; 4]) -> Self {
        Self {
            cols,
            class: TransformClass::empty(),
        }
    }

    /// Returns the columns as a 2-D array.
    #[inline]
    #[must_use]
    pub const fn to_cols_array_2d(self) -> [[f64; 4]; 4] {
        self.cols
    }

    /// Returns the 16 scalars as a flat column-major array, ready for a
    /// matrix-upload call.
    #[inline]
    #[must_use]
    pub const fn to_cols_array(self) -> [f64; 16] {
        let c = &self.cols;
        [
            c[0][0], c[0][1], c[0][2], c[0][3], c[1][0], c[1][1], c[1][2], c[1][3], c[2][0],
            c[2][1], c[2][2], c[2][3], c[3][0], c[3][1], c[3][2], c[3][3],
        ]
    }

    /// Returns column `i` (0-based).
    ///
    /// # Panics
    ///
    /// Panics if `i >= 4`.
    #[inline]
    #[must_use]
    pub const fn col(self, i: usize) -> [f64; 4] {
        self.cols[i]
    }

    /// Returns the classification tag.
    #[inline]
    #[must_use]
    pub const fn class(self) -> TransformClass {
        self.class
    }

    /// Returns whether this transform is the identity *by construction*.
    ///
    /// This is a tag check, not a numeric comparison: a transform that
    /// happens to equal the identity numerically (e.g. after
    /// `translate(0.0, 0.0, 0.0)`) reports `false`.
    #[inline]
    #[must_use]
    pub fn is_identity(self) -> bool {
        self.class == TransformClass::IDENTITY
    }

    /// Composes a translation on the right: `M ← M · T(dx, dy, dz)`.
    ///
    /// Pure-translation and pure-scale accumulations update the translation
    /// column directly; only rotation-bearing or unknown transforms pay the
    /// general column combination.
    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) -> &mut Self {
        let class = self.class;
        if class == TransformClass::IDENTITY {
            self.cols[3] = [dx, dy, dz, 1.0];
            self.class = TransformClass::TRANSLATION;
        } else if class == TransformClass::TRANSLATION {
            self.cols[3][0] += dx;
            self.cols[3][1] += dy;
            self.cols[3][2] += dz;
        } else if class == TransformClass::SCALING {
            self.cols[3] = [
                self.cols[0][0] * dx,
                self.cols[1][1] * dy,
                self.cols[2][2] * dz,
                1.0,
            ];
            self.class = TransformClass::SCALING | TransformClass::TRANSLATION;
        } else if class == TransformClass::SCALING | TransformClass::TRANSLATION {
            self.cols[3][0] += self.cols[0][0] * dx;
            self.cols[3][1] += self.cols[1][1] * dy;
            self.cols[3][2] += self.cols[2][2] * dz;
        } else {
            // General case: t' = dx·c0 + dy·c1 + dz·c2 + t.
            for i in 0..4 {
                self.cols[3][i] +=
                    dx * self.cols[0][i] + dy * self.cols[1][i] + dz * self.cols[2][i];
            }
            self.class = if class == TransformClass::ROTATION {
                TransformClass::ROTATION | TransformClass::TRANSLATION
            } else {
                TransformClass::empty()
            };
        }
        self
    }

    /// Composes a scale on the right: `M ← M · S(sx, sy, sz)`.
    ///
    /// A zero factor is legal; it produces a transform with zero determinant,
    /// which is the caller's concern if inversion is later required.
    pub fn scale(&mut self, sx: f64, sy: f64, sz: f64) -> &mut Self {
        let class = self.class;
        if class == TransformClass::IDENTITY {
            self.cols[0][0] = sx;
            self.cols[1][1] = sy;
            self.cols[2][2] = sz;
            self.class = TransformClass::SCALING;
        } else if class == TransformClass::TRANSLATION {
            self.cols[0][0] = sx;
            self.cols[1][1] = sy;
            self.cols[2][2] = sz;
            self.class = TransformClass::SCALING | TransformClass::TRANSLATION;
        } else if class == TransformClass::SCALING
            || class == TransformClass::SCALING | TransformClass::TRANSLATION
        {
            self.cols[0][0] *= sx;
            self.cols[1][1] *= sy;
            self.cols[2][2] *= sz;
        } else {
            // General case: scale the three basis columns.
            for i in 0..4 {
                self.cols[0][i] *= sx;
                self.cols[1][i] *= sy;
                self.cols[2][i] *= sz;
            }
            self.class = TransformClass::empty();
        }
        self
    }

    /// Composes an axis-angle rotation on the right: `M ← M · R`.
    ///
    /// The angle is in degrees and the axis is normalized before use. A
    /// zero-length axis leaves both the matrix and the classification
    /// unchanged; this is a numeric-stability guard, not an error.
    pub fn rotate(&mut self, angle_degrees: f64, x: f64, y: f64, z: f64) -> &mut Self {
        let len_sq = x * x + y * y + z * z;
        if len_sq == 0.0 {
            return self;
        }
        let inv_len = 1.0 / len_sq.sqrt();
        let radians = angle_degrees.to_radians();
        #[cfg(feature = "std")]
        let (s, c) = radians.sin_cos();
        #[cfg(not(feature = "std"))]
        let (s, c) = (radians.sin(), radians.cos());
        let rot = axis_angle_cols(x * inv_len, y * inv_len, z * inv_len, s, c);
        self.compose_rotation(rot);
        self
    }

    /// Composes a quaternion rotation on the right: `M ← M · R(q)`.
    ///
    /// The quaternion is normalized before use; a zero-magnitude quaternion
    /// leaves both the matrix and the classification unchanged.
    pub fn rotate_quat(&mut self, q: Quaternion) -> &mut Self {
        let mag_sq = q.magnitude_squared();
        if mag_sq == 0.0 {
            return self;
        }
        let inv = 1.0 / mag_sq.sqrt();
        let (x, y, z, w) = (q.x * inv, q.y * inv, q.z * inv, q.w * inv);
        let rot = [
            [
                1.0 - 2.0 * (y * y + z * z),
                2.0 * (x * y + w * z),
                2.0 * (x * z - w * y),
                0.0,
            ],
            [
                2.0 * (x * y - w * z),
                1.0 - 2.0 * (x * x + z * z),
                2.0 * (y * z + w * x),
                0.0,
            ],
            [
                2.0 * (x * z + w * y),
                2.0 * (y * z - w * x),
                1.0 - 2.0 * (x * x + y * y),
                0.0,
            ],
            [0.0, 0.0, 0.0, 1.0],
        ];
        self.compose_rotation(rot);
        self
    }

    /// Multiplies a rotation matrix in and updates the classification.
    fn compose_rotation(&mut self, rot: [[f64; 4]; 4]) {
        if self.class == TransformClass::IDENTITY {
            self.cols = rot;
            self.class = TransformClass::ROTATION;
            return;
        }
        self.cols = mul_cols(&self.cols, &rot);
        if self.class.is_empty() {
            return;
        }
        let merged = self.class | TransformClass::ROTATION;
        // All three bits are reserved for the numeric identity.
        self.class = if merged == TransformClass::IDENTITY {
            TransformClass::empty()
        } else {
            merged
        };
    }

    /// Computes the determinant by cofactor expansion along the first row.
    ///
    /// Always a fixed-size 4×4 computation; the classification is not
    /// consulted since the cost is small and constant.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        let m = |i: usize, j: usize| self.cols[j][i];

        let minor = |c0: usize, c1: usize, c2: usize| {
            m(1, c0) * (m(2, c1) * m(3, c2) - m(2, c2) * m(3, c1))
                - m(1, c1) * (m(2, c0) * m(3, c2) - m(2, c2) * m(3, c0))
                + m(1, c2) * (m(2, c0) * m(3, c1) - m(2, c1) * m(3, c0))
        };

        m(0, 0) * minor(1, 2, 3) - m(0, 1) * minor(0, 2, 3) + m(0, 2) * minor(0, 1, 3)
            - m(0, 3) * minor(0, 1, 2)
    }

    /// Is every component [finite](f64::is_finite)?
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.cols.iter().flatten().all(|v| v.is_finite())
    }

    /// Is any component [NaN](f64::is_nan)?
    #[inline]
    #[must_use]
    pub fn is_nan(&self) -> bool {
        self.cols.iter().flatten().any(|v| v.is_nan())
    }
}

impl Default for Transform3d {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Full column-major 4×4 multiply: `out = a · b`.
fn mul_cols(a: &[[f64; 4]; 4], b: &[[f64; 4]; 4]) -> [[f64; 4]; 4] {
    let mut out = [[0.0_f64; 4]; 4];
    for j in 0..4 {
        for i in 0..4 {
            out[j][i] =
                a[0][i] * b[j][0] + a[1][i] * b[j][1] + a[2][i] * b[j][2] + a[3][i] * b[j][3];
        }
    }
    out
}

/// Builds axis-angle rotation columns from a unit axis and sin/cos.
fn axis_angle_cols(x: f64, y: f64, z: f64, s: f64, c: f64) -> [[f64; 4]; 4] {
    let t = 1.0 - c;
    [
        [t * x * x + c, t * x * y + s * z, t * x * z - s * y, 0.0],
        [t * x * y - s * z, t * y * y + c, t * y * z + s * x, 0.0],
        [t * x * z + s * y, t * y * z - s * x, t * z * z + c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

impl Mul for Transform3d {
    type Output = Self;

    /// Full multiply with an identity fast path on either operand.
    ///
    /// The product of two arbitrary transforms carries no structural claim,
    /// so the result is classified unknown unless one operand was the
    /// identity (in which case the other passes through unchanged, tag and
    /// all).
    fn mul(self, rhs: Self) -> Self {
        if self.is_identity() {
            return rhs;
        }
        if rhs.is_identity() {
            return self;
        }
        Self {
            cols: mul_cols(&self.cols, &rhs.cols),
            class: TransformClass::empty(),
        }
    }
}

impl MulAssign for Transform3d {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl AddAssign for Transform3d {
    fn add_assign(&mut self, rhs: Self) {
        for j in 0..4 {
            for i in 0..4 {
                self.cols[j][i] += rhs.cols[j][i];
            }
        }
        self.class = TransformClass::empty();
    }
}

impl SubAssign for Transform3d {
    fn sub_assign(&mut self, rhs: Self) {
        for j in 0..4 {
            for i in 0..4 {
                self.cols[j][i] -= rhs.cols[j][i];
            }
        }
        self.class = TransformClass::empty();
    }
}

impl MulAssign<f64> for Transform3d {
    fn mul_assign(&mut self, rhs: f64) {
        for col in &mut self.cols {
            for v in col {
                *v *= rhs;
            }
        }
        self.class = TransformClass::empty();
    }
}

impl DivAssign<f64> for Transform3d {
    fn div_assign(&mut self, rhs: f64) {
        for col in &mut self.cols {
            for v in col {
                *v /= rhs;
            }
        }
        self.class = TransformClass::empty();
    }
}
