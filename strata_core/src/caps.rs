// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Driver capabilities and vendor classification.
//!
//! These are queried from the [`Device`](crate::device::Device) exactly once
//! when the [`RenderState`](crate::state::RenderState) is constructed, and
//! are immutable afterwards. They take no part in save/restore; they exist
//! so drawing code can branch on hardware capability (e.g. how many texture
//! units may be bound) without re-querying the driver every frame.

use alloc::string::String;

/// Driver vendor, classified from the reported vendor string.
///
/// Used to enable vendor-specific fast paths; `Unknown` disables them all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Vendor {
    /// Unrecognized vendor.
    #[default]
    Unknown,
    /// ATI / AMD drivers.
    Ati,
    /// NVIDIA drivers.
    Nvidia,
    /// Intel drivers.
    Intel,
}

impl Vendor {
    /// Classifies a driver vendor string (case-insensitive substring match).
    #[must_use]
    pub fn from_vendor_string(vendor: &str) -> Self {
        let lower = vendor.to_ascii_lowercase();
        // "NVIDIA Corporation" contains "ati"; check the longer names first.
        if lower.contains("nvidia") {
            Self::Nvidia
        } else if lower.contains("intel") {
            Self::Intel
        } else if lower.contains("ati ") || lower.starts_with("ati") || lower.contains("amd") {
            Self::Ati
        } else {
            Self::Unknown
        }
    }
}

/// Read-only driver capabilities, populated once at context creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// Classified driver vendor.
    pub vendor: Vendor,
    /// The driver's version string, verbatim.
    pub version: String,
    /// Space-separated extension names, verbatim.
    pub extensions: String,
    /// Maximum number of texture coordinate sets.
    pub max_texture_coords: u32,
    /// Maximum number of simultaneously bound texture units.
    pub max_texture_units: u32,
}

impl Capabilities {
    /// Returns whether `name` appears in the extension list (exact token
    /// match, not substring).
    #[must_use]
    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.split_whitespace().any(|e| e == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn vendor_classification() {
        assert_eq!(
            Vendor::from_vendor_string("NVIDIA Corporation"),
            Vendor::Nvidia
        );
        assert_eq!(
            Vendor::from_vendor_string("ATI Technologies Inc."),
            Vendor::Ati
        );
        assert_eq!(Vendor::from_vendor_string("Intel Inc."), Vendor::Intel);
        assert_eq!(
            Vendor::from_vendor_string("Mesa/X.org"),
            Vendor::Unknown
        );
    }

    #[test]
    fn corporation_is_not_ati() {
        // The substring "ati" inside "Corporation" must not misclassify.
        assert_eq!(
            Vendor::from_vendor_string("Imagination Corporation"),
            Vendor::Unknown
        );
    }

    #[test]
    fn extension_match_is_exact_token() {
        let caps = Capabilities {
            vendor: Vendor::Unknown,
            version: "2.1".to_string(),
            extensions: "GL_ARB_multitexture GL_ARB_texture_float".to_string(),
            max_texture_coords: 8,
            max_texture_units: 4,
        };
        assert!(caps.has_extension("GL_ARB_multitexture"));
        assert!(caps.has_extension("GL_ARB_texture_float"));
        assert!(!caps.has_extension("GL_ARB_texture"));
    }
}
