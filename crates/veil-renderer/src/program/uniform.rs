//! Uniform keys and reflected uniform metadata.

use std::fmt;

use veil_common::crc32;

use crate::texture_units::TextureUnit;

/// CRC-32 of a uniform name as the driver reports it.
///
/// Arrays are reported with a `[0]` suffix, so the key for
/// `uniform float uWeights[8];` is `UniformKey::new("uWeights[0]")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniformKey(u32);

impl UniformKey {
    pub const fn new(name: &str) -> Self {
        Self(crc32(name.as_bytes()))
    }

    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for UniformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Declared GLSL type of a uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformType {
    Float,
    Int,
    UInt,
    Bool,
    Vec2,
    Vec3,
    Vec4,
    IVec2,
    IVec3,
    IVec4,
    Mat3,
    Mat4,
    Sampler2D,
    Sampler2DArray,
    Sampler2DShadow,
    Sampler3D,
    SamplerCube,
    IntSampler2D,
    UIntSampler2D,
    /// Anything else, by GL type enum.
    Other(u32),
}

impl UniformType {
    pub fn from_gl(utype: u32) -> Self {
        match utype {
            glow::FLOAT => Self::Float,
            glow::INT => Self::Int,
            glow::UNSIGNED_INT => Self::UInt,
            glow::BOOL => Self::Bool,
            glow::FLOAT_VEC2 => Self::Vec2,
            glow::FLOAT_VEC3 => Self::Vec3,
            glow::FLOAT_VEC4 => Self::Vec4,
            glow::INT_VEC2 => Self::IVec2,
            glow::INT_VEC3 => Self::IVec3,
            glow::INT_VEC4 => Self::IVec4,
            glow::FLOAT_MAT3 => Self::Mat3,
            glow::FLOAT_MAT4 => Self::Mat4,
            glow::SAMPLER_2D => Self::Sampler2D,
            glow::SAMPLER_2D_ARRAY => Self::Sampler2DArray,
            glow::SAMPLER_2D_SHADOW => Self::Sampler2DShadow,
            glow::SAMPLER_3D => Self::Sampler3D,
            glow::SAMPLER_CUBE => Self::SamplerCube,
            glow::INT_SAMPLER_2D => Self::IntSampler2D,
            glow::UNSIGNED_INT_SAMPLER_2D => Self::UIntSampler2D,
            other => Self::Other(other),
        }
    }

    pub fn is_sampler(self) -> bool {
        matches!(
            self,
            Self::Sampler2D
                | Self::Sampler2DArray
                | Self::Sampler2DShadow
                | Self::Sampler3D
                | Self::SamplerCube
                | Self::IntSampler2D
                | Self::UIntSampler2D
        )
    }
}

/// Reflected metadata for one active uniform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformDescriptor {
    pub location: u32,
    pub kind: UniformType,
    /// Declared array length, 1 for scalars.
    pub array_size: u32,
    pub name: String,
    /// Unit assigned at link time; only samplers have one.
    pub texture_unit: Option<TextureUnit>,
}

impl UniformDescriptor {
    pub fn key(&self) -> UniformKey {
        UniformKey::new(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_crc32_of_name() {
        assert_eq!(UniformKey::new("123456789").value(), 0xCBF4_3926);
    }

    #[test]
    fn key_usable_as_const() {
        const DIRECTION: UniformKey = UniformKey::new("uBlurDirection");
        assert_eq!(DIRECTION, UniformKey::new("uBlurDirection"));
        assert_ne!(DIRECTION, UniformKey::new("uBlurDirection[0]"));
    }

    #[test]
    fn key_display_is_hex() {
        assert_eq!(UniformKey::new("123456789").to_string(), "0xcbf43926");
    }

    #[test]
    fn sampler_types_are_detected() {
        assert!(UniformType::from_gl(glow::SAMPLER_2D).is_sampler());
        assert!(UniformType::from_gl(glow::SAMPLER_2D_ARRAY).is_sampler());
        assert!(!UniformType::from_gl(glow::FLOAT_VEC2).is_sampler());
        assert_eq!(UniformType::from_gl(0xDEAD), UniformType::Other(0xDEAD));
    }
}
