//! Names of the GLSL.std.450 operations that SkSL exposes directly.

use spirv::GLOp;

/// Map a GLSL.std.450 operation to the SkSL intrinsic of the same meaning.
///
/// Only the float forms of the extended set have counterparts here; the
/// integer and double variants, the pack/unpack family, `Refract` and the
/// interpolation operations are rejected by the caller.
pub(super) const fn sksl_name(gl_op: GLOp) -> Option<&'static str> {
    Some(match gl_op {
        GLOp::Trunc => "trunc",
        GLOp::FAbs => "abs",
        GLOp::FSign => "sign",
        GLOp::Floor => "floor",
        GLOp::Ceil => "ceil",
        GLOp::Fract => "fract",
        GLOp::Radians => "radians",
        GLOp::Degrees => "degrees",
        GLOp::Sin => "sin",
        GLOp::Cos => "cos",
        GLOp::Tan => "tan",
        GLOp::Asin => "asin",
        GLOp::Acos => "acos",
        GLOp::Atan => "atan",
        GLOp::Atan2 => "atan2",
        GLOp::Pow => "pow",
        GLOp::Exp => "exp",
        GLOp::Log => "log",
        GLOp::Exp2 => "exp2",
        GLOp::Log2 => "log2",
        GLOp::Sqrt => "sqrt",
        GLOp::InverseSqrt => "inversesqrt",
        GLOp::FMin => "min",
        GLOp::FMax => "max",
        GLOp::FClamp => "clamp",
        GLOp::FMix => "mix",
        GLOp::Step => "step",
        GLOp::SmoothStep => "smoothstep",
        GLOp::Length => "length",
        GLOp::Distance => "distance",
        GLOp::Cross => "cross",
        GLOp::Normalize => "normalize",
        GLOp::FaceForward => "faceforward",
        GLOp::Reflect => "reflect",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_float_forms() {
        assert_eq!(sksl_name(GLOp::Refract), None);
        assert_eq!(sksl_name(GLOp::SAbs), None);
        assert_eq!(sksl_name(GLOp::UMin), None);
        assert_eq!(sksl_name(GLOp::PackHalf2x16), None);
    }
}
