use crate::Status;

/// Reasons the frontend can reject a module.
///
/// The `Display` strings double as the public diagnostic messages, so the
/// handler-specific variants carry the offending opcode name as a prefix.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Provided data was not an integer number of 32-bit words")]
    MisalignedData,
    #[error("incomplete data")]
    IncompleteData,
    #[error("invalid word count")]
    InvalidWordCount,
    #[error("unknown instruction {0}")]
    UnknownInstruction(u16),
    #[error("Op{0:?} is not supported.")]
    UnsupportedInstruction(spirv::Op),
    #[error("invalid operand count {1} for Op{0:?}")]
    InvalidOperandCount(spirv::Op, u16),
    #[error("Op{0:?}: invalid operand")]
    InvalidOperand(spirv::Op),
    #[error("Op{0:?}: bad string")]
    BadString(spirv::Op),
    #[error("OpCapability: Capability {0} is unsupported.")]
    UnsupportedCapability(spirv::Word),
    #[error("OpExtInstImport: Extended instruction set '{0}' is not supported.")]
    UnsupportedExtSet(String),
    #[error("OpMemoryModel: Only `Logical` addressing model is supported.")]
    UnsupportedAddressingModel,
    #[error("OpMemoryModel: Only memory model `GLSL450` is supported.")]
    UnsupportedMemoryModel,
    #[error("OpDecorate: Only LinkageAttributes are supported.")]
    UnsupportedDecoration,
    #[error("OpDecorate: Only exporting is available using LinkageAttributes.")]
    UnsupportedLinkageType,
    #[error("OpDecorate: There can only be a single exported function named 'main'")]
    DuplicateExport,
    #[error("OpTypeFloat: Only 32-bit width is supported. Got width {0}")]
    InvalidFloatWidth(spirv::Word),
    #[error("OpTypeFloat: Only one OpTypeFloat should be specified.")]
    DuplicateTypeFloat,
    #[error("OpTypeVector: OpTypeFloat was not declared, or didn't match the given component type.")]
    InvalidComponentType,
    #[error("OpTypeVector: Component count must be 2, 3, or 4.")]
    InvalidComponentCount,
    #[error("OpTypeVector: Only one vector type with {0} components should be specified.")]
    DuplicateTypeVector(spirv::Word),
    #[error("OpTypeFunction: Only a single function type is supported.")]
    DuplicateTypeFunction,
    #[error("OpTypeFunction: Only one parameter is supported.")]
    FunctionTypeArity,
    #[error("OpTypeFunction: Parameter type was not defined or was not vec2.")]
    InvalidParameterType,
    #[error("OpTypeFunction: Return type was not defined or was not vec4.")]
    InvalidReturnType,
    #[error("OpConstant: Must have float-type.")]
    NonFloatConstant,
    #[error("OpFunction: There must be one function exported as 'main'")]
    UnexportedFunction,
    #[error("OpFunction: No function control flags are supported.")]
    UnsupportedFunctionControl,
    #[error("OpFunction: Function type mismatch.")]
    FunctionTypeMismatch,
    #[error("OpFunction: Function must return vec4 type.")]
    FunctionReturnMismatch,
    #[error("OpFunctionParameter: There can only be one specified parameter.")]
    DuplicateParameter,
    #[error("OpFunctionParameter: Param must be type vec2.")]
    InvalidParameter,
    #[error("OpLabel: The last instruction should have been OpFunctionParameter.")]
    MisplacedLabel,
    #[error("OpReturnValue: There can only be one return value.")]
    DuplicateReturn,
    #[error("Operator '{0}' needs two arguments.")]
    OperatorArity(char),
    #[error("Builtin '{0}' needs two arguments.")]
    BuiltinArity(&'static str),
    #[error("OpExtInst: Must be from 'GLSL.std.450'")]
    UnsupportedExtInstSet,
    #[error("OpExtInst: '{0}' is not a supported GLSL instruction.")]
    UnsupportedExtInst(spirv::Word),
    #[error("Invalid type.")]
    InvalidType,
    #[error("no function was exported as 'main'")]
    MissingExport,
    #[error("the exported function has no fragment-position parameter")]
    MissingParameter,
    #[error("the exported function never returns a value")]
    MissingReturn,
    #[error(transparent)]
    Backend(#[from] crate::back::sksl::Error),
}

impl Error {
    /// Status classification surfaced through [`crate::Transpiler`].
    ///
    /// Framing-level problems map to [`Status::InvalidData`]; everything
    /// the validator or lowerer rejects maps to [`Status::Failure`].
    pub fn status(&self) -> Status {
        match *self {
            Error::MisalignedData | Error::IncompleteData | Error::InvalidWordCount => {
                Status::InvalidData
            }
            _ => Status::Failure,
        }
    }
}
