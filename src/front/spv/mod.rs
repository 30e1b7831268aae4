/*! SPIR-V frontend

A streaming, single-pass reader of the SPIR-V subset that encodes pure
shader expressions. Instructions are decoded in module order, and each
supported opcode both validates the subset rules and drives the SkSL
writer, so the emitted text mirrors the SPIR-V dataflow one statement per
value-producing instruction.

## Id lookups

SPIR-V names everything with nonzero result-ids. The subset admits exactly
four types, one function type, one exported function and one parameter, so
instead of lookup tables the frontend records the handful of distinguished
ids in dedicated slots and compares operands against them. A slot value of
zero means "not declared yet"; all four slots required for a complete
entry point are checked once the stream is exhausted.

## Ordering

Apart from the data dependencies implied by the slots (a vector needs the
float type, `OpFunction` needs the export decoration, and so on), the only
positional rule is that `OpLabel` must directly follow
`OpFunctionParameter`, which the frontend tracks with the previous opcode.
In particular, constants may be declared inside the function body and are
emitted exactly where they appear.
!*/

mod error;
mod ext_inst;

pub use error::Error;

use crate::back::sksl::Writer;

pub const SUPPORTED_CAPABILITIES: &[spirv::Capability] = &[
    spirv::Capability::Matrix,
    spirv::Capability::Shader,
    spirv::Capability::Linkage,
];
pub const SUPPORTED_EXT_SETS: &[&str] = &["GLSL.std.450"];

struct Instruction {
    op: spirv::Op,
    wc: u16,
}

impl Instruction {
    fn expect(&self, count: u16) -> Result<(), Error> {
        if self.wc == count {
            Ok(())
        } else {
            Err(Error::InvalidOperandCount(self.op, self.wc))
        }
    }

    fn expect_at_least(&self, count: u16) -> Result<(), Error> {
        if self.wc >= count {
            Ok(())
        } else {
            Err(Error::InvalidOperandCount(self.op, self.wc))
        }
    }
}

/// Parse a SPIR-V module out of raw bytes and return the SkSL text.
///
/// The header words are consumed but not validated; magic number and
/// version are part of the producer contract for this subset.
pub fn parse_u8_slice(data: &[u8]) -> Result<String, Error> {
    if data.len() % 4 != 0 {
        return Err(Error::MisalignedData);
    }
    let words = data
        .chunks(4)
        .map(|c| u32::from_le_bytes(c.try_into().expect("this is always a slice of 4 bytes")));
    Frontend::new(words).parse()
}

/// Decoder state: the word cursor plus the symbol slots of the subset.
pub struct Frontend<I> {
    data: I,
    temp_bytes: Vec<u8>,
    /// Opcode of the previously handled instruction, for the `OpLabel`
    /// ordering rule.
    last_op: Option<spirv::Op>,

    // Result-ids of the distinguished declarations, zero while unset.
    float_type: spirv::Word,
    vec2_type: spirv::Word,
    vec3_type: spirv::Word,
    vec4_type: spirv::Word,
    main_function_type: spirv::Word,
    main_function: spirv::Word,
    frag_pos_param: spirv::Word,
    return_value: spirv::Word,
    glsl_ext_set: spirv::Word,
}

impl<I: Iterator<Item = u32>> Frontend<I> {
    pub fn new(data: I) -> Self {
        Frontend {
            data,
            temp_bytes: Vec::new(),
            last_op: None,
            float_type: 0,
            vec2_type: 0,
            vec3_type: 0,
            vec4_type: 0,
            main_function_type: 0,
            main_function: 0,
            frag_pos_param: 0,
            return_value: 0,
            glsl_ext_set: 0,
        }
    }

    fn next(&mut self) -> Result<u32, Error> {
        self.data.next().ok_or(Error::IncompleteData)
    }

    /// Decode the next instruction word, or `None` at end of stream.
    fn next_inst(&mut self) -> Result<Option<Instruction>, Error> {
        let word = match self.data.next() {
            Some(word) => word,
            None => return Ok(None),
        };
        let (wc, opcode) = ((word >> 16) as u16, (word & 0xffff) as u16);
        if wc == 0 {
            return Err(Error::InvalidWordCount);
        }
        let op = spirv::Op::from_u32(opcode as u32).ok_or(Error::UnknownInstruction(opcode))?;
        Ok(Some(Instruction { op, wc }))
    }

    fn next_string(&mut self, op: spirv::Op, mut count: u16) -> Result<(String, u16), Error> {
        self.temp_bytes.clear();
        loop {
            if count == 0 {
                return Err(Error::BadString(op));
            }
            count -= 1;
            let chars = self.next()?.to_le_bytes();
            let pos = chars.iter().position(|&c| c == 0).unwrap_or(4);
            self.temp_bytes.extend_from_slice(&chars[..pos]);
            if pos < 4 {
                break;
            }
        }
        std::str::from_utf8(&self.temp_bytes)
            .map(|s| (s.to_owned(), count))
            .map_err(|_| Error::BadString(op))
    }

    /// SkSL spelling of a recorded type id.
    fn type_name(&self, id: spirv::Word) -> Option<&'static str> {
        if id == 0 {
            None
        } else if id == self.float_type {
            Some("float")
        } else if id == self.vec2_type {
            Some("vec2")
        } else if id == self.vec3_type {
            Some("vec3")
        } else if id == self.vec4_type {
            Some("vec4")
        } else {
            None
        }
    }

    fn resolve_type(&self, id: spirv::Word) -> Result<&'static str, Error> {
        self.type_name(id).ok_or(Error::InvalidType)
    }

    /// Consume the whole module and return the accumulated SkSL.
    pub fn parse(mut self) -> Result<String, Error> {
        let mut writer = Writer::new(String::new());

        // Header: magic, version, generator, id bound, schema.
        for _ in 0..5 {
            self.next()?;
        }

        while let Some(inst) = self.next_inst()? {
            use spirv::Op;
            log::debug!("{:?} [{}]", inst.op, inst.wc);
            let op = inst.op;
            match inst.op {
                Op::Capability => self.parse_capability(inst),
                Op::ExtInstImport => self.parse_ext_inst_import(inst),
                Op::MemoryModel => self.parse_memory_model(inst),
                Op::Decorate => self.parse_decorate(inst),
                Op::TypeFloat => self.parse_type_float(inst),
                Op::TypeVector => self.parse_type_vector(inst),
                Op::TypeFunction => self.parse_type_function(inst),
                Op::Constant => self.parse_constant(inst, &mut writer),
                Op::ConstantComposite => self.parse_constant_composite(inst, &mut writer),
                Op::Function => self.parse_function(inst, &mut writer),
                Op::FunctionParameter => self.parse_function_parameter(inst, &mut writer),
                Op::Label => self.parse_label(inst, &mut writer),
                Op::ReturnValue => self.parse_return_value(inst, &mut writer),
                Op::CompositeConstruct => self.parse_composite_construct(inst, &mut writer),
                Op::FNegate => self.parse_negate(inst, &mut writer),
                Op::FAdd => self.parse_operator(inst, '+', &mut writer),
                Op::FSub => self.parse_operator(inst, '-', &mut writer),
                Op::FMul
                | Op::VectorTimesScalar
                | Op::VectorTimesMatrix
                | Op::MatrixTimesVector
                | Op::MatrixTimesMatrix => self.parse_operator(inst, '*', &mut writer),
                Op::FDiv => self.parse_operator(inst, '/', &mut writer),
                Op::FMod => self.parse_builtin(inst, "mod", &mut writer),
                Op::Dot => self.parse_builtin(inst, "dot", &mut writer),
                Op::ExtInst => self.parse_ext_inst(inst, &mut writer),
                Op::FunctionEnd => self.parse_function_end(inst, &mut writer),
                _ => Err(Error::UnsupportedInstruction(inst.op)),
            }?;
            self.last_op = Some(op);
        }

        // A complete module has exported, defined and returned from `main`.
        if self.main_function == 0 || self.main_function_type == 0 {
            return Err(Error::MissingExport);
        }
        if self.frag_pos_param == 0 {
            return Err(Error::MissingParameter);
        }
        if self.return_value == 0 {
            return Err(Error::MissingReturn);
        }

        Ok(writer.finish())
    }

    fn parse_capability(&mut self, inst: Instruction) -> Result<(), Error> {
        inst.expect(2)?;
        let capability = self.next()?;
        let cap = spirv::Capability::from_u32(capability)
            .ok_or(Error::UnsupportedCapability(capability))?;
        if !SUPPORTED_CAPABILITIES.contains(&cap) {
            return Err(Error::UnsupportedCapability(capability));
        }
        Ok(())
    }

    fn parse_ext_inst_import(&mut self, inst: Instruction) -> Result<(), Error> {
        inst.expect_at_least(3)?;
        let result_id = self.next()?;
        let (name, left) = self.next_string(inst.op, inst.wc - 2)?;
        if left != 0 {
            return Err(Error::InvalidOperand(inst.op));
        }
        if !SUPPORTED_EXT_SETS.contains(&name.as_str()) {
            return Err(Error::UnsupportedExtSet(name));
        }
        self.glsl_ext_set = result_id;
        Ok(())
    }

    fn parse_memory_model(&mut self, inst: Instruction) -> Result<(), Error> {
        inst.expect(3)?;
        if self.next()? != spirv::AddressingModel::Logical as u32 {
            return Err(Error::UnsupportedAddressingModel);
        }
        if self.next()? != spirv::MemoryModel::GLSL450 as u32 {
            return Err(Error::UnsupportedMemoryModel);
        }
        Ok(())
    }

    fn parse_decorate(&mut self, inst: Instruction) -> Result<(), Error> {
        inst.expect_at_least(5)?;
        let target = self.next()?;
        if self.next()? != spirv::Decoration::LinkageAttributes as u32 {
            return Err(Error::UnsupportedDecoration);
        }
        let (name, left) = self.next_string(inst.op, inst.wc - 3)?;
        if left != 1 {
            return Err(Error::InvalidOperand(inst.op));
        }
        if self.next()? != spirv::LinkageType::Export as u32 {
            return Err(Error::UnsupportedLinkageType);
        }
        if name != "main" || self.main_function != 0 {
            return Err(Error::DuplicateExport);
        }
        log::trace!("%{} exported as 'main'", target);
        self.main_function = target;
        Ok(())
    }

    fn parse_type_float(&mut self, inst: Instruction) -> Result<(), Error> {
        inst.expect(3)?;
        let id = self.next()?;
        let width = self.next()?;
        if width != 32 {
            return Err(Error::InvalidFloatWidth(width));
        }
        if self.float_type != 0 {
            return Err(Error::DuplicateTypeFloat);
        }
        self.float_type = id;
        Ok(())
    }

    fn parse_type_vector(&mut self, inst: Instruction) -> Result<(), Error> {
        inst.expect(4)?;
        let id = self.next()?;
        let component_type = self.next()?;
        if component_type == 0 || component_type != self.float_type {
            return Err(Error::InvalidComponentType);
        }
        let count = self.next()?;
        let slot = match count {
            2 => &mut self.vec2_type,
            3 => &mut self.vec3_type,
            4 => &mut self.vec4_type,
            _ => return Err(Error::InvalidComponentCount),
        };
        if *slot != 0 {
            return Err(Error::DuplicateTypeVector(count));
        }
        *slot = id;
        Ok(())
    }

    fn parse_type_function(&mut self, inst: Instruction) -> Result<(), Error> {
        inst.expect_at_least(3)?;
        if self.main_function_type != 0 {
            return Err(Error::DuplicateTypeFunction);
        }
        if inst.wc > 4 {
            return Err(Error::FunctionTypeArity);
        }
        let id = self.next()?;
        let return_type = self.next()?;
        let param_type = if inst.wc == 4 { self.next()? } else { 0 };
        if param_type == 0 || param_type != self.vec2_type {
            return Err(Error::InvalidParameterType);
        }
        if return_type == 0 || return_type != self.vec4_type {
            return Err(Error::InvalidReturnType);
        }
        self.main_function_type = id;
        Ok(())
    }

    fn parse_constant(
        &mut self,
        inst: Instruction,
        writer: &mut Writer<String>,
    ) -> Result<(), Error> {
        inst.expect(4)?;
        let type_id = self.next()?;
        let id = self.next()?;
        if type_id == 0 || type_id != self.float_type {
            return Err(Error::NonFloatConstant);
        }
        // Reinterpret, not convert: the word holds the IEEE-754 bit pattern.
        let value = f32::from_bits(self.next()?);
        writer.write_scalar_constant(id, value)?;
        Ok(())
    }

    fn parse_constant_composite(
        &mut self,
        inst: Instruction,
        writer: &mut Writer<String>,
    ) -> Result<(), Error> {
        inst.expect_at_least(3)?;
        let _type_id = self.next()?;
        let id = self.next()?;
        let mut components = Vec::with_capacity(inst.wc as usize - 3);
        for _ in 3..inst.wc {
            components.push(self.next()?);
        }
        writer.write_vector_constant(id, &components)?;
        Ok(())
    }

    fn parse_function(
        &mut self,
        inst: Instruction,
        writer: &mut Writer<String>,
    ) -> Result<(), Error> {
        inst.expect(5)?;
        let return_type = self.next()?;
        let id = self.next()?;
        let function_control = self.next()?;
        let function_type = self.next()?;
        if id == 0 || id != self.main_function {
            return Err(Error::UnexportedFunction);
        }
        if function_control != spirv::FunctionControl::NONE.bits() {
            return Err(Error::UnsupportedFunctionControl);
        }
        if function_type == 0 || function_type != self.main_function_type {
            return Err(Error::FunctionTypeMismatch);
        }
        if return_type != self.vec4_type {
            return Err(Error::FunctionReturnMismatch);
        }
        writer.write_main_start()?;
        Ok(())
    }

    fn parse_function_parameter(
        &mut self,
        inst: Instruction,
        writer: &mut Writer<String>,
    ) -> Result<(), Error> {
        inst.expect(3)?;
        let type_id = self.next()?;
        let id = self.next()?;
        if self.frag_pos_param != 0 {
            return Err(Error::DuplicateParameter);
        }
        if type_id == 0 || type_id != self.vec2_type {
            return Err(Error::InvalidParameter);
        }
        self.frag_pos_param = id;
        writer.write_main_param(id)?;
        Ok(())
    }

    fn parse_label(&mut self, inst: Instruction, writer: &mut Writer<String>) -> Result<(), Error> {
        inst.expect(2)?;
        let _id = self.next()?;
        if self.last_op != Some(spirv::Op::FunctionParameter) {
            return Err(Error::MisplacedLabel);
        }
        writer.write_body_start()?;
        Ok(())
    }

    fn parse_return_value(
        &mut self,
        inst: Instruction,
        writer: &mut Writer<String>,
    ) -> Result<(), Error> {
        inst.expect(2)?;
        if self.return_value != 0 {
            return Err(Error::DuplicateReturn);
        }
        let value = self.next()?;
        self.return_value = value;
        writer.write_return(value)?;
        Ok(())
    }

    fn parse_negate(&mut self, inst: Instruction, writer: &mut Writer<String>) -> Result<(), Error> {
        inst.expect(4)?;
        let type_id = self.next()?;
        let id = self.next()?;
        let value = self.next()?;
        let ty = self.resolve_type(type_id)?;
        writer.write_negate(ty, id, value)?;
        Ok(())
    }

    fn parse_operator(
        &mut self,
        inst: Instruction,
        op: char,
        writer: &mut Writer<String>,
    ) -> Result<(), Error> {
        if inst.wc != 5 {
            return Err(Error::OperatorArity(op));
        }
        let type_id = self.next()?;
        let id = self.next()?;
        let left = self.next()?;
        let right = self.next()?;
        let ty = self.resolve_type(type_id)?;
        writer.write_binary(ty, id, left, op, right)?;
        Ok(())
    }

    fn parse_builtin(
        &mut self,
        inst: Instruction,
        name: &'static str,
        writer: &mut Writer<String>,
    ) -> Result<(), Error> {
        if inst.wc != 5 {
            return Err(Error::BuiltinArity(name));
        }
        let type_id = self.next()?;
        let id = self.next()?;
        let arguments = [self.next()?, self.next()?];
        let ty = self.resolve_type(type_id)?;
        writer.write_call(ty, id, name, &arguments)?;
        Ok(())
    }

    fn parse_ext_inst(
        &mut self,
        inst: Instruction,
        writer: &mut Writer<String>,
    ) -> Result<(), Error> {
        inst.expect_at_least(5)?;
        let type_id = self.next()?;
        let id = self.next()?;
        let set_id = self.next()?;
        let gl_op = self.next()?;
        let mut arguments = Vec::with_capacity(inst.wc as usize - 5);
        for _ in 5..inst.wc {
            arguments.push(self.next()?);
        }
        let ty = self.resolve_type(type_id)?;
        if set_id == 0 || set_id != self.glsl_ext_set {
            return Err(Error::UnsupportedExtInstSet);
        }
        let name = spirv::GLOp::from_u32(gl_op)
            .and_then(ext_inst::sksl_name)
            .ok_or(Error::UnsupportedExtInst(gl_op))?;
        log::trace!("GLSL.std.450 {} lowered to '{}'", gl_op, name);
        writer.write_call(ty, id, name, &arguments)?;
        Ok(())
    }

    fn parse_composite_construct(
        &mut self,
        inst: Instruction,
        writer: &mut Writer<String>,
    ) -> Result<(), Error> {
        inst.expect_at_least(3)?;
        let type_id = self.next()?;
        let id = self.next()?;
        let mut components = Vec::with_capacity(inst.wc as usize - 3);
        for _ in 3..inst.wc {
            components.push(self.next()?);
        }
        let ty = self.resolve_type(type_id)?;
        writer.write_construct(ty, id, &components)?;
        Ok(())
    }

    fn parse_function_end(
        &mut self,
        inst: Instruction,
        writer: &mut Writer<String>,
    ) -> Result<(), Error> {
        inst.expect(1)?;
        writer.write_body_end()?;
        Ok(())
    }
}
