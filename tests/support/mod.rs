//! Tiny SPIR-V assembler for building test modules.

use spirv::{Op, Word};

/// One instruction under construction, physical-layout style: the first
/// word packs the word count and opcode, then the optional result-type
/// and result ids, then the operands.
pub struct Instruction {
    op: Op,
    wc: u32,
    type_id: Option<Word>,
    result_id: Option<Word>,
    operands: Vec<Word>,
}

impl Instruction {
    pub fn new(op: Op) -> Self {
        Instruction {
            op,
            wc: 1,
            type_id: None,
            result_id: None,
            operands: vec![],
        }
    }

    pub fn set_type(&mut self, id: Word) {
        assert!(self.type_id.is_none(), "Type can only be set once");
        self.type_id = Some(id);
        self.wc += 1;
    }

    pub fn set_result(&mut self, id: Word) {
        assert!(self.result_id.is_none(), "Result can only be set once");
        self.result_id = Some(id);
        self.wc += 1;
    }

    pub fn add_operand(&mut self, operand: Word) {
        self.operands.push(operand);
        self.wc += 1;
    }

    pub fn add_operands(&mut self, operands: Vec<Word>) {
        for operand in operands {
            self.add_operand(operand)
        }
    }

    pub fn to_words(&self, sink: &mut Vec<Word>) {
        sink.push(self.wc << 16 | self.op as u32);
        sink.extend(self.type_id);
        sink.extend(self.result_id);
        sink.extend(self.operands.iter().copied());
    }
}

pub fn bytes_to_words(bytes: &[u8]) -> Vec<Word> {
    bytes
        .chunks(4)
        .map(|chars| chars.iter().rev().fold(0u32, |u, c| (u << 8) | *c as u32))
        .collect()
}

pub fn string_to_words(input: &str) -> Vec<Word> {
    let bytes = input.as_bytes();
    let mut words = bytes_to_words(bytes);

    if bytes.len() % 4 == 0 {
        // nul-termination
        words.push(0x0u32);
    }

    words
}

/// Accumulates a whole module: five header words, then instructions.
pub struct ModuleBuilder {
    words: Vec<Word>,
}

impl ModuleBuilder {
    pub fn new() -> Self {
        ModuleBuilder {
            words: vec![spirv::MAGIC_NUMBER, 0x0001_0200, 0, 64, 0],
        }
    }

    pub fn inst(&mut self, instruction: Instruction) -> &mut Self {
        instruction.to_words(&mut self.words);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        self.words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }
}

pub fn capability(capability: spirv::Capability) -> Instruction {
    let mut instruction = Instruction::new(Op::Capability);
    instruction.add_operand(capability as u32);
    instruction
}

pub fn ext_inst_import(id: Word, name: &str) -> Instruction {
    let mut instruction = Instruction::new(Op::ExtInstImport);
    instruction.set_result(id);
    instruction.add_operands(string_to_words(name));
    instruction
}

pub fn memory_model(
    addressing_model: spirv::AddressingModel,
    memory_model: spirv::MemoryModel,
) -> Instruction {
    let mut instruction = Instruction::new(Op::MemoryModel);
    instruction.add_operand(addressing_model as u32);
    instruction.add_operand(memory_model as u32);
    instruction
}

pub fn decorate_linkage(target: Word, name: &str, linkage: spirv::LinkageType) -> Instruction {
    let mut instruction = Instruction::new(Op::Decorate);
    instruction.add_operand(target);
    instruction.add_operand(spirv::Decoration::LinkageAttributes as u32);
    instruction.add_operands(string_to_words(name));
    instruction.add_operand(linkage as u32);
    instruction
}

pub fn type_float(id: Word, width: Word) -> Instruction {
    let mut instruction = Instruction::new(Op::TypeFloat);
    instruction.set_result(id);
    instruction.add_operand(width);
    instruction
}

pub fn type_vector(id: Word, component_type: Word, count: Word) -> Instruction {
    let mut instruction = Instruction::new(Op::TypeVector);
    instruction.set_result(id);
    instruction.add_operand(component_type);
    instruction.add_operand(count);
    instruction
}

pub fn type_function(id: Word, return_type: Word, parameter_types: &[Word]) -> Instruction {
    let mut instruction = Instruction::new(Op::TypeFunction);
    instruction.set_result(id);
    instruction.add_operand(return_type);
    for &parameter_type in parameter_types {
        instruction.add_operand(parameter_type);
    }
    instruction
}

pub fn constant_f32(type_id: Word, id: Word, value: f32) -> Instruction {
    let mut instruction = Instruction::new(Op::Constant);
    instruction.set_type(type_id);
    instruction.set_result(id);
    instruction.add_operand(value.to_bits());
    instruction
}

pub fn constant_composite(type_id: Word, id: Word, components: &[Word]) -> Instruction {
    let mut instruction = Instruction::new(Op::ConstantComposite);
    instruction.set_type(type_id);
    instruction.set_result(id);
    for &component in components {
        instruction.add_operand(component);
    }
    instruction
}

pub fn function(return_type: Word, id: Word, control: Word, function_type: Word) -> Instruction {
    let mut instruction = Instruction::new(Op::Function);
    instruction.set_type(return_type);
    instruction.set_result(id);
    instruction.add_operand(control);
    instruction.add_operand(function_type);
    instruction
}

pub fn function_parameter(type_id: Word, id: Word) -> Instruction {
    let mut instruction = Instruction::new(Op::FunctionParameter);
    instruction.set_type(type_id);
    instruction.set_result(id);
    instruction
}

pub fn label(id: Word) -> Instruction {
    let mut instruction = Instruction::new(Op::Label);
    instruction.set_result(id);
    instruction
}

pub fn return_value(value: Word) -> Instruction {
    let mut instruction = Instruction::new(Op::ReturnValue);
    instruction.add_operand(value);
    instruction
}

pub fn function_end() -> Instruction {
    Instruction::new(Op::FunctionEnd)
}

/// Any of the two-operand value instructions (`OpFAdd`, `OpDot`, …).
pub fn binary(op: Op, type_id: Word, id: Word, left: Word, right: Word) -> Instruction {
    let mut instruction = Instruction::new(op);
    instruction.set_type(type_id);
    instruction.set_result(id);
    instruction.add_operand(left);
    instruction.add_operand(right);
    instruction
}

/// Any of the one-operand value instructions (`OpFNegate`).
pub fn unary(op: Op, type_id: Word, id: Word, value: Word) -> Instruction {
    let mut instruction = Instruction::new(op);
    instruction.set_type(type_id);
    instruction.set_result(id);
    instruction.add_operand(value);
    instruction
}

pub fn ext_inst(
    type_id: Word,
    id: Word,
    set: Word,
    operation: Word,
    arguments: &[Word],
) -> Instruction {
    let mut instruction = Instruction::new(Op::ExtInst);
    instruction.set_type(type_id);
    instruction.set_result(id);
    instruction.add_operand(set);
    instruction.add_operand(operation);
    for &argument in arguments {
        instruction.add_operand(argument);
    }
    instruction
}

pub fn composite_construct(type_id: Word, id: Word, components: &[Word]) -> Instruction {
    let mut instruction = Instruction::new(Op::CompositeConstruct);
    instruction.set_type(type_id);
    instruction.set_result(id);
    for &component in components {
        instruction.add_operand(component);
    }
    instruction
}
