use super::Error;
use crate::back::INDENT;
use spirv::Word;
use std::fmt::{self, Write};

/// Shorthand result used internally by the backend
type BackendResult = Result<(), Error>;

/// Textual rendering of a SPIR-V result-id.
///
/// Producer-assigned ids are unique within a module, so prefixing the
/// decimal id is collision-free and lets every operand be referenced the
/// same way no matter which instruction produced it.
#[derive(Clone, Copy)]
struct Name(Word);

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.0)
    }
}

pub struct Writer<W> {
    out: W,
}

impl<W: Write> Writer<W> {
    pub const fn new(out: W) -> Self {
        Writer { out }
    }

    /// Open the fragment entry point signature.
    pub fn write_main_start(&mut self) -> BackendResult {
        write!(self.out, "half4 main(")?;
        Ok(())
    }

    /// The single fragment-position parameter.
    pub fn write_main_param(&mut self, param: Word) -> BackendResult {
        write!(self.out, "half2 {}", Name(param))?;
        Ok(())
    }

    /// Close the signature and open the body.
    pub fn write_body_start(&mut self) -> BackendResult {
        writeln!(self.out, ") {{")?;
        Ok(())
    }

    /// Close the body.
    pub fn write_body_end(&mut self) -> BackendResult {
        writeln!(self.out, "}}")?;
        Ok(())
    }

    /// `const float iN = <value>;`
    pub fn write_scalar_constant(&mut self, result: Word, value: f32) -> BackendResult {
        writeln!(
            self.out,
            "{}const float {} = {};",
            INDENT,
            Name(result),
            value
        )?;
        Ok(())
    }

    /// `const vec<K>iN = vec<K>(iA, iB, …);`
    ///
    /// The missing space after the type is load-bearing: downstream golden
    /// files expect this exact spelling.
    pub fn write_vector_constant(&mut self, result: Word, components: &[Word]) -> BackendResult {
        let size = components.len();
        write!(
            self.out,
            "{}const vec{}{} = vec{}(",
            INDENT,
            size,
            Name(result),
            size
        )?;
        self.write_arguments(components)?;
        writeln!(self.out, ");")?;
        Ok(())
    }

    /// `<type> iN = -iA;`
    pub fn write_negate(&mut self, ty: &str, result: Word, value: Word) -> BackendResult {
        writeln!(
            self.out,
            "{}{} {} = -{};",
            INDENT,
            ty,
            Name(result),
            Name(value)
        )?;
        Ok(())
    }

    /// `<type> iN = iA<op>iB;`
    pub fn write_binary(
        &mut self,
        ty: &str,
        result: Word,
        left: Word,
        op: char,
        right: Word,
    ) -> BackendResult {
        writeln!(
            self.out,
            "{}{} {} = {}{}{};",
            INDENT,
            ty,
            Name(result),
            Name(left),
            op,
            Name(right)
        )?;
        Ok(())
    }

    /// `<type> iN = <function>(iA, iB, …);`
    pub fn write_call(
        &mut self,
        ty: &str,
        result: Word,
        function: &str,
        arguments: &[Word],
    ) -> BackendResult {
        write!(self.out, "{}{} {} = {}(", INDENT, ty, Name(result), function)?;
        self.write_arguments(arguments)?;
        writeln!(self.out, ");")?;
        Ok(())
    }

    /// `<type> iN = <type>(iA, iB, …);`
    pub fn write_construct(&mut self, ty: &str, result: Word, components: &[Word]) -> BackendResult {
        self.write_call(ty, result, ty, components)
    }

    /// `return half4(iR);`
    pub fn write_return(&mut self, value: Word) -> BackendResult {
        writeln!(self.out, "{}return half4({});", INDENT, Name(value))?;
        Ok(())
    }

    pub fn finish(self) -> W {
        self.out
    }

    fn write_arguments(&mut self, arguments: &[Word]) -> BackendResult {
        for (index, &argument) in arguments.iter().enumerate() {
            if index != 0 {
                write!(self.out, ", ")?;
            }
            write!(self.out, "{}", Name(argument))?;
        }
        Ok(())
    }
}
