/*! Translate SPIR-V shader expressions into [SkSL] source text.

[SkSL] is the shading language consumed by the Skia renderer at runtime.
This crate takes a SPIR-V binary module that encodes a single pure shader
expression (one exported function of type `vec4(vec2)`, no control flow,
no memory access) and emits the equivalent SkSL fragment entry point:

```text
half4 main(half2 i2) {
  const float i7 = 0.5;
  float i8 = i7+i7;
  return half4(i8);
}
```

The translation is a single streaming pass over the instruction words.
The [`front::spv`] frontend decodes the little-endian word stream,
validates it against a deliberately narrow subset of SPIR-V, and drives
the [`back::sksl`] writer, which appends one statement per value-producing
instruction, in instruction order. Anything outside the subset aborts the
pass with a diagnostic naming the offending instruction, and no partial
output is ever observable.

## Usage

```no_run
let module: &[u8] = &[];
let mut transpiler = spirv_to_sksl::Transpiler::new();
let outcome = transpiler.transpile(module);
if outcome.status == spirv_to_sksl::Status::Success {
    println!("{}", transpiler.sksl());
} else {
    eprintln!("rejected: {}", outcome.message);
}
```

Callers that prefer `Result` plumbing over status codes can use
[`front::spv::parse_u8_slice`] directly.

[SkSL]: https://skia.org/docs/user/sksl/
!*/

#![forbid(unsafe_code)]

pub mod back;
pub mod front;

pub use front::spv::Error;

/// Classification of a [`Transpiler::transpile`] call.
///
/// The discriminants are stable across implementations of the translator
/// and can be handed over an FFI boundary as plain integers.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// Transpilation completed and the SkSL buffer holds the output.
    Success = 0,
    /// The backing binary decoder could not be constructed.
    ///
    /// Retained for status-code stability. The hand-written decoder in
    /// this crate has no fallible construction, so this value is never
    /// produced here.
    FailedToInitialize = 1,
    /// The input bytes are malformed at the framing level.
    InvalidData = 2,
    /// Validation or lowering rejected the module.
    Failure = 3,
}

/// Outcome of a [`Transpiler::transpile`] call.
#[derive(Clone, Debug)]
pub struct Outcome {
    pub status: Status,
    /// Human-readable reason, prefixed with the offending SPIR-V opcode
    /// where one exists. Empty on success.
    pub message: String,
}

/// SPIR-V to SkSL transpiler.
///
/// Owns the SkSL buffer populated by [`transpile`]. The intended
/// discipline is one instance per input: create, transpile, extract the
/// SkSL, discard.
///
/// [`transpile`]: Transpiler::transpile
#[derive(Debug, Default)]
pub struct Transpiler {
    sksl: String,
}

impl Transpiler {
    pub fn new() -> Self {
        Transpiler {
            sksl: String::new(),
        }
    }

    /// Consume a SPIR-V module and populate the SkSL buffer.
    ///
    /// On any non-[`Status::Success`] outcome the buffer is emptied
    /// before the diagnostic is returned, so partial output never leaks.
    pub fn transpile(&mut self, data: &[u8]) -> Outcome {
        match front::spv::parse_u8_slice(data) {
            Ok(output) => {
                self.sksl = output;
                Outcome {
                    status: Status::Success,
                    message: String::new(),
                }
            }
            Err(error) => {
                self.sksl.clear();
                Outcome {
                    status: error.status(),
                    message: error.to_string(),
                }
            }
        }
    }

    /// The accumulated SkSL source. Empty unless the last call succeeded.
    pub fn sksl(&self) -> &str {
        &self.sksl
    }
}
