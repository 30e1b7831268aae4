/*!
Backend for [SkSL], the shading language consumed by the Skia renderer.

The writer is an append-only text sink. The frontend calls one `write_*`
method per event in stream order, and the accumulated text is taken with
[`Writer::finish`] once the module has been fully consumed. Nothing is
ever rewritten or reordered, so the emitted source mirrors the SPIR-V
dataflow one statement per instruction.

[SkSL]: https://skia.org/docs/user/sksl/
!*/

mod writer;

use thiserror::Error;

pub use writer::Writer;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    FmtError(#[from] std::fmt::Error),
}
