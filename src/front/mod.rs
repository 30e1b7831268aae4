/*!
Frontend parsers that consume binary shader formats and drive the SkSL
backend.
!*/

pub mod spv;
