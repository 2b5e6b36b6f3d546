//! # incdeps
//!
//! Include-dependency analysis for large C and C++ codebases.
//!
//! incdeps reconstructs a component dependency graph from textual `#include`
//! directives: a tolerant byte-level scanner extracts directives without a
//! compiler front end, a suffix lookup table resolves include strings to
//! concrete files despite ambiguity and generated outputs, and the resulting
//! component graph is classified into public/private edges and checked for
//! circular dependencies.
//!
//! It is not a preprocessor: no macro expansion, no `#ifdef` evaluation. The
//! scanner is a best-effort lexical pass over raw bytes.

pub mod config;
pub mod core;
pub mod report;
