//! API Blueprint parser.
//!
//! Markdown goes in as a node tree ([`markdown`]), the section parser
//! ([`parsing`]) builds the typed [`ast`] and a [`report`] of diagnostics,
//! and [`serialize`] turns the AST into a generic value tree.

pub mod ast;
pub mod markdown;
pub mod parsing;
pub mod report;
pub mod serialize;
pub mod source_map;

pub use ast::Blueprint;
pub use parsing::{ParseOptions, ParseResult, parse, parse_blueprint};
pub use report::{Diagnostic, DiagnosticCode, Report, Severity};
pub use serialize::{Value, wrap_blueprint};
pub use source_map::{SourceMap, Span};
