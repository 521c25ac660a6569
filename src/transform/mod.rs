//! # Transform expressions
//!
//! A small, sandboxed expression language for per-field scalar
//! transformations, replacing the dynamic-eval primitive a browser-side
//! mapper would use.
//!
//! ## Components
//!
//! * `ast` - Abstract syntax tree for the expression language
//! * `lexer` - Tokenizer for expression strings
//! * `parser` - Precedence-climbing parser producing an AST
//! * `interpreter` - Evaluates an AST against the extracted field value
//! * `builtins` - The built-in function registry
//!
//! ## Evaluation context
//!
//! Exactly two bindings are visible to an expression: `value`, the field
//! extracted by the current rule's source path, and `source`, the complete
//! source record for mappings that need sibling data. The interpreter has no
//! access to ambient state (no I/O, no environment) and enforces an
//! execution step budget; exceeding it is an evaluation failure, handled the
//! same way as any other failing expression.

pub mod ast;
pub mod builtins;
pub mod interpreter;
pub mod lexer;
pub mod parser;

pub use ast::{Expression, Operator, UnaryOperator};
pub use builtins::{builtin_functions, TransformFunction};
pub use interpreter::Interpreter;
pub use parser::parse_expression;
