//! Restricted arithmetic expressions over a single variable `x`.
//!
//! Only numbers, `x`, `pi`, `e`, the operators `+ - * / ^`, parentheses,
//! `|…|` and the functions `sin cos tan sqrt log ln exp abs` are accepted.

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod token;

pub use error::{EvalErrorKind, EvalFailure};
pub use eval::{evaluate, Expression};
