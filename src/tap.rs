//! Main module for TAP library functionality

pub mod ast;
pub mod builder;
pub mod error;
pub mod lexer;
pub mod merge;
pub mod parser;
pub mod validator;
