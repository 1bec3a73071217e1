//! # Variant Filter Language - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for the variant filter
//! expression language: a small boolean/arithmetic language evaluated against
//! one variant record at a time to decide inclusion or exclusion.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (literals, field access, operations)
//! - **[operators]** - Operators and the static precedence table
//!
//! ## Core Concepts
//!
//! ### Field access
//!
//! A bare identifier refers to a record field. Multi-valued fields (one value
//! per sample or per annotation) are reached through indexed access:
//!
//! ```text
//! DP > 10                  // record-level field
//! GEN[0].DP > 10           // field of the first sample
//! GEN[ANY].DP > 10         // true if any sample satisfies the predicate
//! GEN[ALL].DP > 10         // true if every sample satisfies the predicate
//! ```
//!
//! ### Quantifiers
//!
//! `ANY`/`*` and `ALL`/`?` are wildcard indexes. Indexing with one causes the
//! smallest enclosing predicate to be evaluated once per element of the list
//! and reduced by OR (`ANY`) or AND (`ALL`).
//!
//! ### Set membership
//!
//! ```text
//! CHROM in SET['chr1', 'chr2', 'chrX']
//! ```
pub mod tokens;
pub mod expressions;
pub mod operators;

pub use tokens::{Token, TokenKind};
pub use expressions::{Expr, PathIndex, Quantifier};
pub use operators::{ArithOp, CmpOp, LogicOp, UnaryOp};
