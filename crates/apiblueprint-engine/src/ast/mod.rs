//! # AST Model
//!
//! The typed domain tree produced by the section parser:
//! Blueprint → resource group (a category element) → Resource → Action →
//! TransactionExample → Payload → {headers, body, schema, attributes}.
//!
//! Type definitions of data structures and attributes live in [`mson`].
//!
//! Every entity that is built from markdown nodes carries a `source_map`: the
//! union of the spans of every node consumed to build it.

pub mod blueprint;
pub mod mson;

pub use blueprint::{
    Action, Asset, AssetRole, Blueprint, Category, CategoryKind, CopyText, Element, ElementClass,
    KeyValue, Parameter, ParameterUse, Payload, PayloadKind, Reference, Resource,
    TransactionExample,
};
pub use mson::DataStructure;
