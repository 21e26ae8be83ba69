//! # Serializer
//!
//! Wraps a [`Blueprint`](crate::ast::Blueprint) into a generic [`Value`]
//! tree: objects with ordered keys, arrays, strings, booleans and null.
//! [`Value`] implements `serde::Serialize`, so any serde format can render
//! it; key order is insertion order, which makes the output deterministic.

pub mod keys;
pub mod value;
pub mod wrap;

pub use value::{Object, Value};
pub use wrap::{
    wrap_action, wrap_asset, wrap_blueprint, wrap_data_structure, wrap_element, wrap_key_value,
    wrap_mson_element, wrap_mson_elements, wrap_parameter, wrap_payload, wrap_reference,
    wrap_resource, wrap_transaction_example, wrap_type_attributes, wrap_type_definition,
    wrap_type_name, wrap_type_sections, wrap_type_specification, wrap_value_definition,
};
