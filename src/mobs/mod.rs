//! Mob types and categories.
//!
//! - [`mobtype`] – the immutable type descriptor
//! - [`category`] – the category trait, the shared registry behavior and the
//!   manager resource
//! - one module per concrete category

pub mod category;
pub mod drop;
pub mod interactable;
pub mod leader;
pub mod mobtype;
pub mod pikmin;
pub mod resource;
pub mod scale;
pub mod tool;
pub mod track;
