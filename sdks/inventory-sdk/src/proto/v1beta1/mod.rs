//! `kessel.inventory.v1beta1`: typed resources and relationships.

pub mod relationships;
pub mod resources;
