pub mod element_set;
pub mod position;
pub mod prelude;
pub mod provenance;
