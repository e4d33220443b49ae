pub extern crate nalgebra as na;

pub mod api;
pub mod config;
pub mod focus;
pub mod origin;
pub mod propagator;
pub mod proxy;
pub mod scheduler;
pub mod source;
pub mod store;
