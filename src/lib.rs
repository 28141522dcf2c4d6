//! Poincaré portraits of the Sitnikov problem: a sample file reader, a
//! scatter viewer built on egui, and the integrator that produces the data.

pub mod app;
pub mod config;
pub mod data;
pub mod label;
pub mod sitnikov;
pub mod state;
pub mod ui;
