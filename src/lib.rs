//! Deed Scribe - Guided Deed Interview Engine
//!
//! This crate implements the step/transition engine that drives a branching
//! interview collecting the parties, property facts, and supporting
//! certificates needed to assemble a property conveyance deed.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
