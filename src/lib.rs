//! Growth Guide - Learner request analysis pipeline
//!
//! Reads what a learner asks for, estimates their capability, applies an
//! ethical gate and selects a teaching strategy, so that AI assistance
//! builds independent skill instead of replacing it.

pub mod adapters;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod ports;
