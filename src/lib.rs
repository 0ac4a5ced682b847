//! syndoc: grammar notation reader with EBNF and railroad-diagram projections
//!
//! Layers:
//! - [`domain`]: syntax tree, notation reader, text and diagram projections
//! - [`application`]: rule document service
//! - [`infrastructure`]: filesystem boundary and service wiring
//! - [`cli`]: command line surface

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
