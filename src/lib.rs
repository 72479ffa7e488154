//! Packstage - native package staging and build pipeline
//!
//! This library stages source files into the layout a native package
//! format expects, renders the control documents from package metadata,
//! runs the platform's build tool and delivers the finished artifact.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - The packaging pipeline and its building blocks
//! - [`infra`] - Infrastructure layer (filesystem, processes)
//! - [`config`] - Recipe parsing, constants and defaults
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;
