//! Core business logic module
//!
//! This module contains the whole packaging pipeline. It performs file
//! I/O only through [`crate::infra`].
//!
//! # Submodules
//!
//! - [`metadata`] - Package metadata properties and author derivation
//! - [`sections`] - Named script/text sections with per-format fallbacks
//! - [`manifest`] - Copy-manifest computation from source selections
//! - [`checksum`] - Payload checksum records (MD5/SHA1)
//! - [`staging`] - Working-directory layout, cleanup and payload copying
//! - [`template`] - `${Token}` substitution over control-file templates
//! - [`format`] - Per-format layout, naming and builder command lines
//! - [`invoker`] - External builder invocation
//! - [`artifact`] - Built-artifact verification and delivery
//! - [`pipeline`] - Stage sequencing for one packaging run
//! - [`doctor`] - Native-tool availability checks

pub mod artifact;
pub mod checksum;
pub mod doctor;
pub mod format;
pub mod invoker;
pub mod manifest;
pub mod metadata;
pub mod pipeline;
pub mod sections;
pub mod staging;
pub mod template;
