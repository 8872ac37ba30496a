//! # packrat Core Library
//!
//! This crate provides the core functionality for the `packrat` backup tool.
//!
//! It is designed to be used by the `packrat` command-line application, but its public API
//! can also be used to run backups programmatically: load a [`config::Config`],
//! flatten its `save` tree with [`tree::flatten`], and hand the result to a
//! [`saver::DataSaver`].
//!
//! ## Key Modules
//!
//! - [`config`]: Loads and validates the YAML backup configuration.
//! - [`tree`]: The declarative path tree and its flattening into a path list.
//! - [`saver`]: Stages the configured paths and swaps the archive in.
//! - [`archive`]: Builds zip and tar-family archives from a staged tree.

pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod saver;
pub mod tree;

pub use error::SaverError;
