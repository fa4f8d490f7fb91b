//! sheetsync - two-way sync between a JSON translation catalog and Google Sheets
//!
//! This crate provides the core functionality for the `sheetsync` CLI tool.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Data types (`TranslationRecord`, `Catalog`, `RowKey`)
//! - [`sheets`] - Google Sheets transport and authentication
//! - [`sync`] - Diff engine, mutation translator, upload/download
//! - [`catalog`] - Record-level list/add/delete/reset
//! - [`config`] - Configuration management
//! - [`validate`] - Input validation for command-line records
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod sheets;
pub mod sync;
pub mod validate;

pub use error::{Error, Result};
