#![warn(clippy::all, missing_docs)]

//! Core domain logic for the txplayers player export viewer.
//!
//! This crate hosts the record model, the JSON loader, the filter and
//! sort logic, the edit flow, and the CSV exporter. It has no terminal
//! dependencies so every operation can be exercised from unit tests;
//! the `txplayers-tui` crate is a thin presentation layer on top.

pub mod browse;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod models;
pub mod roster;
pub mod store;

pub use config::{AppConfig, EditMatch, SortBehavior};
pub use editor::{EditDraft, EditOutcome};
pub use error::{ConfigError, ExportError, LoadError};
pub use export::ExportOutcome;
pub use models::{Column, PlayerRecord, RecordId};
pub use roster::{Roster, SortDirection, SortState};
pub use store::PlayerStore;
