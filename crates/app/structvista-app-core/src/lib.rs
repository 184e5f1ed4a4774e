//! structvista-app
//!
//! Host-facing surface of StructVista. A [`StructVistaApp`] owns the scene, the
//! selected structure engine and the playback engine. Hosts feed it
//! [`Command`]s (usually deserialised from JSON) and drive time with
//! [`StructVistaApp::tick`]; finished operations come back as [`AppEvent`]s.

pub mod app;
pub mod command;
pub mod config;
pub mod error;
pub mod script;

pub use crate::app::{AppEvent, AppSnapshot, StructVistaApp};
pub use crate::command::{Command, Status, StatusLevel};
pub use crate::config::AppConfig;
pub use crate::error::AppError;
pub use crate::script::{parse_commands, run_script, run_script_json, Script, ScriptReport};
