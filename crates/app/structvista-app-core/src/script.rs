//! JSON command scripts: a list of commands played back to back, each one
//! animated to the end before the next is dispatched.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use structvista_scene_core::SceneRenderer;

use crate::app::{AppEvent, StructVistaApp};
use crate::command::{Command, Status};
use crate::config::AppConfig;

/// `{ "config": { ... }, "commands": [ ... ] }`. Unknown top-level keys are
/// ignored so scripts can carry their own expectations.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub config: AppConfig,
    pub commands: Vec<Command>,
}

impl Script {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let script: Script = serde_json::from_str(json).context("failed to parse command script")?;
        script
            .config
            .validate()
            .context("invalid config in command script")?;
        Ok(script)
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ScriptReport {
    /// One status per command, in order.
    pub statuses: Vec<Status>,
    pub events: Vec<AppEvent>,
}

impl ScriptReport {
    /// Messages of every non-info status.
    pub fn problems(&self) -> Vec<&str> {
        self.statuses
            .iter()
            .filter(|s| !s.is_info())
            .map(|s| s.message.as_str())
            .collect()
    }
}

/// Parse a bare JSON array of commands.
pub fn parse_commands(json: &str) -> Result<Vec<Command>> {
    serde_json::from_str(json).context("failed to parse command list")
}

pub fn run_script<R: SceneRenderer>(
    app: &mut StructVistaApp<R>,
    commands: impl IntoIterator<Item = Command>,
) -> ScriptReport {
    let mut report = ScriptReport::default();
    for cmd in commands {
        report.statuses.push(app.handle(cmd));
        report.events.extend(app.run_until_idle());
    }
    report
}

/// Build an app from a script's config and run its commands.
pub fn run_script_json<R: SceneRenderer>(
    json: &str,
    scene: R,
) -> Result<(StructVistaApp<R>, ScriptReport)> {
    let script = Script::from_json_str(json)?;
    let mut app = StructVistaApp::with_config(script.config, scene);
    let report = run_script(&mut app, script.commands);
    Ok((app, report))
}
