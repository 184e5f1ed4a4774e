//! Values the structure engines attach to animation steps and sequences.

use std::fmt;

use serde::{Deserialize, Serialize};
use structvista_scene_core::VisualHandle;

/// Registry key of a connector: the ordered pair of endpoint values.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionKey {
    pub from: i64,
    pub to: i64,
}

impl ConnectionKey {
    #[inline]
    pub fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for ConnectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// What an operation achieved, reported when its sequence completes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Outcome {
    Inserted { value: i64 },
    Deleted { value: i64 },
    Searched { value: i64, found: bool },
    EdgeAdded { from: i64, to: i64 },
    EdgeRemoved { from: i64, to: i64 },
    /// `path` is `None` when `end` is unreachable from `start`.
    ShortestPath {
        start: i64,
        end: i64,
        path: Option<Vec<i64>>,
    },
}

impl Outcome {
    /// False for a failed search or an unreachable shortest path.
    pub fn is_success(&self) -> bool {
        match self {
            Outcome::Searched { found, .. } => *found,
            Outcome::ShortestPath { path, .. } => path.is_some(),
            _ => true,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Inserted { value } => write!(f, "inserted {value}"),
            Outcome::Deleted { value } => write!(f, "deleted {value}"),
            Outcome::Searched { value, found: true } => write!(f, "found {value}"),
            Outcome::Searched { value, found: false } => write!(f, "{value} not found"),
            Outcome::EdgeAdded { from, to } => write!(f, "added edge {from} -> {to}"),
            Outcome::EdgeRemoved { from, to } => write!(f, "removed edge {from} -> {to}"),
            Outcome::ShortestPath {
                path: Some(path), ..
            } => {
                let hops: Vec<String> = path.iter().map(i64::to_string).collect();
                write!(f, "shortest path: {}", hops.join(" -> "))
            }
            Outcome::ShortestPath {
                start,
                end,
                path: None,
            } => write!(f, "no path from {start} to {end}"),
        }
    }
}

/// Deferred work attached to a step or a sequence.
#[derive(Clone, Debug, PartialEq)]
pub enum Completion {
    /// The node's destroy step finished: drop its visual and registry entry.
    ReleaseNode { value: i64, handle: VisualHandle },
    /// The connector's disconnect step finished.
    ReleaseConnector {
        key: ConnectionKey,
        handle: VisualHandle,
    },
    /// The whole sequence finished. `relayout` asks the engine to reposition
    /// every surviving node and refresh connector endpoints.
    Finished { outcome: Outcome, relayout: bool },
}

impl Completion {
    pub fn finished(outcome: Outcome) -> Self {
        Completion::Finished {
            outcome,
            relayout: false,
        }
    }

    pub fn finished_with_relayout(outcome: Outcome) -> Self {
        Completion::Finished {
            outcome,
            relayout: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_formats_as_pair() {
        assert_eq!(ConnectionKey::new(3, -4).to_string(), "3--4");
        assert_eq!(ConnectionKey::new(10, 20).to_string(), "10-20");
    }

    #[test]
    fn outcome_messages() {
        let path = Outcome::ShortestPath {
            start: 1,
            end: 3,
            path: Some(vec![1, 2, 3]),
        };
        assert_eq!(path.to_string(), "shortest path: 1 -> 2 -> 3");
        assert!(path.is_success());

        let miss = Outcome::Searched {
            value: 20,
            found: false,
        };
        assert_eq!(miss.to_string(), "20 not found");
        assert!(!miss.is_success());
    }
}
