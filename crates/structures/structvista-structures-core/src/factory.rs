use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::StructureConfig;
use crate::error::StructureError;
use crate::graph::Graph;
use crate::list::LinkedList;
use crate::traits::Structure;
use crate::tree::BinaryTree;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructureKind {
    LinkedList,
    BinaryTree,
    Graph,
}

impl StructureKind {
    pub const ALL: [StructureKind; 3] = [
        StructureKind::LinkedList,
        StructureKind::BinaryTree,
        StructureKind::Graph,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StructureKind::LinkedList => "linked-list",
            StructureKind::BinaryTree => "binary-tree",
            StructureKind::Graph => "graph",
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StructureKind {
    type Err = StructureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StructureKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| StructureError::UnknownKind(s.to_string()))
    }
}

/// Fresh, empty engine of the given kind.
pub fn create(kind: StructureKind, cfg: &StructureConfig) -> Box<dyn Structure> {
    log::debug!("factory: creating {}", kind);
    match kind {
        StructureKind::LinkedList => Box::new(LinkedList::new(cfg.clone())),
        StructureKind::BinaryTree => Box::new(BinaryTree::new(cfg.clone())),
        StructureKind::Graph => Box::new(Graph::new(cfg.clone())),
    }
}
