//! Multi-criteria window selection

use serde::{Deserialize, Serialize};

use crate::model::{WindowInfo, WindowKind};

/// Matches windows by code, serial and kind.
///
/// Clauses combine as a conjunction; within a clause any listed value
/// matches. An empty list imposes no constraint, so the default
/// selection matches every window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindowSelection {
    pub codes: Vec<String>,
    pub serials: Vec<String>,
    pub kinds: Vec<WindowKind>,
}

impl WindowSelection {
    /// Check if the provided window matches the selection's attributes.
    ///
    /// Pure and free of side effects; safe to evaluate repeatedly over
    /// the same window collection.
    pub fn matches(&self, info: &WindowInfo) -> bool {
        self.code_match(info) && self.serial_match(info) && self.kind_match(info)
    }

    fn code_match(&self, info: &WindowInfo) -> bool {
        if self.codes.is_empty() {
            return true;
        }

        // A window without a mapping never satisfies a code clause.
        let Some(mapping) = &info.mapping else {
            return false;
        };

        self.codes.iter().any(|code| *code == mapping.code)
    }

    fn serial_match(&self, info: &WindowInfo) -> bool {
        if self.serials.is_empty() {
            return true;
        }

        self.serials.iter().any(|serial| *serial == info.serial_number)
    }

    fn kind_match(&self, info: &WindowInfo) -> bool {
        if self.kinds.is_empty() {
            return true;
        }

        self.kinds.contains(&info.kind)
    }
}
