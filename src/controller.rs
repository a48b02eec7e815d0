//! Read/write orchestration against a paired accessory bridge
//!
//! Each public operation performs at most one read and one write call
//! to the accessory client, sequentially. All local computation is
//! pure; failures at the network boundary propagate without retries.

use tracing::{debug, info};

use crate::client::{AccessoryClient, WriteEntry};
use crate::error::{Result, SkylightError};
use crate::extract::extract;
use crate::model::{SetStatus, Status, WindowMapping, MAX_POSITION};
use crate::selection::WindowSelection;

/// Reads sensor/window status and reconciles window positions
pub struct Controller {
    client: Box<dyn AccessoryClient>,
    mappings: Vec<WindowMapping>,
}

impl Controller {
    pub fn new(client: Box<dyn AccessoryClient>, mappings: Vec<WindowMapping>) -> Self {
        Self { client, mappings }
    }

    /// Read current sensor values and the positions of selected windows.
    ///
    /// Windows keep extraction order, which follows the bridge's
    /// accessory/service enumeration order.
    pub async fn read_status(&self, selection: &WindowSelection) -> Result<Status> {
        let accessories = self
            .client
            .accessories()
            .await
            .map_err(|e| SkylightError::connection(format!("fetch accessories: {e}")))?;

        let (reading, all_windows) = extract(&accessories, &self.mappings);

        let total = all_windows.len();
        let windows: Vec<_> = all_windows
            .into_iter()
            .filter(|window| selection.matches(window))
            .collect();
        debug!(total, matched = windows.len(), "selection filter applied");

        Ok(Status { reading, windows })
    }

    /// Move selected windows to `position`, skipping windows already
    /// targeting it.
    ///
    /// All needed writes go out as one batched request, so a
    /// multi-window command is a single round trip. On write failure
    /// the returned error carries the computed classification; the
    /// mutation outcome is unknown in that case. Success reflects
    /// intent only, no verification read-back is performed.
    pub async fn set_position(
        &self,
        selection: &WindowSelection,
        position: u8,
    ) -> Result<SetStatus> {
        if position > MAX_POSITION {
            return Err(SkylightError::invalid_input(format!(
                "out of range position: {position}"
            )));
        }

        let status = self.read_status(selection).await?;

        let mut set_status = SetStatus::default();
        let mut writes = Vec::new();

        for window in status.windows {
            if window.target_position == position {
                set_status.unmodified.push(window);
                continue;
            }

            writes.push(WriteEntry {
                aid: window.accessory_id,
                iid: window.target_position_iid,
                value: serde_json::json!(position),
            });
            set_status.modified.push(window);
        }

        if !writes.is_empty() {
            info!(
                windows = writes.len(),
                position, "issuing batched position write"
            );

            if let Err(e) = self.client.write_characteristics(writes).await {
                return Err(SkylightError::Write {
                    status: set_status,
                    source: Box::new(e),
                });
            }
        }

        Ok(set_status)
    }
}
