//! Mock implementations for testing
//!
//! This module provides a mock accessory client for exercising the
//! controller without a bridge.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::client::{
    characteristic_type, AccessoryClient, RawAccessory, WriteEntry,
};
use crate::error::{Result, SkylightError};

/// Mock accessory client serving canned accessories and recording writes.
///
/// Cloning yields a handle onto the same shared state, so tests can keep
/// one handle for assertions after boxing another into a controller.
#[derive(Clone, Default)]
pub struct MockAccessoryClient {
    accessories: Arc<RwLock<Vec<RawAccessory>>>,
    write_batches: Arc<Mutex<Vec<Vec<WriteEntry>>>>,
    apply_writes: Arc<RwLock<bool>>,
    fail_listing: Arc<RwLock<bool>>,
    fail_writes: Arc<RwLock<bool>>,
}

impl MockAccessoryClient {
    /// Create new mock client
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the accessories served by `accessories()`
    pub fn with_accessories(self, accessories: Vec<RawAccessory>) -> Self {
        Self {
            accessories: Arc::new(RwLock::new(accessories)),
            ..self
        }
    }

    /// Set accessories from an async context
    pub async fn set_accessories(&self, accessories: Vec<RawAccessory>) {
        *self.accessories.write().await = accessories;
    }

    /// Make successful writes update the stored accessory values, so a
    /// subsequent listing observes their effect
    pub async fn apply_writes(&self, enabled: bool) {
        *self.apply_writes.write().await = enabled;
    }

    /// Make `accessories()` fail
    pub async fn fail_listing(&self, enabled: bool) {
        *self.fail_listing.write().await = enabled;
    }

    /// Make `write_characteristics()` fail
    pub async fn fail_writes(&self, enabled: bool) {
        *self.fail_writes.write().await = enabled;
    }

    /// Write batches received so far, in call order
    pub async fn write_batches(&self) -> Vec<Vec<WriteEntry>> {
        self.write_batches.lock().await.clone()
    }

    async fn apply(&self, writes: &[WriteEntry]) {
        let mut accessories = self.accessories.write().await;

        for entry in writes {
            let Some(accessory) = accessories.iter_mut().find(|a| a.aid == entry.aid) else {
                continue;
            };

            for service in &mut accessory.services {
                let Some(index) = service
                    .characteristics
                    .iter()
                    .position(|c| c.iid == entry.iid)
                else {
                    continue;
                };

                service.characteristics[index].value = entry.value.clone();
                let wrote_target = service.characteristics[index].characteristic_type
                    == characteristic_type::TARGET_POSITION;

                // A target write also moves the current position, as a
                // settled motor would report it.
                if wrote_target {
                    if let Some(current) = service.characteristics.iter_mut().find(|c| {
                        c.characteristic_type == characteristic_type::CURRENT_POSITION
                    }) {
                        current.value = entry.value.clone();
                    }
                }
                break;
            }
        }
    }
}

#[async_trait]
impl AccessoryClient for MockAccessoryClient {
    async fn accessories(&self) -> Result<Vec<RawAccessory>> {
        if *self.fail_listing.read().await {
            return Err(SkylightError::connection("mock listing failure"));
        }

        Ok(self.accessories.read().await.clone())
    }

    async fn write_characteristics(&self, writes: Vec<WriteEntry>) -> Result<()> {
        if *self.fail_writes.read().await {
            return Err(SkylightError::connection("mock write failure"));
        }

        if *self.apply_writes.read().await {
            self.apply(&writes).await;
        }

        self.write_batches.lock().await.push(writes);
        Ok(())
    }
}
