//! Buffered writer for raw provider payloads.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use uuid::Uuid;

use crate::kernel::{BaseRawStore, DirectoryHandle};

pub const PAYLOAD_EXTENSION: &str = "json";
pub const SETTINGS_OBJECT_NAME: &str = "_settings";

/// Accumulates payloads for one directory and writes each as its own object.
///
/// Object names are fresh v4 UUIDs, so two flushes never collide. A flush
/// that fails halfway leaves the objects already written in place.
pub struct ResultSink {
    store: Arc<dyn BaseRawStore>,
    directory: String,
    buffer: Vec<String>,
    objects_written: usize,
    flushes: usize,
}

impl ResultSink {
    pub fn new(store: Arc<dyn BaseRawStore>, directory: impl Into<String>) -> Self {
        Self {
            store,
            directory: directory.into(),
            buffer: Vec::new(),
            objects_written: 0,
            flushes: 0,
        }
    }

    pub fn push(&mut self, payload: String) {
        self.buffer.push(payload);
    }

    pub fn extend(&mut self, payloads: impl IntoIterator<Item = String>) {
        self.buffer.extend(payloads);
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Write every buffered payload, then clear the buffer.
    ///
    /// Returns the number of objects written. An empty buffer is a no-op and
    /// does not touch the store.
    pub async fn flush(&mut self) -> Result<usize> {
        if self.buffer.is_empty() {
            return Ok(0);
        }

        let handle = self.directory_handle().await?;
        let payloads = std::mem::take(&mut self.buffer);
        let count = payloads.len();

        for payload in &payloads {
            let name = Uuid::new_v4().to_string();
            self.store
                .upload_raw_data(&handle, payload, &name, PAYLOAD_EXTENSION)
                .await
                .with_context(|| format!("Failed to upload {} to {}", name, handle.path))?;
            self.objects_written += 1;
        }
        self.flushes += 1;

        tracing::debug!(
            directory = %handle.path,
            objects = count,
            "Flushed raw payloads"
        );
        Ok(count)
    }

    /// Persist the run's request as `_settings.json`.
    pub async fn save_settings<T: Serialize + ?Sized>(&self, settings: &T) -> Result<()> {
        let json = serde_json::to_string(settings).context("Failed to serialize call settings")?;
        let handle = self.directory_handle().await?;

        self.store
            .upload_raw_data(&handle, &json, SETTINGS_OBJECT_NAME, PAYLOAD_EXTENSION)
            .await
            .with_context(|| format!("Failed to write call settings to {}", handle.path))
    }

    pub fn objects_written(&self) -> usize {
        self.objects_written
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }

    async fn directory_handle(&self) -> Result<DirectoryHandle> {
        self.store
            .create_or_get_directory(&self.directory)
            .await
            .with_context(|| format!("Failed to open raw directory {}", self.directory))
    }
}
