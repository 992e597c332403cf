// Common types shared between the kernel and domain layers

pub mod webhook;

pub use webhook::{WebhookPayload, WebhookStatus};
