//! Camera capability check.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::models::PermissionStatus;

/// Default video device probed by [`CameraPolicy::Probe`]
pub const DEFAULT_CAMERA_DEVICE: &str = "/dev/video0";

/// How the startup permission check resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CameraPolicy {
    /// Always granted
    #[default]
    Granted,
    /// Always denied
    Denied,
    /// Granted if the camera device node exists
    Probe,
}

/// Run the one-shot capability check.
pub async fn request_permission(policy: CameraPolicy, device: PathBuf) -> PermissionStatus {
    let status = match policy {
        CameraPolicy::Granted => PermissionStatus::Granted,
        CameraPolicy::Denied => PermissionStatus::Denied,
        CameraPolicy::Probe => probe_device(&device).await,
    };
    info!(?policy, ?status, "camera permission resolved");
    status
}

async fn probe_device(device: &Path) -> PermissionStatus {
    match tokio::fs::try_exists(device).await {
        Ok(true) => PermissionStatus::Granted,
        Ok(false) => PermissionStatus::Denied,
        Err(e) => {
            warn!(device = %device.display(), error = %e, "camera probe failed");
            PermissionStatus::Denied
        }
    }
}
