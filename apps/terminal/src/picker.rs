use app_core::{ImagePicker, ImageSource, PermissionStatus};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

/// Picker fed from typed commands: the shell stages a uri, then the
/// controller asks for it. Nothing staged means the pick was cancelled.
pub struct ShellPicker {
    media_access: bool,
    staged: Mutex<Option<String>>,
}

impl ShellPicker {
    pub fn new(media_access: bool) -> Self {
        Self {
            media_access,
            staged: Mutex::new(None),
        }
    }

    pub async fn stage(&self, uri: Option<String>) {
        *self.staged.lock().await = uri;
    }
}

#[async_trait]
impl ImagePicker for ShellPicker {
    async fn request_permission(&self, source: ImageSource) -> PermissionStatus {
        debug!(?source, granted = self.media_access, "media permission requested");
        if self.media_access {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }

    async fn pick(&self, _source: ImageSource) -> Option<String> {
        self.staged.lock().await.take()
    }
}
