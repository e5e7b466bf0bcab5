use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Camera,
    Gallery,
}

impl ImageSource {
    pub(crate) fn denied_message(self) -> &'static str {
        match self {
            ImageSource::Camera => "НУЖЕН ДОСТУП К КАМЕРЕ",
            ImageSource::Gallery => "НУЖЕН ДОСТУП К ГАЛЕРЕЕ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Camera and gallery access, provided by whatever front-end hosts the core.
#[async_trait]
pub trait ImagePicker: Send + Sync {
    async fn request_permission(&self, source: ImageSource) -> PermissionStatus;

    /// `None` when the user backs out of the picker without choosing.
    async fn pick(&self, source: ImageSource) -> Option<String>;
}
