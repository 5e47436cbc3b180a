//! Preview resources for the currently selected query image.
//!
//! A [`PreviewResource`] is a renderable URL tied to one input. File inputs
//! get a `blob:preview/<uuid>` URL backed by bytes held in the
//! [`PreviewRegistry`]; URL inputs reference the pasted URL as-is. Either way
//! the resource is registered while alive, so leaks and double previews are
//! observable through [`PreviewRegistry::live_count`].
//!
//! Release is tied to ownership: [`PreviewResource::release`] consumes the
//! handle and dropping an unreleased handle releases it, so a resource can be
//! neither released twice nor referenced after release.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use product_search_client::types::ImageFile;
use tracing::{debug, trace};
use uuid::Uuid;

/// URL scheme prefix of file-backed previews.
pub const BLOB_PREFIX: &str = "blob:preview/";

/// What a live preview URL renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewSource {
    /// In-memory image bytes of a selected file.
    Blob {
        name: String,
        mime: String,
        bytes: Arc<[u8]>,
    },
    /// A remote image referenced directly, never fetched by the client.
    Remote(String),
}

/// Shared table of live previews.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    live: Arc<Mutex<HashMap<Uuid, PreviewSource>>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the bytes of `file` and returns a blob preview for them.
    pub fn create_for_file(&self, file: &ImageFile) -> PreviewResource {
        let id = Uuid::new_v4();
        let url = format!("{BLOB_PREFIX}{id}");
        let source = PreviewSource::Blob {
            name: file.name.clone(),
            mime: file.mime.clone(),
            bytes: Arc::from(file.bytes.as_slice()),
        };
        self.register(id, url, source)
    }

    /// Returns a preview that renders `url` directly.
    pub fn create_for_url(&self, url: &str) -> PreviewResource {
        let id = Uuid::new_v4();
        self.register(id, url.to_string(), PreviewSource::Remote(url.to_string()))
    }

    /// Number of previews created and not yet released.
    pub fn live_count(&self) -> usize {
        self.table().len()
    }

    /// Looks up what a preview URL renders, if it is still alive.
    pub fn resolve(&self, preview: &PreviewResource) -> Option<PreviewSource> {
        self.table().get(&preview.id).cloned()
    }

    fn register(&self, id: Uuid, url: String, source: PreviewSource) -> PreviewResource {
        self.table().insert(id, source);
        debug!(%id, %url, "preview created");
        PreviewResource {
            id,
            url,
            registry: self.clone(),
            released: false,
        }
    }

    fn revoke(&self, id: Uuid) {
        if self.table().remove(&id).is_some() {
            trace!(%id, "preview released");
        }
    }

    fn table(&self) -> MutexGuard<'_, HashMap<Uuid, PreviewSource>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Owning handle to one live preview.
#[derive(Debug)]
pub struct PreviewResource {
    id: Uuid,
    url: String,
    registry: PreviewRegistry,
    released: bool,
}

impl PreviewResource {
    /// Renderable URL of this preview.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// True for previews backed by a selected file.
    pub fn is_blob(&self) -> bool {
        self.url.starts_with(BLOB_PREFIX)
    }

    /// Frees the preview. Consumes the handle.
    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if !self.released {
            self.released = true;
            self.registry.revoke(self.id);
        }
    }
}

impl Drop for PreviewResource {
    fn drop(&mut self) {
        self.release_once();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_preview_resolves_until_released() {
        let registry = PreviewRegistry::new();
        let file = ImageFile::new("lamp.jpg", vec![0xff, 0xd8, 0xff]);

        let preview = registry.create_for_file(&file);
        assert!(preview.is_blob());
        assert_eq!(registry.live_count(), 1);
        match registry.resolve(&preview) {
            Some(PreviewSource::Blob { mime, bytes, .. }) => {
                assert_eq!(mime, "image/jpeg");
                assert_eq!(&*bytes, &[0xffu8, 0xd8, 0xff][..]);
            }
            other => panic!("unexpected source: {other:?}"),
        }

        preview.release();
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn url_preview_references_url_as_is() {
        let registry = PreviewRegistry::new();
        let preview = registry.create_for_url("https://cdn.example.com/a.png");
        assert_eq!(preview.url(), "https://cdn.example.com/a.png");
        assert!(!preview.is_blob());
        assert_eq!(
            registry.resolve(&preview),
            Some(PreviewSource::Remote("https://cdn.example.com/a.png".into()))
        );
    }

    #[test]
    fn dropping_a_handle_releases_it() {
        let registry = PreviewRegistry::new();
        {
            let _a = registry.create_for_url("https://x/1.png");
            let _b = registry.create_for_file(&ImageFile::new("b.png", vec![1]));
            assert_eq!(registry.live_count(), 2);
        }
        assert_eq!(registry.live_count(), 0);
    }
}
