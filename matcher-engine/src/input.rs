//! Input manager: the mutually exclusive file / URL query input and its
//! preview.
//!
//! Every path that replaces or clears the input releases the previous
//! preview exactly once before anything new is created. At most one preview
//! is alive per manager.

use product_search_client::types::{ImageFile, SearchImage};
use tracing::debug;

use crate::preview::{PreviewRegistry, PreviewResource};

/// Which input currently drives the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    None,
    File,
    Url,
}

#[derive(Debug)]
pub struct InputManager {
    registry: PreviewRegistry,
    file: Option<ImageFile>,
    image_url: String,
    preview: Option<PreviewResource>,
}

impl InputManager {
    pub fn new(registry: PreviewRegistry) -> Self {
        Self {
            registry,
            file: None,
            image_url: String::new(),
            preview: None,
        }
    }

    pub fn mode(&self) -> InputMode {
        if self.file.is_some() {
            InputMode::File
        } else if !self.image_url.trim().is_empty() {
            InputMode::Url
        } else {
            InputMode::None
        }
    }

    pub fn file(&self) -> Option<&ImageFile> {
        self.file.as_ref()
    }

    /// URL text exactly as entered.
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn preview(&self) -> Option<&PreviewResource> {
        self.preview.as_ref()
    }

    /// Selects a file, or clears the selection with `None`.
    ///
    /// Selecting a file clears the URL and creates a blob preview. Clearing
    /// leaves no input and no preview.
    pub fn set_file(&mut self, file: Option<ImageFile>) {
        self.release_preview();
        self.image_url.clear();

        match file {
            Some(file) => {
                debug!(name = %file.name, bytes = file.bytes.len(), "query file selected");
                self.preview = Some(self.registry.create_for_file(&file));
                self.file = Some(file);
            }
            None => {
                debug!("query file cleared");
                self.file = None;
            }
        }
    }

    /// Stores URL text; clears any file.
    ///
    /// Non-blank text gets a preview that points at the trimmed URL.
    pub fn set_url(&mut self, text: impl Into<String>) {
        self.release_preview();
        self.file = None;
        self.image_url = text.into();

        let trimmed = self.image_url.trim();
        if !trimmed.is_empty() {
            self.preview = Some(self.registry.create_for_url(trimmed));
        }
        debug!(mode = ?self.mode(), "query url edited");
    }

    /// Drops file, URL and preview.
    pub fn clear(&mut self) {
        self.release_preview();
        self.file = None;
        self.image_url.clear();
    }

    /// The image source a request would carry, or `None` without usable input.
    pub fn descriptor(&self) -> Option<SearchImage> {
        match self.mode() {
            InputMode::File => self.file.clone().map(SearchImage::File),
            InputMode::Url => Some(SearchImage::Url(self.image_url.trim().to_string())),
            InputMode::None => None,
        }
    }

    fn release_preview(&mut self) {
        if let Some(preview) = self.preview.take() {
            preview.release();
        }
    }
}
