//! Product image gallery.

use theme_commerce::catalog::Variant;

/// Gallery images and which one is shown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Gallery {
    images: Vec<String>,
    selected: usize,
}

impl Gallery {
    pub fn new(images: Vec<String>) -> Self {
        Self {
            images,
            selected: 0,
        }
    }

    /// Show thumbnail `index`. Out-of-range indexes change nothing.
    pub fn select(&mut self, index: usize) -> Option<&str> {
        if index >= self.images.len() {
            return None;
        }
        self.selected = index;
        self.current()
    }

    /// Show the variant's featured image, when the gallery has it.
    /// Returns whether the shown image changed.
    pub fn show_variant(&mut self, variant: &Variant) -> bool {
        let Some(src) = variant.featured_image.as_deref() else {
            return false;
        };
        match self.images.iter().position(|image| image == src) {
            Some(index) if index != self.selected => {
                self.selected = index;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.images.get(self.selected).map(String::as_str)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
