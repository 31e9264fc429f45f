use super::TreeTransform;
use crate::tree::{Node, visit_elements_mut};

/// Rewrites root-relative `img` sources (`/assets/a.png`) to absolute URLs
/// under a fixed base. Absolute, protocol-relative and relative URLs are
/// left alone, so running the stage twice changes nothing.
#[derive(Debug, Clone)]
pub struct RewriteImageUrls {
    base: String,
}

impl RewriteImageUrls {
    /// Creates the stage; a trailing `/` on `base` is ignored.
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    fn rewrite(&self, src: &str) -> Option<String> {
        if src.starts_with('/') && !src.starts_with("//") {
            Some(format!("{}{}", self.base, src))
        } else {
            None
        }
    }
}

impl TreeTransform for RewriteImageUrls {
    fn transform(&self, root: &mut Node) {
        visit_elements_mut(root, &mut |el| {
            if el.tag_name != "img" {
                return;
            }
            let Some(src) = el.property("src").filter(|s| !s.is_empty()) else {
                log::debug!("Skipping image without a URL");
                return;
            };
            if let Some(absolute) = self.rewrite(src) {
                el.set_property("src", absolute);
            }
        });
    }
}
