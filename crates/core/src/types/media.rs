//! Media CDN URL helpers.
//!
//! Product images are hosted on Cloudinary, which transforms images through
//! URL path segments. These helpers are pure string functions so both the
//! storefront templates and the admin panel can use them.

/// Named image sizes used by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    /// Product cards in listings.
    Card,
    /// Main image on the product page.
    Gallery,
    /// Zoomed main image.
    Zoom,
    /// Gallery thumbnails and cart lines.
    Thumbnail,
}

impl ImageSize {
    /// Bounding box in pixels (width, height).
    #[must_use]
    pub const fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Card => (400, 400),
            Self::Gallery => (800, 800),
            Self::Zoom => (1200, 1200),
            Self::Thumbnail => (120, 120),
        }
    }

    /// Optimized URL for this size.
    #[must_use]
    pub fn apply(self, url: &str) -> String {
        let (width, height) = self.dimensions();
        optimize_image_url(url, width, height)
    }
}

const CDN_HOST: &str = "cloudinary.com";
const UPLOAD_SEGMENT: &str = "/upload/";

/// Insert a resize/auto-format transformation into a Cloudinary URL.
///
/// Non-Cloudinary URLs, and URLs without exactly one `/upload/` segment, are
/// returned unchanged.
///
/// ```
/// use jozoor_core::optimize_image_url;
///
/// assert_eq!(
///     optimize_image_url("https://res.cloudinary.com/demo/image/upload/v1/a.jpg", 800, 800),
///     "https://res.cloudinary.com/demo/image/upload/w_800,h_800,c_limit,q_auto,f_auto/v1/a.jpg"
/// );
/// assert_eq!(optimize_image_url("/images/placeholder.jpg", 800, 800), "/images/placeholder.jpg");
/// ```
#[must_use]
pub fn optimize_image_url(url: &str, width: u32, height: u32) -> String {
    if !url.contains(CDN_HOST) {
        return url.to_owned();
    }

    let mut parts = url.split(UPLOAD_SEGMENT);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(base), Some(rest), None) => {
            format!("{base}{UPLOAD_SEGMENT}w_{width},h_{height},c_limit,q_auto,f_auto/{rest}")
        }
        _ => url.to_owned(),
    }
}

/// Extract the `folder/name` public ID from a Cloudinary delivery URL.
///
/// Returns `None` when the URL has no folder and file segments.
///
/// ```
/// use jozoor_core::public_id_from_url;
///
/// assert_eq!(
///     public_id_from_url("https://res.cloudinary.com/demo/image/upload/v1712/jozoor/honey.jpg"),
///     Some("jozoor/honey".to_owned())
/// );
/// ```
#[must_use]
pub fn public_id_from_url(url: &str) -> Option<String> {
    let mut segments = url.trim_end_matches('/').rsplit('/');
    let file = segments.next().filter(|s| !s.is_empty())?;
    let folder = segments.next().filter(|s| !s.is_empty())?;

    let name = file.split('.').next().filter(|s| !s.is_empty())?;
    Some(format!("{folder}/{name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimize_leaves_local_urls_alone() {
        assert_eq!(
            optimize_image_url("https://example.com/upload/a.jpg", 120, 120),
            "https://example.com/upload/a.jpg"
        );
    }

    #[test]
    fn test_optimize_requires_single_upload_segment() {
        let url = "https://res.cloudinary.com/demo/image/upload/x/upload/a.jpg";
        assert_eq!(optimize_image_url(url, 120, 120), url);
    }

    #[test]
    fn test_image_size_apply() {
        assert_eq!(
            ImageSize::Thumbnail.apply("https://res.cloudinary.com/d/image/upload/a.png"),
            "https://res.cloudinary.com/d/image/upload/w_120,h_120,c_limit,q_auto,f_auto/a.png"
        );
    }

    #[test]
    fn test_public_id_without_folder() {
        assert_eq!(public_id_from_url("honey.jpg"), None);
        assert_eq!(public_id_from_url(""), None);
    }

    #[test]
    fn test_public_id_without_extension() {
        assert_eq!(
            public_id_from_url("https://res.cloudinary.com/d/image/upload/store/olive"),
            Some("store/olive".to_owned())
        );
    }
}
