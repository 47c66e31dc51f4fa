//! Product image resolution.
//!
//! The `images` column predates this codebase and holds either a single URL
//! or a JSON array of URLs serialized to a string. [`ProductImages`] parses it
//! once when a product is loaded, so rendering code never has to guess.
//!
//! ```
//! use jozoor_core::{ProductImages, PLACEHOLDER_IMAGE};
//!
//! let gallery = ProductImages::parse(Some(r#"["/a.jpg", "/b.jpg"]"#));
//! assert_eq!(gallery.resolve(), vec!["/a.jpg", "/b.jpg"]);
//!
//! let single = ProductImages::parse(Some("/honey.jpg"));
//! assert_eq!(single.resolve(), vec!["/honey.jpg"]);
//!
//! let missing = ProductImages::parse(None);
//! assert_eq!(missing.resolve(), vec![PLACEHOLDER_IMAGE]);
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Image shown when a product has no usable image.
pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder.jpg";

/// The images attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProductImages {
    /// No usable image; renders as the placeholder.
    #[default]
    None,
    /// A single image URL.
    Single(String),
    /// An ordered gallery of one or more image URLs.
    Gallery(Vec<String>),
}

impl ProductImages {
    /// Parse a raw stored image field. Never fails.
    ///
    /// A JSON array keeps its non-blank string entries in order. Anything that
    /// is not JSON is treated as a plain URL.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::None;
        };

        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(entries)) => Self::from_urls(
                entries
                    .into_iter()
                    .filter_map(|entry| match entry {
                        Value::String(url) => Some(url),
                        _ => None,
                    })
                    .collect(),
            )
            .into_gallery(),
            Ok(Value::String(url)) => Self::from_urls(vec![url]),
            _ => Self::from_urls(vec![raw.to_owned()]),
        }
    }

    /// Build from a list of URLs, dropping blank entries.
    ///
    /// A list holding only the placeholder is `None`, which is how `None` is
    /// stored.
    #[must_use]
    pub fn from_urls(urls: Vec<String>) -> Self {
        let mut urls: Vec<String> = urls
            .into_iter()
            .map(|url| url.trim().to_owned())
            .filter(|url| !url.is_empty())
            .collect();

        if urls.iter().all(|url| url == PLACEHOLDER_IMAGE) {
            return Self::None;
        }

        match urls.len() {
            0 => Self::None,
            1 => urls.pop().map_or(Self::None, Self::Single),
            _ => Self::Gallery(urls),
        }
    }

    /// A JSON array always stays a gallery, even with one entry, so that
    /// `to_stored` writes back the same shape it read.
    fn into_gallery(self) -> Self {
        match self {
            Self::Single(url) => Self::Gallery(vec![url]),
            other => other,
        }
    }

    /// Ordered, non-empty list of displayable URLs.
    #[must_use]
    pub fn resolve(&self) -> Vec<String> {
        match self {
            Self::None => vec![PLACEHOLDER_IMAGE.to_owned()],
            Self::Single(url) => vec![url.clone()],
            Self::Gallery(urls) => urls.clone(),
        }
    }

    /// The first displayable URL, used for cards and cart lines.
    #[must_use]
    pub fn primary(&self) -> &str {
        match self {
            Self::None => PLACEHOLDER_IMAGE,
            Self::Single(url) => url,
            Self::Gallery(urls) => urls.first().map_or(PLACEHOLDER_IMAGE, String::as_str),
        }
    }

    /// Number of real (non-placeholder) images.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Single(_) => 1,
            Self::Gallery(urls) => urls.len(),
        }
    }

    /// Whether the product has no real image.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The real image URLs, without the placeholder.
    #[must_use]
    pub fn urls(&self) -> &[String] {
        match self {
            Self::None => &[],
            Self::Single(url) => std::slice::from_ref(url),
            Self::Gallery(urls) => urls,
        }
    }

    /// Serialize for the database column.
    #[must_use]
    pub fn to_stored(&self) -> String {
        match self {
            Self::None => PLACEHOLDER_IMAGE.to_owned(),
            Self::Single(url) => url.clone(),
            Self::Gallery(urls) => {
                serde_json::to_string(urls).unwrap_or_else(|_| PLACEHOLDER_IMAGE.to_owned())
            }
        }
    }
}

/// Serializes as the resolved URL list, so API clients always get an array.
impl Serialize for ProductImages {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.resolve().serialize(serializer)
    }
}

/// Accepts either a string (single URL or JSON-encoded array) or an array.
impl<'de> Deserialize<'de> for ProductImages {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            List(Vec<String>),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None => Self::None,
            Some(Raw::Text(text)) => Self::parse(Some(&text)),
            Some(Raw::List(urls)) => Self::from_urls(urls),
        })
    }
}
