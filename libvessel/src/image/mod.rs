//! Image listing.
//!
//! [`ImageService`] is the narrow seam the command layer lists images
//! through. Two implementations exist, one per engine mode:
//! [`LocalImageStore`] reads the engine's storage directly and
//! [`TunnelImageService`] asks a remote engine over its REST API.

mod local;
mod tunnel;

pub use local::LocalImageStore;
pub use tunnel::TunnelImageService;

use crate::error::{Result, VesselError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio_util::sync::CancellationToken;

#[cfg(test)]
mod tests;

/// Repository or tag shown for untagged images.
pub const NONE_LABEL: &str = "<none>";

/// One row of an image listing: a single repository/tag pair of an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSummary {
    /// Full image id, including the `sha256:` prefix
    pub id: String,
    pub repository: String,
    pub tag: String,
    /// Manifest digest, when the image was pulled from a registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    pub created: DateTime<Utc>,
    /// Size in bytes
    pub size: u64,
    /// Intermediate build layer; hidden unless all images are requested
    #[serde(default)]
    pub intermediate: bool,
}

impl ImageSummary {
    /// Whether the image has no repository or tag.
    pub fn is_dangling(&self) -> bool {
        self.repository == NONE_LABEL && self.tag == NONE_LABEL
    }

    /// The id without its algorithm prefix, shortened to 12 characters.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use libvessel::image::ImageSummary;
    ///
    /// let image = ImageSummary {
    ///     id: "sha256:0123456789abcdef0123".to_string(),
    ///     repository: "alpine".to_string(),
    ///     tag: "3.19".to_string(),
    ///     digest: None,
    ///     created: Utc::now(),
    ///     size: 0,
    ///     intermediate: false,
    /// };
    /// assert_eq!(image.short_id(), "0123456789ab");
    /// ```
    pub fn short_id(&self) -> &str {
        let hex = self.full_id();
        hex.get(..12).unwrap_or(hex)
    }

    /// The id without its algorithm prefix.
    pub fn full_id(&self) -> &str {
        self.id
            .split_once(':')
            .map(|(_, hex)| hex)
            .unwrap_or(&self.id)
    }

    /// `repository:tag`
    pub fn reference(&self) -> String {
        format!("{}:{}", self.repository, self.tag)
    }
}

/// Splits a `name:tag` reference into repository and tag.
///
/// A colon before the last `/` belongs to a registry port, not a tag.
pub(crate) fn split_reference(name: &str) -> (String, String) {
    let name = name.split('@').next().unwrap_or(name);
    let last_slash = name.rfind('/').map(|i| i + 1).unwrap_or(0);

    match name[last_slash..].rfind(':') {
        Some(colon) => {
            let colon = last_slash + colon;
            (name[..colon].to_string(), name[colon + 1..].to_string())
        }
        None => (name.to_string(), "latest".to_string()),
    }
}

/// A listing filter given as `key=value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageFilter {
    /// `reference=<pattern>`, `*` matching any run of characters
    Reference(String),
    /// `dangling=true|false`
    Dangling(bool),
}

impl ImageFilter {
    /// Parses a `key=value` filter.
    ///
    /// # Examples
    ///
    /// ```
    /// use libvessel::image::ImageFilter;
    ///
    /// let filter = ImageFilter::parse("dangling=true").unwrap();
    /// assert_eq!(filter, ImageFilter::Dangling(true));
    /// assert!(ImageFilter::parse("label=x").is_err());
    /// ```
    pub fn parse(filter: &str) -> Result<Self> {
        let (key, value) = filter.split_once('=').ok_or_else(|| {
            VesselError::validation(format!("invalid filter {:?}: expected key=value", filter))
        })?;

        match key.trim() {
            "reference" if !value.is_empty() => Ok(Self::Reference(value.to_string())),
            "dangling" => match crate::engine::parse_switch(value) {
                Some(dangling) => Ok(Self::Dangling(dangling)),
                None => Err(VesselError::validation(format!(
                    "invalid dangling filter value {:?}",
                    value
                ))),
            },
            _ => Err(VesselError::validation(format!(
                "invalid filter {:?}",
                filter
            ))),
        }
    }

    /// Key of the filter as the engine API names it.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Reference(_) => "reference",
            Self::Dangling(_) => "dangling",
        }
    }

    /// Value of the filter as the engine API expects it.
    pub fn value(&self) -> String {
        match self {
            Self::Reference(pattern) => pattern.clone(),
            Self::Dangling(dangling) => dangling.to_string(),
        }
    }

    /// Whether `image` passes this filter.
    pub fn matches(&self, image: &ImageSummary) -> bool {
        match self {
            Self::Dangling(dangling) => image.is_dangling() == *dangling,
            Self::Reference(pattern) => {
                if image.is_dangling() {
                    return false;
                }
                let short_repo = image
                    .repository
                    .rsplit('/')
                    .next()
                    .unwrap_or(&image.repository);
                let short_reference = format!("{}:{}", short_repo, image.tag);

                [
                    image.reference().as_str(),
                    image.repository.as_str(),
                    short_reference.as_str(),
                    short_repo,
                ]
                .iter()
                .any(|candidate| wildcard_match(pattern, candidate))
            }
        }
    }
}

impl fmt::Display for ImageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key(), self.value())
    }
}

/// Matches `text` against `pattern`, where `*` stands for any run of characters.
fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p, t));
            p += 1;
        } else if p < pattern.len() && pattern[p] == text[t] {
            p += 1;
            t += 1;
        } else if let Some((star, matched)) = backtrack {
            p = star + 1;
            t = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|c| *c == '*')
}

/// Options for listing images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageListOptions {
    /// Include intermediate images
    pub all: bool,
    /// Every filter must match
    pub filters: Vec<ImageFilter>,
}

impl ImageListOptions {
    /// Whether `image` should be listed.
    pub fn accepts(&self, image: &ImageSummary) -> bool {
        (self.all || !image.intermediate) && self.filters.iter().all(|f| f.matches(image))
    }
}

/// Lists images known to an engine.
pub trait ImageService: Send + Sync {
    fn list(
        &self,
        cancel: &CancellationToken,
        options: &ImageListOptions,
    ) -> Result<Vec<ImageSummary>>;
}
