//! Record types produced by a crawl

use serde::{Deserialize, Serialize};

/// The text harvested from one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRecord {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub content: String,
}

impl TextRecord {
    /// Returns true if the content contains `keyword`, ignoring case
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        contains_ignore_case(&self.content, keyword)
    }
}

/// An image reference, with OCR text when OCR was requested
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub image_url: String,

    /// `None` when OCR was not requested; empty when recognition failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
}

/// Everything harvested from one successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    pub description: String,
    pub text: String,
    pub images: Vec<ImageEntry>,
    pub videos: Vec<String>,
}

/// Result categories, in export order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Text,
    Images,
    Videos,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Text, Category::Images, Category::Videos];

    /// Section name used by the exporters
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Images => "images",
            Self::Videos => "videos",
        }
    }
}

/// A single entry appended to the result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultEntry {
    Text(TextRecord),
    Image(ImageEntry),
    Video(String),
}

/// Aggregated crawl output, partitioned by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub text: Vec<TextRecord>,
    #[serde(default)]
    pub images: Vec<ImageEntry>,
    #[serde(default)]
    pub videos: Vec<String>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry to the sequence matching its category
    pub fn push(&mut self, entry: ResultEntry) {
        match entry {
            ResultEntry::Text(record) => self.text.push(record),
            ResultEntry::Image(image) => self.images.push(image),
            ResultEntry::Video(url) => self.videos.push(url),
        }
    }

    /// Number of entries in one category
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Text => self.text.len(),
            Category::Images => self.images.len(),
            Category::Videos => self.videos.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.images.is_empty() && self.videos.is_empty()
    }

    /// Text records passing an optional keyword filter
    pub fn text_matching<'a>(
        &'a self,
        keyword: Option<&'a str>,
    ) -> impl Iterator<Item = &'a TextRecord> + 'a {
        self.text
            .iter()
            .filter(move |record| keyword.map_or(true, |k| record.matches_keyword(k)))
    }
}

/// Case-insensitive substring test; an empty needle always matches
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}
