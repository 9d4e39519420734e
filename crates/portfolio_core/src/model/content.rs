//! Renderable content descriptors.
//!
//! Content is data, not markup: each section maps to an ordered list of
//! blocks, and the renderer decides how a block looks.

use serde::{Deserialize, Serialize};

/// One renderable block inside a section body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Oversized display lines, used for the landing section name.
    Hero { lines: Vec<String> },
    /// Section heading.
    Heading { text: String },
    /// Secondary heading inside a section.
    Subheading { text: String },
    Paragraph { text: String },
    /// Muted meta line (location, dates, institution).
    Caption { text: String },
    BulletList { items: Vec<ListItem> },
    /// Titled group such as one job, project or affiliation.
    Entry {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        blocks: Vec<ContentBlock>,
    },
}

impl ContentBlock {
    pub fn heading(text: impl Into<String>) -> Self {
        Self::Heading { text: text.into() }
    }

    pub fn subheading(text: impl Into<String>) -> Self {
        Self::Subheading { text: text.into() }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph { text: text.into() }
    }

    pub fn caption(text: impl Into<String>) -> Self {
        Self::Caption { text: text.into() }
    }

    /// Builds a bullet list of plain items.
    pub fn bullets<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::BulletList {
            items: items.into_iter().map(ListItem::plain).collect(),
        }
    }
}

/// Bullet list item with an optional emphasized lead-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead: Option<String>,
    pub text: String,
}

impl ListItem {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            lead: None,
            text: text.into(),
        }
    }

    pub fn led(lead: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            lead: Some(lead.into()),
            text: text.into(),
        }
    }
}
