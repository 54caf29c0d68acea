// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The site content document.
//!
//! Every struct is `#[serde(default)]`: a document fetched from a store that
//! lacks a field or a whole section still deserializes to the complete shape,
//! with empty strings and empty lists where data was missing.

use serde::{Deserialize, Serialize};

/// All editable site content, stored remotely as one JSON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentDocument {
    pub hero: Hero,
    pub about: About,
    pub services: Services,
    pub gallery: Gallery,
    pub contact: Contact,
    pub navbar: Navbar,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Hero {
    pub title: String,
    pub subtitle: String,
    pub background_image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct About {
    pub title: String,
    pub subtitle: String,
    pub text1: String,
    pub text2: String,
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Services {
    pub title: String,
    pub items: Vec<ServiceItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceItem {
    pub id: u64,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gallery {
    pub title: String,
    pub subtitle: String,
    pub images: Vec<GalleryImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryImage {
    pub id: u64,
    pub url: String,
    pub caption: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub title: String,
    pub subtitle: String,
    pub address: String,
    pub phone: String,
    pub hours: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Navbar {
    pub company_name: String,
    pub phone: String,
}

impl ContentDocument {
    /// Parse a document from its JSON bytes.
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Serialize with two-space indentation, the layout the site repository
    /// keeps `content.json` in.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_deserialize_empty() {
        let doc: ContentDocument =
            serde_json::from_str(r#"{"hero": {"title": "Hi"}, "services": {"items": [{"id": 4}]}}"#)
                .expect("parse");
        assert_eq!(doc.hero.title, "Hi");
        assert_eq!(doc.hero.background_image, "");
        assert_eq!(doc.navbar, Navbar::default());
        assert_eq!(doc.services.items.len(), 1);
        assert_eq!(doc.services.items[0].id, 4);
        assert_eq!(doc.services.items[0].title, "");
    }

    #[test]
    fn uses_camel_case_keys() {
        let mut doc = ContentDocument::default();
        doc.hero.background_image = "bg.jpg".to_string();
        doc.navbar.company_name = "Acme".to_string();
        let json = doc.to_pretty_json().expect("serialize");
        assert!(json.contains("\"backgroundImage\": \"bg.jpg\""));
        assert!(json.contains("\"companyName\": \"Acme\""));
        assert!(json.contains("\"text1\""));
    }
}
