// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Typed addressing of leaf fields in a [`ContentDocument`].
//!
//! A [`FieldPath`] names one string leaf: a section, a field within it, and
//! for the two lists a position. The dotted form used by the admin surface
//! (`"services"`, `"items.0.title"`) is accepted by [`FieldPath::parse`] and
//! produced by `Display` (`services.items.0.title`).

use crate::document::ContentDocument;
use crate::error::{PathError, Result};
use std::fmt;
use std::str::FromStr;

macro_rules! field_keys {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $key:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The JSON key of this field.
            #[must_use]
            pub fn key(self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }

            #[must_use]
            pub fn from_key(key: &str) -> Option<Self> {
                match key {
                    $($key => Some($name::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

field_keys!(
    /// Top-level sections of the document.
    Section {
        Hero => "hero",
        About => "about",
        Services => "services",
        Gallery => "gallery",
        Contact => "contact",
        Navbar => "navbar",
    }
);

field_keys!(HeroField {
    Title => "title",
    Subtitle => "subtitle",
    BackgroundImage => "backgroundImage",
});

field_keys!(AboutField {
    Title => "title",
    Subtitle => "subtitle",
    Text1 => "text1",
    Text2 => "text2",
    Image => "image",
});

field_keys!(ServiceItemField {
    Title => "title",
    Description => "description",
});

field_keys!(GalleryImageField {
    Url => "url",
    Caption => "caption",
});

field_keys!(ContactField {
    Title => "title",
    Subtitle => "subtitle",
    Address => "address",
    Phone => "phone",
    Hours => "hours",
});

field_keys!(NavbarField {
    CompanyName => "companyName",
    Phone => "phone",
});

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Section {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self> {
        Section::from_key(s).ok_or_else(|| PathError::UnknownSection(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServicesField {
    Title,
    /// `items.<position>.<field>`
    Item(usize, ServiceItemField),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GalleryField {
    Title,
    Subtitle,
    /// `images.<position>.<field>`
    Image(usize, GalleryImageField),
}

/// One string leaf of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Hero(HeroField),
    About(AboutField),
    Services(ServicesField),
    Gallery(GalleryField),
    Contact(ContactField),
    Navbar(NavbarField),
}

impl FieldPath {
    /// Parse the `(section, dotted field)` pair used by the admin surface.
    ///
    /// Plain keys are accepted for every section; `services` and `gallery`
    /// additionally accept exactly one list step, `items.<n>.<key>` and
    /// `images.<n>.<key>`.
    pub fn parse(section: &str, field: &str) -> Result<Self> {
        let section: Section = section.parse()?;
        let segments: Vec<&str> = field.split('.').collect();
        let unknown = || PathError::UnknownField {
            section: section.to_string(),
            field: field.to_string(),
        };
        let index = |raw: &str| {
            raw.parse::<usize>().map_err(|_| PathError::InvalidIndex {
                path: format!("{section}.{field}"),
                index: raw.to_string(),
            })
        };

        let path = match (section, segments.as_slice()) {
            (Section::Hero, [key]) => FieldPath::Hero(HeroField::from_key(key).ok_or_else(unknown)?),
            (Section::About, [key]) => {
                FieldPath::About(AboutField::from_key(key).ok_or_else(unknown)?)
            }
            (Section::Services, ["title"]) => FieldPath::Services(ServicesField::Title),
            (Section::Services, ["items", position, key]) => {
                let position = index(*position)?;
                let key = ServiceItemField::from_key(key).ok_or_else(unknown)?;
                FieldPath::Services(ServicesField::Item(position, key))
            }
            (Section::Gallery, ["title"]) => FieldPath::Gallery(GalleryField::Title),
            (Section::Gallery, ["subtitle"]) => FieldPath::Gallery(GalleryField::Subtitle),
            (Section::Gallery, ["images", position, key]) => {
                let position = index(*position)?;
                let key = GalleryImageField::from_key(key).ok_or_else(unknown)?;
                FieldPath::Gallery(GalleryField::Image(position, key))
            }
            (Section::Contact, [key]) => {
                FieldPath::Contact(ContactField::from_key(key).ok_or_else(unknown)?)
            }
            (Section::Navbar, [key]) => {
                FieldPath::Navbar(NavbarField::from_key(key).ok_or_else(unknown)?)
            }
            (_, [_]) | (Section::Services | Section::Gallery, [_, _, _]) => return Err(unknown()),
            _ => return Err(PathError::Depth(format!("{section}.{field}"))),
        };
        Ok(path)
    }

    /// Parse the fully dotted form, `section.field...`.
    pub fn parse_dotted(dotted: &str) -> Result<Self> {
        match dotted.split_once('.') {
            Some((section, field)) => Self::parse(section, field),
            None => Err(PathError::Depth(dotted.to_string())),
        }
    }

    #[must_use]
    pub fn section(&self) -> Section {
        match self {
            FieldPath::Hero(_) => Section::Hero,
            FieldPath::About(_) => Section::About,
            FieldPath::Services(_) => Section::Services,
            FieldPath::Gallery(_) => Section::Gallery,
            FieldPath::Contact(_) => Section::Contact,
            FieldPath::Navbar(_) => Section::Navbar,
        }
    }

    /// The field part of the dotted form, e.g. `items.0.title`.
    #[must_use]
    pub fn field(&self) -> String {
        match *self {
            FieldPath::Hero(f) => f.key().to_string(),
            FieldPath::About(f) => f.key().to_string(),
            FieldPath::Services(ServicesField::Title) => "title".to_string(),
            FieldPath::Services(ServicesField::Item(i, f)) => format!("items.{i}.{}", f.key()),
            FieldPath::Gallery(GalleryField::Title) => "title".to_string(),
            FieldPath::Gallery(GalleryField::Subtitle) => "subtitle".to_string(),
            FieldPath::Gallery(GalleryField::Image(i, f)) => format!("images.{i}.{}", f.key()),
            FieldPath::Contact(f) => f.key().to_string(),
            FieldPath::Navbar(f) => f.key().to_string(),
        }
    }

    /// The list and position this path steps into, if any.
    #[must_use]
    pub fn list_position(&self) -> Option<(&'static str, usize)> {
        match *self {
            FieldPath::Services(ServicesField::Item(i, _)) => Some(("services.items", i)),
            FieldPath::Gallery(GalleryField::Image(i, _)) => Some(("gallery.images", i)),
            _ => None,
        }
    }

    /// Every leaf path present in `doc`, in document order.
    #[must_use]
    pub fn all(doc: &ContentDocument) -> Vec<FieldPath> {
        let mut paths = Vec::new();
        paths.extend(HeroField::ALL.iter().map(|f| FieldPath::Hero(*f)));
        paths.extend(AboutField::ALL.iter().map(|f| FieldPath::About(*f)));
        paths.push(FieldPath::Services(ServicesField::Title));
        for i in 0..doc.services.items.len() {
            paths.extend(
                ServiceItemField::ALL
                    .iter()
                    .map(|f| FieldPath::Services(ServicesField::Item(i, *f))),
            );
        }
        paths.push(FieldPath::Gallery(GalleryField::Title));
        paths.push(FieldPath::Gallery(GalleryField::Subtitle));
        for i in 0..doc.gallery.images.len() {
            paths.extend(
                GalleryImageField::ALL
                    .iter()
                    .map(|f| FieldPath::Gallery(GalleryField::Image(i, *f))),
            );
        }
        paths.extend(ContactField::ALL.iter().map(|f| FieldPath::Contact(*f)));
        paths.extend(NavbarField::ALL.iter().map(|f| FieldPath::Navbar(*f)));
        paths
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.field())
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_dotted(s)
    }
}

// Shared by the shared and exclusive lookups below; `$get` is `get` or
// `get_mut` and the optional `mut` turns every `&` into `&mut`.
macro_rules! locate {
    ($doc:expr, $path:expr, $get:ident $(, $m:tt)?) => {
        match *$path {
            FieldPath::Hero(field) => Some(match field {
                HeroField::Title => &$($m)? $doc.hero.title,
                HeroField::Subtitle => &$($m)? $doc.hero.subtitle,
                HeroField::BackgroundImage => &$($m)? $doc.hero.background_image,
            }),
            FieldPath::About(field) => Some(match field {
                AboutField::Title => &$($m)? $doc.about.title,
                AboutField::Subtitle => &$($m)? $doc.about.subtitle,
                AboutField::Text1 => &$($m)? $doc.about.text1,
                AboutField::Text2 => &$($m)? $doc.about.text2,
                AboutField::Image => &$($m)? $doc.about.image,
            }),
            FieldPath::Services(ServicesField::Title) => Some(&$($m)? $doc.services.title),
            FieldPath::Services(ServicesField::Item(position, field)) => {
                $doc.services.items.$get(position).map(|item| match field {
                    ServiceItemField::Title => &$($m)? item.title,
                    ServiceItemField::Description => &$($m)? item.description,
                })
            }
            FieldPath::Gallery(GalleryField::Title) => Some(&$($m)? $doc.gallery.title),
            FieldPath::Gallery(GalleryField::Subtitle) => Some(&$($m)? $doc.gallery.subtitle),
            FieldPath::Gallery(GalleryField::Image(position, field)) => {
                $doc.gallery.images.$get(position).map(|image| match field {
                    GalleryImageField::Url => &$($m)? image.url,
                    GalleryImageField::Caption => &$($m)? image.caption,
                })
            }
            FieldPath::Contact(field) => Some(match field {
                ContactField::Title => &$($m)? $doc.contact.title,
                ContactField::Subtitle => &$($m)? $doc.contact.subtitle,
                ContactField::Address => &$($m)? $doc.contact.address,
                ContactField::Phone => &$($m)? $doc.contact.phone,
                ContactField::Hours => &$($m)? $doc.contact.hours,
            }),
            FieldPath::Navbar(field) => Some(match field {
                NavbarField::CompanyName => &$($m)? $doc.navbar.company_name,
                NavbarField::Phone => &$($m)? $doc.navbar.phone,
            }),
        }
    };
}

/// The value at `path`, or `None` when the list position does not exist.
#[must_use]
pub fn resolve<'a>(doc: &'a ContentDocument, path: &FieldPath) -> Option<&'a str> {
    let slot: Option<&String> = locate!(doc, path, get);
    slot.map(String::as_str)
}

/// The value at `path`, or the empty string when it is missing.
#[must_use]
pub fn read<'a>(doc: &'a ContentDocument, path: &FieldPath) -> &'a str {
    resolve(doc, path).unwrap_or("")
}

/// The value at `path`, or `fallback` when it is missing or empty.
#[must_use]
pub fn read_or<'a>(doc: &'a ContentDocument, path: &FieldPath, fallback: &'a str) -> &'a str {
    match resolve(doc, path) {
        Some(value) if !value.is_empty() => value,
        _ => fallback,
    }
}

/// Lenient read for presentation code: any unparseable or missing path
/// reads as the empty string.
#[must_use]
pub fn read_dotted<'a>(doc: &'a ContentDocument, section: &str, field: &str) -> &'a str {
    FieldPath::parse(section, field).map_or("", |path| read(doc, &path))
}

/// Store `value` at `path`. List positions must already exist.
pub fn assign(doc: &mut ContentDocument, path: &FieldPath, value: impl Into<String>) -> Result<()> {
    let out_of_range = path.list_position().map(|(list, index)| {
        let len = match path.section() {
            Section::Services => doc.services.items.len(),
            _ => doc.gallery.images.len(),
        };
        PathError::IndexOutOfRange { list, index, len }
    });
    let slot: Option<&mut String> = locate!(doc, path, get_mut, mut);
    match slot {
        Some(slot) => {
            *slot = value.into();
            Ok(())
        }
        None => Err(out_of_range.unwrap_or_else(|| PathError::Depth(path.to_string()))),
    }
}
