// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! # Content: the editable site document
//!
//! One JSON document holds every editable string on the site: hero, about,
//! services, gallery, contact and navbar sections. This crate owns its typed
//! model, the built-in fallback copy, typed field paths with read/assign
//! helpers, and the id-keyed list records (services, gallery images).

pub mod address;
mod defaults;
mod document;
mod error;
pub mod lists;

pub use address::{FieldPath, Section, assign, read, read_dotted, read_or, resolve};
pub use document::{
    About, Contact, ContentDocument, Gallery, GalleryImage, Hero, Navbar, ServiceItem, Services,
};
pub use error::{PathError, Result};
pub use lists::{GalleryDraft, GalleryPatch, ListRecord, ServiceDraft, ServicePatch, next_id};
