// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Lead inbox for the site's contact form.
//!
//! Visitors submit [`ContactSubmission`]s through [`Inbox::submit`]; the
//! admin lists them, moves them through `new` → `contacted` → `resolved`
//! and deletes them. Storage sits behind [`LeadStore`].

mod error;
mod inbox;
mod lead;
mod store;

pub use error::{InboxError, Result};
pub use inbox::{Inbox, LeadSummary};
pub use lead::{ContactSubmission, Lead, LeadStatus};
pub use store::{FileLeadStore, LeadStore, MemoryLeadStore};
