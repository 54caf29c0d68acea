// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The `site` command line: the admin surface for the site content and the
//! lead inbox.

pub mod commands;
pub mod common;
