// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod content;
pub mod image;
pub mod leads;
pub mod lists;

pub use content::{fields_command, get_command, set_command, show_command};
pub use image::{ImageSource, image_command};
pub use leads::{
    leads_delete_command, leads_list_command, leads_status_command, leads_submit_command,
    leads_summary_command,
};
pub use lists::{DEFAULT_CAPTION, GalleryAction, ServiceAction, gallery_command, service_command};
