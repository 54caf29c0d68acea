// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("Unknown field '{field}' in section {section}")]
    UnknownField { section: String, field: String },

    #[error("Invalid list index '{index}' in {path}")]
    InvalidIndex { path: String, index: String },

    #[error("Field path {0} has the wrong number of segments")]
    Depth(String),

    #[error("No element at position {index} of {list} (length {len})")]
    IndexOutOfRange {
        list: &'static str,
        index: usize,
        len: usize,
    },

    #[error("No {0} id left: the list already holds the largest possible id")]
    IdsExhausted(&'static str),
}

pub type Result<T> = std::result::Result<T, PathError>;
