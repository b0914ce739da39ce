//! Protocol module for the PC download link.
//!
//! This module contains the implementations for:
//! - Download stream construction and parsing
//! - CSV export of downloaded tests

pub mod download;

pub use download::{encode_dump, parse_dump, records_to_csv, ASCII_OFFSET, CSV_HEADER};
