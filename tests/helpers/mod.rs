//! Shared fixtures and assertion helpers.

#![allow(dead_code)]

pub mod config_fixtures;
pub mod lower_helpers;
