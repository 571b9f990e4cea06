//! Gazette - a small server-rendered news and personal notes site
//!
//! This library provides the core functionality for the Gazette site.

pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod web;

#[cfg(test)]
pub mod test_utils;
