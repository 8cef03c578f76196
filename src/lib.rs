//! Meal and recipe recommendation engine
//!
//! Ranks a pre-scraped recipe corpus against a group's meal history using
//! weighted taste, cost, effort, healthiness and recency scores.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
