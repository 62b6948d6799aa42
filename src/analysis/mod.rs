// src/analysis/mod.rs
//! The three analysis engines: concordance statistics, tag-quality
//! detectors, and scenario anti-pattern detectors. All of them are pure
//! functions of the feature graph plus configuration.

pub mod antipattern;
pub mod concordance;
pub mod tag_quality;
