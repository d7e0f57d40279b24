//! Clinimetrics - Psychometric Assessment Scoring Engine
//!
//! This crate implements the scoring and validity-analysis pipeline for
//! standardized psychometric questionnaires: item-level responses plus a
//! scale's scoring rules go in, numeric scores, subscale breakdowns, and a
//! quantified response-validity judgment come out.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;
