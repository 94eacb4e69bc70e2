//! # Analyzer Module
//!
//! Namespace analysis for kubectl-cleaner.

pub mod cleanup;
