//! Core Module - Triage & Progression Logic
//!
//! Classifier, ledger, progression engine, link extraction, and the
//! scanner and wiretap workflows built on them.

pub mod classifier;
pub mod extraction;
pub mod ledger;
pub mod progression;
pub mod scanner;
pub mod wiretap;

pub use classifier::*;
pub use extraction::*;
pub use ledger::*;
pub use progression::*;
pub use scanner::*;
pub use wiretap::*;
