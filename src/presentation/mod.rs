//! Presentation layer: text reports.

pub mod report;

pub use report::{ReportRenderer, render_events};
