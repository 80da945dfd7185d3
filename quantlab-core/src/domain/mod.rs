//! Domain types for quantlab.

pub mod bar;

pub use bar::{Bar, BarSeries};
