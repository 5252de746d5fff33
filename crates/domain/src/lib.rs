#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod chart;
mod error;
mod exercise;
mod measure;
mod progress;
mod report;
mod selection;
mod service;
mod settings;
mod workout;

pub use chart::*;
pub use error::*;
pub use exercise::*;
pub use measure::*;
pub use progress::*;
pub use report::*;
pub use selection::*;
pub use service::*;
pub use settings::*;
pub use workout::*;
