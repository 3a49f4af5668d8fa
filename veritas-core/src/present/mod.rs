pub mod presenter;

pub use presenter::{present, DisplayModel, ReportErrorView, ReportView};
