pub mod controller;

pub use controller::ScanSession;
