pub mod capture_provider;
pub mod classifier;
pub mod scan_delegate;
