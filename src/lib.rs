pub mod classifier;
pub mod command;
pub mod csv_loader;
pub mod pose;
pub mod signature;
pub mod types;
pub mod window;
