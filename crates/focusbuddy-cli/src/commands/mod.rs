pub mod config;
pub mod note;
pub mod settings;
pub mod site;
pub mod stats;
pub mod task;
pub mod theme;
pub mod timer;
