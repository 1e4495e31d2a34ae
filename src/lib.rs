pub mod app;
pub mod audit;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod dialog;
pub mod editor;
pub mod errors;
pub mod generator;
pub mod model;
pub mod router;
