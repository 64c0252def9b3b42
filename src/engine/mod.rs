pub mod binning;
pub mod classify;
pub mod config;
pub mod controller;
pub mod layout;
pub mod scale;
