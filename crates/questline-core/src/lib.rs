pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod doctor;
pub mod flow;
pub mod gates;
pub mod gateway;
pub mod media;
pub mod screen;
pub mod time;
