// src/lib.rs
pub mod display;
pub mod error;
pub mod lab;
pub mod search;
