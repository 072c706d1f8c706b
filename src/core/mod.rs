// src/core/mod.rs

pub mod html;
pub mod parse;
pub mod sanitize;
