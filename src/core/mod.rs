// src/core/mod.rs

pub mod html;
#[cfg(feature = "live")]
pub mod net;
pub mod sanitize;
