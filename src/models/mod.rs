// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod cuisine;
pub mod picker;

pub use cuisine::*;
pub use picker::*;
