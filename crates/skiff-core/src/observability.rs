//! Tracing targets used across the crate.

pub const TRACING_TARGET_PROCESS: &str = "skiff_core::process";
pub const TRACING_TARGET_TRANSFER: &str = "skiff_core::transfer";
pub const TRACING_TARGET_DISCOVERY: &str = "skiff_core::discovery";
pub const TRACING_TARGET_RETRIEVE: &str = "skiff_core::retrieve";
