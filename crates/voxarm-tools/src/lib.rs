//! `voxarm-tools` – the action surface exposed to the inference backend.
//!
//! Tools are declared statically: each one implements the [`Tool`] trait
//! with a typed parameter table, and is registered in a [`ToolRegistry`]
//! at startup.  The registry derives the machine-readable catalog the
//! model sees, and resolves tool calls back to handlers at dispatch time.
//!
//! # Modules
//!
//! - [`registry`] – [`Tool`], [`ParamSpec`], and the insertion-ordered
//!   [`ToolRegistry`] with its catalog builder.
//! - [`robot`] – the manipulator tool set wrapping `voxarm-hal`, plus the
//!   reserved [`SHUTDOWN_TOOL`][robot::SHUTDOWN_TOOL] termination tool.

pub mod registry;
pub mod robot;

pub use registry::{ParamKind, ParamSpec, Tool, ToolRegistry};
pub use robot::{RobotToolset, DEFAULT_SHUTDOWN_REASON, SHUTDOWN_TOOL};
