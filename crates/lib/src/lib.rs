//! stagbuild-lib: build orchestration for the stag extension module
//!
//! This crate turns a build request into a sequence of CMake invocations:
//! - `context`: host, caller options and environment, resolved once
//! - `toolchain`: configure and build arguments for the chosen generator
//! - `dependency`: the pinned OpenCV archive and how to fetch it
//! - `execute`: the five-stage configure/build/install pipeline
//! - `package`: where the compiled module is placed

pub mod consts;
pub mod context;
pub mod dependency;
pub mod error;
pub mod execute;
pub mod package;
pub mod platform;
pub mod toolchain;
pub mod util;
pub mod workspace;

pub use error::ConfigError;
