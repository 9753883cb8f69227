//! Configure and build argument derivation.
//!
//! [`ToolchainConfigurator`] turns a [`BuildContext`] into the argument lists
//! handed to CMake. The output is a pure function of the context and the
//! architecture table: the same inputs always yield the same sequence.

pub mod generator;

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::consts::NINJA_GENERATOR;
use crate::context::env::parse_arch_flags;
use crate::context::{BuildContext, CompilerFamily};
use crate::error::ConfigError;
use crate::platform::ArchMap;

pub use generator::Generator;

/// Ordered arguments for one configure invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GeneratorArgs(Vec<String>);

impl GeneratorArgs {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, arg: impl Into<String>) {
    self.0.push(arg.into());
  }

  pub fn extend<I, S>(&mut self, args: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.0.extend(args.into_iter().map(Into::into));
  }

  pub fn as_slice(&self) -> &[String] {
    &self.0
  }

  pub fn iter(&self) -> impl Iterator<Item = &String> {
    self.0.iter()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn into_vec(self) -> Vec<String> {
    self.0
  }
}

impl fmt::Display for GeneratorArgs {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.join(" "))
  }
}

/// Derives configure, build and install arguments for one build context.
#[derive(Debug, Clone, Copy)]
pub struct ToolchainConfigurator<'a> {
  context: &'a BuildContext,
  arch_map: &'a ArchMap,
}

impl<'a> ToolchainConfigurator<'a> {
  pub fn new(context: &'a BuildContext, arch_map: &'a ArchMap) -> Self {
    Self { context, arch_map }
  }

  /// The generator implied by the context's compiler family and overrides.
  pub fn generator(&self) -> Generator {
    Generator::new(self.context.overrides.generator.as_deref(), self.context.compiler)
  }

  /// Configure arguments shared by the dependency and the target.
  pub fn common_args(&self) -> Result<GeneratorArgs, ConfigError> {
    let ctx = self.context;
    let generator = self.generator();
    let mut args = GeneratorArgs::new();

    args.push(format!("-DPYTHON_EXECUTABLE={}", ctx.interpreter.display()));
    // Ignored by multi-config generators.
    args.push(format!("-DCMAKE_BUILD_TYPE={}", ctx.build_type));

    args.extend(ctx.overrides.extra_args.iter().cloned());

    match ctx.compiler {
      CompilerFamily::Default => {
        if generator.prefers_ninja() {
          match &ctx.ninja {
            Some(ninja) => {
              args.push(format!("-G{}", NINJA_GENERATOR));
              args.push(format!("-DCMAKE_MAKE_PROGRAM:FILEPATH={}", ninja.display()));
            }
            None => debug!("ninja not found, leaving generator choice to cmake"),
          }
        }
      }
      CompilerFamily::Msvc => {
        if let Some(selector) = self.arch_map.resolve(&ctx.platform, &generator)? {
          args.extend(selector);
        }
      }
    }

    if let Some(flags) = ctx.overrides.arch_flags.as_deref().filter(|_| ctx.os.supports_multi_arch()) {
      let archs = parse_arch_flags(flags)?;
      if !archs.is_empty() {
        args.push(format!("-DCMAKE_OSX_ARCHITECTURES={}", archs.join(";")));
      }
    }

    debug!(args = %args, "derived common configure arguments");
    Ok(args)
  }

  /// Arguments for `cmake --build`.
  ///
  /// `fallback_jobs` applies when the caller requested no job count. Neither is
  /// used when `CMAKE_BUILD_PARALLEL_LEVEL` is set, since the driver reads it.
  pub fn build_args(&self, fallback_jobs: Option<u32>) -> Vec<String> {
    let ctx = self.context;
    let mut args = self.config_args();

    if ctx.overrides.parallel_level.is_none() {
      if let Some(jobs) = ctx.jobs.or(fallback_jobs) {
        args.push(format!("-j{}", jobs));
      }
    }

    args
  }

  /// Arguments for `cmake --install`.
  pub fn install_args(&self) -> Vec<String> {
    self.config_args()
  }

  fn config_args(&self) -> Vec<String> {
    if self.generator().is_multi_config() {
      vec!["--config".to_string(), self.context.build_type.to_string()]
    } else {
      Vec::new()
    }
  }
}
