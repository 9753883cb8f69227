//! Implementation of the `stagbuild build` command.
//!
//! Fetches the dependency, then runs every stage of the plan in order:
//! configure, build and install the dependency, then configure and build the
//! extension against it.

use anyhow::Result;
use tracing::info;

use stagbuild_lib::context::{EnvOverrides, PathProbe};
use stagbuild_lib::dependency::HttpFetcher;
use stagbuild_lib::execute::{self, OutputMode, ProcessInvoker};

use super::BuildArgs;
use crate::output::{format_elapsed, print_stat, print_step, print_success};

pub fn cmd_build(args: &BuildArgs, capture: bool) -> Result<()> {
  let request = args.request()?;
  let overrides = EnvOverrides::from_env()?;
  let (context, plan) = execute::prepare(&args.options(), overrides, &PathProbe, &request)?;

  info!(platform = %context.platform, build_type = %context.build_type, "build context derived");
  print_step(&format!(
    "Building {} for {} ({})",
    request.layout.package, context.platform, context.build_type
  ));

  let fetcher = HttpFetcher::new()?;
  let output = if capture { OutputMode::Capture } else { OutputMode::Inherit };
  let report = execute::run(&plan, &fetcher, &ProcessInvoker::new(output))?;

  println!();
  for result in &report.stages {
    print_stat(result.stage.as_str(), &format_elapsed(result.elapsed));
  }
  println!();
  print_success(&format!(
    "Built in {}, output in {}",
    format_elapsed(report.total_elapsed()),
    report.output_dir.display()
  ));

  Ok(())
}
