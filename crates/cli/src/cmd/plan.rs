//! Implementation of the `stagbuild plan` command.
//!
//! Derives the build context and prints every command a build would run,
//! without touching the network or running any tool.

use anyhow::Result;
use serde::Serialize;

use stagbuild_lib::context::{BuildContext, EnvOverrides, PathProbe};
use stagbuild_lib::execute::{self, BuildPlan};

use super::BuildArgs;
use crate::output::{OutputFormat, print_info, print_json, print_stat, symbols};

#[derive(Serialize)]
struct PlanOutput<'a> {
  context: &'a BuildContext,
  plan: &'a BuildPlan,
}

pub fn cmd_plan(args: &BuildArgs, format: OutputFormat) -> Result<()> {
  let request = args.request()?;
  let overrides = EnvOverrides::from_env()?;
  let (context, plan) = execute::prepare(&args.options(), overrides, &PathProbe, &request)?;

  if format.is_json() {
    return print_json(&PlanOutput {
      context: &context,
      plan: &plan,
    });
  }

  print_info(&format!("Plan for {} ({})", context.platform, context.build_type));
  print_stat("Compiler", context.compiler.as_str());
  print_stat("Install prefix", &context.install_prefix.display().to_string());
  print_stat("Interpreter", &context.interpreter.display().to_string());
  print_stat(
    "Dependency",
    &format!("{} {} from {}", plan.dependency.name, plan.dependency.version, plan.dependency.url),
  );
  print_stat("Output", &plan.workspace.output_dir.display().to_string());

  for planned in &plan.stages {
    println!();
    println!("{} {}", symbols::ARROW, planned.stage);
    println!("  cwd: {}", planned.command.cwd.display());
    println!("  {}", planned.command);
  }

  Ok(())
}
