//! Implementation of the `stagbuild fetch` command.

use anyhow::Result;

use stagbuild_lib::dependency::HttpFetcher;
use stagbuild_lib::execute;

use super::BuildArgs;
use crate::output::print_success;

/// Download and extract the dependency without building anything.
pub fn cmd_fetch(args: &BuildArgs) -> Result<()> {
  let request = args.request()?;
  let fetcher = HttpFetcher::new()?;

  let source = execute::fetch_dependency(&request.dependency, &request.workspace(), &request.source_root, &fetcher)?;

  print_success(&format!(
    "Fetched {} {} into {}",
    request.dependency.name,
    request.dependency.version,
    source.display()
  ));
  Ok(())
}
