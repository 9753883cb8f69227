use stagbuild_lib::consts::{CMAKE_PROGRAM, INTERPRETER_CANDIDATES, NINJA_PROGRAM};
use stagbuild_lib::context::{CompilerFamily, PathProbe, ToolProbe};
use stagbuild_lib::platform::Platform;

use crate::output::{print_stat, print_warning};

pub fn cmd_info() {
  println!("System:");
  match Platform::current() {
    Some(platform) => {
      print_stat("Platform", &platform.tag());
      print_stat("OS", platform.os.as_str());
      print_stat("Arch", platform.arch.as_str());
    }
    None => print_warning("Could not detect platform."),
  }
  print_stat("Compiler", CompilerFamily::host().as_str());

  println!();
  println!("Tools:");
  let probe = PathProbe;
  let python = INTERPRETER_CANDIDATES.iter().find_map(|name| probe.find(name));
  for (label, path) in [
    ("cmake", probe.find(CMAKE_PROGRAM)),
    ("ninja", probe.find(NINJA_PROGRAM)),
    ("python", python),
  ] {
    let value = path.map_or_else(|| "not found".to_string(), |p| p.display().to_string());
    print_stat(label, &value);
  }
}
