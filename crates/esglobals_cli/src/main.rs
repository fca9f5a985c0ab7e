mod args;
mod output_paths;
mod types;

use std::{
  fs,
  path::{Path, PathBuf},
  process::ExitCode,
  time::Instant,
};

use ansi_term::Colour;
use anyhow::Context;
use args::{InputArgs, ModuleArgs, NamespaceArgs, OutputArgs};
use clap::Parser;

use esglobals::{BuildError, BuildResult, GlobalsError, GlobalsOptions, GlobalsTransformer};
use esglobals_utils::rayon::{
  IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator,
};
use types::source_kind::{SourceKind, source_type_for};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Commands {
  #[clap(flatten)]
  input: InputArgs,

  #[clap(flatten)]
  output: OutputArgs,

  #[clap(flatten)]
  namespace: NamespaceArgs,

  #[clap(flatten)]
  module: ModuleArgs,
}

struct FileOutput {
  code: String,
  wrapped: bool,
  warnings: Vec<GlobalsError>,
  written_to: Option<PathBuf>,
}

fn load_options(config: Option<&Path>, flags: GlobalsOptions) -> anyhow::Result<GlobalsOptions> {
  let Some(config) = config else {
    return Ok(flags);
  };
  let content = fs::read_to_string(config)
    .with_context(|| format!("Failed to read config `{}`", config.display()))?;
  let from_file: GlobalsOptions = serde_json::from_str(&content)
    .with_context(|| format!("Invalid config `{}`", config.display()))?;
  Ok(flags.or(from_file))
}

fn transform_file(
  transformer: &GlobalsTransformer,
  path: &Path,
  source_kind: Option<SourceKind>,
  out_path: Option<&Path>,
) -> BuildResult<FileOutput> {
  let source =
    fs::read_to_string(path).with_context(|| format!("Failed to read `{}`", path.display()))?;
  let ret = transformer.transform_source(source, source_type_for(path, source_kind))?;
  tracing::debug!(path = %path.display(), wrapped = ret.wrapped, "transformed");

  let written_to = match out_path {
    Some(out_path) => {
      out_path
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|()| fs::write(out_path, &ret.code))
        .with_context(|| format!("Failed to write `{}`", out_path.display()))?;
      Some(out_path.to_path_buf())
    }
    None => None,
  };

  Ok(FileOutput { code: ret.code, wrapped: ret.wrapped, warnings: ret.warnings, written_to })
}

fn print_errors(path: &Path, errors: &BuildError) {
  for error in &**errors {
    eprintln!("{} {}: {}", Colour::Red.paint("Error:"), path.display(), error);
  }
}

fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let Commands { input, output, namespace, module } = Commands::parse();
  let flags = args::options_from_flags(namespace, &module);

  let transformer = match load_options(input.config.as_deref(), flags)
    .map_err(BuildError::from)
    .and_then(GlobalsTransformer::new)
  {
    Ok(transformer) => transformer,
    Err(errors) => {
      for error in &*errors {
        eprintln!("{} {}", Colour::Red.paint("Error:"), error);
      }
      return ExitCode::FAILURE;
    }
  };

  let out_paths = match output.out_dir.as_deref() {
    Some(out_dir) => match output_paths::output_paths(&input.input, out_dir) {
      Ok(out_paths) => out_paths.into_iter().map(Some).collect(),
      Err(error) => {
        eprintln!("{} {}", Colour::Red.paint("Error:"), error);
        return ExitCode::FAILURE;
      }
    },
    None => vec![None; input.input.len()],
  };

  let start = Instant::now();
  let results = input
    .input
    .par_iter()
    .zip(&out_paths)
    .map(|(path, out_path)| {
      (path, transform_file(&transformer, path, input.source_type, out_path.as_deref()))
    })
    .collect::<Vec<_>>();

  let dim = Colour::White.dimmed();
  let mut failed = 0;
  for (path, result) in results {
    match result {
      Ok(file) => {
        for warning in &file.warnings {
          eprintln!("{} {}: {}", Colour::Yellow.paint("Warning:"), path.display(), warning);
        }
        match file.written_to {
          Some(out_path) => {
            let status = if file.wrapped { "wrapped" } else { "copied" };
            eprintln!(
              "{} {} {}",
              Colour::Cyan.paint(out_path.display().to_string()),
              dim.paint("│"),
              dim.paint(status)
            );
          }
          None => println!("{}", file.code),
        }
      }
      Err(errors) => {
        failed += 1;
        print_errors(path, &errors);
      }
    }
  }

  let elapsed = format!("{:.2} ms", start.elapsed().as_secs_f64() * 1000.0);
  if failed > 0 {
    eprintln!(
      "\n{} {failed} of {} files failed in {}",
      Colour::Red.paint("✘"),
      input.input.len(),
      Colour::White.bold().paint(elapsed)
    );
    ExitCode::FAILURE
  } else {
    eprintln!("\n{} Finished in {}", Colour::Green.paint("✔"), Colour::White.bold().paint(elapsed));
    ExitCode::SUCCESS
  }
}

#[cfg(test)]
mod tests {
  use clap::Parser;

  use super::{Commands, args::options_from_flags, load_options};

  #[test]
  fn flags_override_config_file() {
    let dir = std::env::temp_dir().join("esglobals_cli_flags_override_config_file");
    std::fs::create_dir_all(&dir).unwrap();
    let config = dir.join("options.json");
    std::fs::write(&config, r#"{ "importNamespace": "Foo", "exportNamespace": "Dog", "loose": true }"#)
      .unwrap();

    let Commands { namespace, module, .. } =
      Commands::parse_from(["esglobals", "a.js", "--export-namespace", "Cat", "--no-strict-mode"]);
    let options = load_options(Some(&config), options_from_flags(namespace, &module)).unwrap();
    assert_eq!(options.export_namespace.as_deref(), Some("Cat"));
    assert_eq!(options.import_namespace.as_deref(), Some("Foo"));
    assert_eq!(options.loose, Some(true));
    assert_eq!(options.strict_mode, Some(false));
    assert_eq!(options.strict, None);
  }

  #[test]
  fn cjs_inputs_are_scripts() {
    use std::path::Path;

    use crate::types::source_kind::{SourceKind, source_type_for};

    assert!(!source_type_for(Path::new("a.cjs"), None).is_module());
    assert!(source_type_for(Path::new("a.mjs"), None).is_module());
    assert!(!source_type_for(Path::new("a.mjs"), Some(SourceKind::Script)).is_module());
  }
}
