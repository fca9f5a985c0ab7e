use std::path::{Path, PathBuf};

use anyhow::bail;
use esglobals_utils::FxIndexMap;
use sugar_path::SugarPath;

/// Output path of every input under `out_dir`, in input order.
///
/// Paths stay relative to the closest directory shared by all inputs, so `a/index.mjs` and
/// `b/index.mjs` don't overwrite each other. Only the last extension is replaced with `.js`.
/// Two inputs that would still land on the same file are an error, reported before anything
/// is written.
pub fn output_paths(inputs: &[PathBuf], out_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
  let absolute = inputs.iter().map(|input| input.absolutize()).collect::<Vec<_>>();
  let base = common_dir(&absolute);

  let mut written_by = FxIndexMap::<PathBuf, &Path>::default();
  let mut outputs = Vec::with_capacity(inputs.len());
  for (input, absolute) in inputs.iter().zip(&absolute) {
    let relative = absolute.relative(&base);
    let stem = relative.file_stem().map_or_else(|| "index".into(), |stem| stem.to_string_lossy());
    let out_path = out_dir.join(relative.with_file_name(format!("{stem}.js")));
    if let Some(previous) = written_by.insert(out_path.clone(), input) {
      bail!(
        "`{}` and `{}` would both be written to `{}`",
        previous.display(),
        input.display(),
        out_path.display()
      );
    }
    outputs.push(out_path);
  }
  Ok(outputs)
}

fn common_dir(paths: &[PathBuf]) -> PathBuf {
  let mut dirs = paths.iter().map(|path| path.parent().unwrap_or(path));
  let Some(first) = dirs.next() else {
    return PathBuf::new();
  };
  dirs.fold(first.to_path_buf(), |common, dir| {
    common
      .components()
      .zip(dir.components())
      .take_while(|(a, b)| a == b)
      .map(|(component, _)| component)
      .collect()
  })
}
