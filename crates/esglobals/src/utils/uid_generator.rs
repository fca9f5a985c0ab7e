use esglobals_utils::ecmascript::uid_base_name;
use oxc::semantic::Scoping;
use rustc_hash::FxHashSet;

/// Hands out binding names that don't clash with anything in the module, `_a`, `_a2`, `_a3`...
#[derive(Debug, Default)]
pub struct UidGenerator {
  used_names: FxHashSet<String>,
}

impl UidGenerator {
  pub fn new(scoping: &Scoping) -> Self {
    let used_names = scoping
      .symbol_names()
      .map(ToString::to_string)
      .chain(scoping.root_unresolved_references().keys().map(ToString::to_string))
      .collect();
    Self { used_names }
  }

  pub fn generate(&mut self, hint: &str) -> String {
    let base = uid_base_name(hint);
    let mut suffix = 1;
    loop {
      let candidate = if suffix > 1 { format!("{base}{suffix}") } else { base.clone() };
      if self.used_names.insert(candidate.clone()) {
        return candidate;
      }
      suffix += 1;
    }
  }
}

#[test]
fn test_generate_deconflicts() {
  let mut uid = UidGenerator::default();
  uid.used_names.insert("_a".to_string());
  assert_eq!(uid.generate("a"), "_a2");
  assert_eq!(uid.generate("./a"), "_a3");
  assert_eq!(uid.generate("exports"), "_exports");
  assert_eq!(uid.generate("exports"), "_exports2");
}
