//! Label inflections used to derive subset names and fallback definitions.

/// `"cellular_component_id"` → `"Cellular component"`.
///
/// Strips a trailing `_id`, turns underscores into spaces, lower-cases the
/// text and capitalises the first character.
pub fn humanize(label: &str) -> String {
  let trimmed = label.strip_suffix("_id").unwrap_or(label);
  let lowered = trimmed.replace('_', " ").to_lowercase();
  let mut chars = lowered.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

/// `"GoSlimGeneric"` → `"go_slim_generic"`, `"goslim-plant"` →
/// `"goslim_plant"`.
pub fn underscore(label: &str) -> String {
  let chars: Vec<char> = label.chars().collect();
  let mut out = String::with_capacity(label.len() + 4);
  for (i, &c) in chars.iter().enumerate() {
    if c.is_uppercase() && i > 0 {
      let prev = chars[i - 1];
      let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
      if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
        out.push('_');
      }
    }
    if c == '-' {
      out.push('_');
    } else {
      out.extend(c.to_lowercase());
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn humanize_labels() {
    assert_eq!(humanize("employee_salary"), "Employee salary");
    assert_eq!(humanize("author_id"), "Author");
    assert_eq!(humanize("Rare Disease"), "Rare disease");
    assert_eq!(humanize(""), "");
  }

  #[test]
  fn underscore_labels() {
    assert_eq!(underscore("GoSlimGeneric"), "go_slim_generic");
    assert_eq!(underscore("HTTPServer"), "http_server");
    assert_eq!(underscore("goslim-plant"), "goslim_plant");
    assert_eq!(underscore("gocheck_do_not_annotate"), "gocheck_do_not_annotate");
  }
}
