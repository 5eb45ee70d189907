//! Placeholder substitution for catalog strings.
//!
//! A placeholder is `marker + name` (`:name` by default), matched without
//! regard to case. An occurrence directly preceded by the escape character
//! is skipped, but only when that escape character itself follows some
//! other character: `" \:name"` is kept, `"\:name"` at the very start and
//! `"\\:name"` are replaced. The escape character is never removed.

use crate::value::Value;
use regex::RegexBuilder;
use tracing::warn;

pub const DEFAULT_MARKER: &str = ":";
pub const DEFAULT_ESCAPE: char = '\\';

/// Rewrites every unescaped placeholder of `text`.
///
/// Substitutions run in order, each over the output of the previous one.
/// Replacement text is inserted literally. `None` yields an empty string.
pub fn replace(
    text: Option<&str>,
    substitutions: &[(&str, &str)],
    marker: &str,
    escape: char,
) -> String {
    let mut result = text.unwrap_or_default().to_string();
    for (name, replacement) in substitutions {
        result = replace_one(&result, name, replacement, marker, escape);
    }
    result
}

/// Applies [`replace`] to a catalog value, mappings leaf by leaf.
///
/// `Null` always becomes `""`. Without substitutions everything else is
/// returned as is; with them every scalar leaf comes back as a string, so
/// `3` reads `"3"` and `true` reads `"true"`.
pub fn replace_value(
    value: &Value,
    substitutions: &[(&str, &str)],
    marker: &str,
    escape: char,
) -> Value {
    match value {
        Value::Null => Value::String(String::new()),
        _ if substitutions.is_empty() => value.clone(),
        Value::Map(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), replace_value(v, substitutions, marker, escape)))
                .collect(),
        ),
        scalar => Value::String(replace(
            scalar.to_text().as_deref(),
            substitutions,
            marker,
            escape,
        )),
    }
}

fn replace_one(text: &str, name: &str, replacement: &str, marker: &str, escape: char) -> String {
    if marker.is_empty() && name.is_empty() {
        return text.to_string();
    }

    let pattern = match RegexBuilder::new(&regex::escape(&format!("{marker}{name}")))
        .case_insensitive(true)
        .unicode(true)
        .build()
    {
        Ok(pattern) => pattern,
        Err(err) => {
            warn!(%err, name, "placeholder pattern rejected, result discarded");
            return String::new();
        }
    };

    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut from = 0;
    while let Some(found) = pattern.find_at(text, from) {
        if is_escaped(text, found.start(), escape) {
            // retry one character further on, the literal may overlap itself
            from = found.start()
                + text[found.start()..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
            continue;
        }
        out.push_str(&text[copied..found.start()]);
        out.push_str(replacement);
        copied = found.end();
        from = found.end();
    }
    out.push_str(&text[copied..]);
    out
}

fn is_escaped(text: &str, pos: usize, escape: char) -> bool {
    let mut before = text[..pos].chars().rev();
    matches!(
        (before.next(), before.next()),
        (Some(prev), Some(prev2)) if prev == escape && prev2 != escape
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Key, Map};

    fn sub(text: &str, substitutions: &[(&str, &str)]) -> String {
        replace(Some(text), substitutions, DEFAULT_MARKER, DEFAULT_ESCAPE)
    }

    #[test]
    fn test_basic_replacement() {
        assert_eq!(sub("hello :name", &[("name", "World")]), "hello World");
        assert_eq!(sub(":a and :a", &[("a", "x")]), "x and x");
    }

    #[test]
    fn test_no_substitutions_leaves_text() {
        assert_eq!(sub("nothing here", &[]), "nothing here");
        assert_eq!(replace(None, &[], ":", '\\'), "");
        assert_eq!(replace(None, &[("a", "b")], ":", '\\'), "");
    }

    #[test]
    fn test_unmatched_placeholders_stay() {
        assert_eq!(sub("hi :who", &[("name", "x")]), "hi :who");
    }

    #[test]
    fn test_case_insensitive_unicode() {
        assert_eq!(sub("hola :NOMBRE", &[("nombre", "Ana")]), "hola Ana");
        assert_eq!(sub("día :ÁRBOL", &[("árbol", "roble")]), "día roble");
    }

    #[test]
    fn test_escaped_marker_is_kept_verbatim() {
        // the escape character is not consumed
        assert_eq!(sub("price: \\:name", &[("name", "5")]), "price: \\:name");
    }

    #[test]
    fn test_escape_quirks() {
        // nothing precedes the escape, so the lookbehind cannot apply
        assert_eq!(sub("\\:name", &[("name", "5")]), "\\5");
        // a doubled escape does not protect the marker
        assert_eq!(sub("a\\\\:name", &[("name", "5")]), "a\\\\5");
    }

    #[test]
    fn test_substitutions_chain_in_order() {
        assert_eq!(sub("hi :name", &[("name", ":age"), ("age", "30")]), "hi 30");
        assert_eq!(sub("hi :name", &[("age", "30"), ("name", ":age")]), "hi :age");
    }

    #[test]
    fn test_prefix_names_replace_greedily_in_order() {
        assert_eq!(sub(":name :names", &[("name", "X")]), "X Xs");
    }

    #[test]
    fn test_replacement_is_literal() {
        assert_eq!(sub("cost :p", &[("p", "$1 ${x}")]), "cost $1 ${x}");
    }

    #[test]
    fn test_custom_marker_and_escape() {
        assert_eq!(
            replace(Some("{{user}} and x!{{user}}"), &[("user}}", "bob")], "{{", '!'),
            "bob and x!{{user}}"
        );
    }

    #[test]
    fn test_replace_value() {
        let mut map = Map::new();
        map.insert("greeting".into(), Value::from("hi :n"));
        map.insert("count".into(), Value::from(3));
        map.insert("nothing".into(), Value::Null);
        let value = Value::Map(map);

        let replaced = replace_value(&value, &[("n", "Bo")], ":", '\\');
        let replaced = replaced.as_map().unwrap();
        assert_eq!(replaced[&Key::from("greeting")], Value::from("hi Bo"));
        assert_eq!(replaced[&Key::from("count")], Value::from("3"));
        assert_eq!(replaced[&Key::from("nothing")], Value::from(""));

        assert_eq!(replace_value(&Value::Null, &[], ":", '\\'), Value::from(""));
        assert_eq!(replace_value(&Value::Int(1), &[], ":", '\\'), Value::Int(1));
    }

    #[test]
    fn test_scalars_become_text_under_substitution() {
        let subs = [("n", "x")];
        assert_eq!(replace_value(&Value::Int(42), &subs, ":", '\\'), Value::from("42"));
        assert_eq!(replace_value(&Value::Float(1.5), &subs, ":", '\\'), Value::from("1.5"));
        assert_eq!(replace_value(&Value::Bool(true), &subs, ":", '\\'), Value::from("true"));
        assert_eq!(replace_value(&Value::Bool(false), &[], ":", '\\'), Value::Bool(false));
    }
}
