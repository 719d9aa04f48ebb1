use std::sync::LazyLock;

use regex::{Captures, Regex};

/// `{{ env.NAME }}` with an optional `| default("value")` filter
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\)\s*)?\}\}"#).expect("must be valid regex")
});

/// Substitute environment placeholders in raw configuration text
///
/// Placeholders must be scoped with `env.`. A placeholder without a default
/// whose variable is unset is an error. Comment lines are left untouched so
/// that commented-out provider blocks do not require their variables.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut lines = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_owned());
            continue;
        }
        lines.push(expand_line(line)?);
    }

    let mut output = lines.join("\n");
    if input.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

fn expand_line(line: &str) -> Result<String, String> {
    let mut failure = None;

    let expanded = PLACEHOLDER.replace_all(line, |captures: &Captures<'_>| {
        let key = &captures[1];
        let default = captures.get(2).map(|m| m.as_str());
        match resolve(key, default) {
            Ok(value) => value,
            Err(e) => {
                failure.get_or_insert(e);
                String::new()
            }
        }
    });

    match failure {
        Some(e) => Err(e),
        None => Ok(expanded.into_owned()),
    }
}

fn resolve(key: &str, default: Option<&str>) -> Result<String, String> {
    let Some(name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        return Err(format!("only variables scoped with 'env.' are supported: `{key}`"));
    };

    match (std::env::var(name), default) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(default)) => Ok(default.to_owned()),
        (Err(_), None) => Err(format!("environment variable not found: `{name}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let input = "[generation]\ncount = 3\n";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn substitutes_api_key() {
        temp_env::with_var("AERON_TEST_OPENAI_KEY", Some("sk-test"), || {
            let result = expand_env("api_key = \"{{ env.AERON_TEST_OPENAI_KEY }}\"").unwrap();
            assert_eq!(result, "api_key = \"sk-test\"");
        });
    }

    #[test]
    fn substitutes_several_placeholders_on_one_line() {
        let vars = [("AERON_TEST_HOST", Some("localhost")), ("AERON_TEST_PORT", Some("4317"))];
        temp_env::with_vars(vars, || {
            let result = expand_env("endpoint = \"http://{{ env.AERON_TEST_HOST }}:{{ env.AERON_TEST_PORT }}\"").unwrap();
            assert_eq!(result, "endpoint = \"http://localhost:4317\"");
        });
    }

    #[test]
    fn unset_variable_is_an_error() {
        temp_env::with_var_unset("AERON_TEST_MISSING", || {
            let err = expand_env("api_key = \"{{ env.AERON_TEST_MISSING }}\"").unwrap_err();
            assert!(err.contains("AERON_TEST_MISSING"));
        });
    }

    #[test]
    fn default_applies_when_unset() {
        temp_env::with_var_unset("AERON_TEST_MODEL", || {
            let result = expand_env("model = \"{{ env.AERON_TEST_MODEL | default(\"gpt-3.5-turbo\") }}\"").unwrap();
            assert_eq!(result, "model = \"gpt-3.5-turbo\"");
        });
    }

    #[test]
    fn set_variable_beats_default() {
        temp_env::with_var("AERON_TEST_MODEL", Some("gpt-4o"), || {
            let result = expand_env("model = \"{{ env.AERON_TEST_MODEL | default(\"gpt-3.5-turbo\") }}\"").unwrap();
            assert_eq!(result, "model = \"gpt-4o\"");
        });
    }

    #[test]
    fn comment_lines_are_not_expanded() {
        temp_env::with_var_unset("AERON_TEST_MISSING", || {
            let input = "  # api_key = \"{{ env.AERON_TEST_MISSING }}\"\ncount = 2";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }

    #[test]
    fn rejects_unscoped_keys() {
        let err = expand_env("key = \"{{ secrets.OPENAI }}\"").unwrap_err();
        assert!(err.contains("only variables scoped with 'env.'"));
    }
}
