/// Replace `${ENV_VAR}` placeholders in config string values.
///
/// `${ENV_VAR:-fallback}` uses `fallback` when the variable is unset or empty.
/// Unresolvable variables are left as-is.
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok()).output
}

/// Result of a substitution pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Substitution {
    pub output: String,
    /// Placeholders that had neither a value nor a fallback, in order of
    /// appearance (deduplicated).
    pub unresolved: Vec<String>,
}

/// Like [`substitute_env`] but also reports which variables stayed unresolved.
pub fn substitute_env_report(input: &str) -> Substitution {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

/// Replace placeholders using a custom lookup function.
///
/// The separate signature makes it testable without mutating the process
/// environment.
pub fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> Substitution {
    let mut result = Substitution {
        output: String::with_capacity(input.len()),
        unresolved: Vec::new(),
    };
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' || chars.peek() != Some(&'{') {
            result.output.push(ch);
            continue;
        }
        chars.next(); // consume '{'

        let mut inner = String::new();
        let mut closed = false;
        for c in chars.by_ref() {
            if c == '}' {
                closed = true;
                break;
            }
            inner.push(c);
        }

        if !closed || inner.is_empty() {
            // Malformed, emit literal.
            result.output.push_str("${");
            result.output.push_str(&inner);
            continue;
        }

        let (name, fallback) = match inner.split_once(":-") {
            Some((name, fallback)) => (name, Some(fallback)),
            None => (inner.as_str(), None),
        };

        match (lookup(name).filter(|v| !v.is_empty()), fallback) {
            (Some(value), _) => result.output.push_str(&value),
            (None, Some(fallback)) => result.output.push_str(fallback),
            (None, None) => {
                result.output.push_str("${");
                result.output.push_str(name);
                result.output.push('}');
                if !result.unresolved.iter().any(|n| n == name) {
                    result.unresolved.push(name.to_string());
                }
            },
        }
    }

    result
}
