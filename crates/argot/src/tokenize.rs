//! Splitting raw argument vectors into flags and positionals.
//!
//! Any token starting with `--` is a flag. Its value comes from an `=` suffix,
//! from the following token when that token is not itself a flag, or is the
//! empty string (a bare boolean flag). Everything else is positional.
//!
//! ```text
//! deploy web --tag v1 --tag=v2 --force
//! positionals: [deploy, web]
//! flags:       tag => [v1, v2], force => [""]
//! ```

use indexmap::IndexMap;

/// The result of tokenizing one argument vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    flags: IndexMap<String, Vec<String>>,
    positionals: Vec<String>,
}

impl ParsedArgs {
    /// All flags in first-seen order, each with its values in encounter order.
    pub fn flags(&self) -> &IndexMap<String, Vec<String>> {
        &self.flags
    }

    /// The values given for `name`, if the flag appeared at all.
    pub fn values(&self, name: &str) -> Option<&[String]> {
        self.flags.get(name).map(Vec::as_slice)
    }

    /// Whether `--name` appeared in any form.
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    /// Positional tokens in their original order.
    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    /// Returns a copy without the first `n` positionals.
    ///
    /// Used to drop the tokens consumed by command-path resolution.
    pub fn skip_positionals(&self, n: usize) -> ParsedArgs {
        ParsedArgs {
            flags: self.flags.clone(),
            positionals: self.positionals.iter().skip(n).cloned().collect(),
        }
    }

    /// Rebuilds an argument list: positionals first, then `--name=value`
    /// for every flag value.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = self.positionals.clone();
        for (name, values) in &self.flags {
            for value in values {
                args.push(format!("--{name}={value}"));
            }
        }
        args
    }
}

/// Tokenizes an argument vector.
///
/// This never fails: malformed input degrades to empty flag values.
///
/// # Example
///
/// ```rust
/// use argot::tokenize;
///
/// let parsed = tokenize(["build", "--jobs", "4", "--release"]);
/// assert_eq!(parsed.positionals(), ["build"]);
/// assert_eq!(parsed.values("jobs"), Some(&["4".to_string()][..]));
/// assert_eq!(parsed.values("release"), Some(&[String::new()][..]));
/// ```
pub fn tokenize<I, S>(args: I) -> ParsedArgs
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let args: Vec<S> = args.into_iter().collect();
    let mut parsed = ParsedArgs::default();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_ref();

        let Some(flag) = arg.strip_prefix("--") else {
            parsed.positionals.push(arg.to_string());
            i += 1;
            continue;
        };

        if let Some((name, value)) = flag.split_once('=') {
            tracing::trace!(flag = name, "flag with inline value");
            push_value(&mut parsed, name, value);
            i += 1;
            continue;
        }

        match args.get(i + 1).map(AsRef::as_ref) {
            Some(next) if !next.starts_with("--") => {
                tracing::trace!(flag, "flag consumed the following token");
                push_value(&mut parsed, flag, next);
                i += 2;
            }
            _ => {
                tracing::trace!(flag, "bare flag");
                push_value(&mut parsed, flag, "");
                i += 1;
            }
        }
    }

    parsed
}

fn push_value(parsed: &mut ParsedArgs, name: &str, value: &str) {
    parsed
        .flags
        .entry(name.to_string())
        .or_default()
        .push(value.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_flags_and_positionals() {
        let parsed = tokenize(["arg1", "arg2", "--flag1", "value1", "--flag2", "value2"]);
        assert_eq!(parsed.flags().len(), 2);
        assert_eq!(parsed.positionals(), ["arg1", "arg2"]);
    }

    #[test]
    fn equals_form_splits_on_first_equals() {
        let parsed = tokenize(["--expr=a=b"]);
        assert_eq!(parsed.values("expr"), Some(&["a=b".to_string()][..]));
    }

    #[test]
    fn repeated_flags_accumulate_in_order() {
        let parsed = tokenize(["--tag", "a", "--tag=b", "--tag", "c"]);
        assert_eq!(
            parsed.values("tag").unwrap(),
            ["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn bare_flag_before_flag_gets_empty_value() {
        let parsed = tokenize(["--verbose", "--level", "3"]);
        assert_eq!(parsed.values("verbose"), Some(&[String::new()][..]));
        assert_eq!(parsed.values("level"), Some(&["3".to_string()][..]));
    }

    #[test]
    fn bare_flag_at_end_gets_empty_value() {
        let parsed = tokenize(["run", "--dry-run"]);
        assert_eq!(parsed.values("dry-run"), Some(&[String::new()][..]));
        assert_eq!(parsed.positionals(), ["run"]);
    }

    #[test]
    fn flag_consumes_following_positional() {
        let parsed = tokenize(["--verbose", "file.txt"]);
        assert_eq!(parsed.values("verbose"), Some(&["file.txt".to_string()][..]));
        assert!(parsed.positionals().is_empty());
    }

    #[test]
    fn single_dash_tokens_are_values() {
        let parsed = tokenize(["--offset", "-5", "-v"]);
        assert_eq!(parsed.values("offset"), Some(&["-5".to_string()][..]));
        assert_eq!(parsed.positionals(), ["-v"]);
    }

    #[test]
    fn skip_positionals_keeps_flags() {
        let parsed = tokenize(["app", "db", "migrate", "up", "--steps", "2"]);
        let rest = parsed.skip_positionals(3);
        assert_eq!(rest.positionals(), ["up"]);
        assert!(rest.has_flag("steps"));
    }

    #[test]
    fn to_args_rebuilds_equals_form() {
        let parsed = tokenize(["a", "--x", "1", "b", "--y", "--x=2"]);
        assert_eq!(parsed.to_args(), ["a", "b", "--x=1", "--x=2", "--y="]);
    }

    #[test]
    fn to_args_round_trips_through_tokenize() {
        let parsed = tokenize(["one", "--name", "v", "--flag"]);
        assert_eq!(tokenize(parsed.to_args()), parsed);
    }
}
