//! CLI builder - turns registered signatures and flag specs into clap types
//!
//! Signatures and flags use the familiar commander-style grammar:
//!
//! - command signature: `deploy <name> [version]`, `exec <cmd> [args...]`
//! - option flags: `-f, --foo <value>` (required value), `--foo [value]`
//!   (optional value), `--verbose` (presence flag)

use super::action::Invocation;
use super::error::{DeclarativeError, DeclarativeResult};
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// A positional argument from a command signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionalSpec {
    /// Argument name
    pub name: String,
    /// `<name>` vs `[name]`
    pub required: bool,
    /// Trailing `...`
    pub variadic: bool,
}

/// A parsed command signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Command name
    pub name: String,
    /// Positionals in order
    pub positionals: Vec<PositionalSpec>,
}

impl Signature {
    /// Parse `name <req> [opt] [rest...]`
    pub fn parse(spec: &str) -> DeclarativeResult<Self> {
        let invalid = || DeclarativeError::InvalidSignature(spec.to_string());
        let mut words = spec.split_whitespace();

        let name = words.next().ok_or_else(invalid)?;
        if name.starts_with(['<', '[', '-']) {
            return Err(invalid());
        }

        let mut positionals: Vec<PositionalSpec> = Vec::new();
        for word in words {
            if positionals.last().is_some_and(|p| p.variadic) {
                return Err(invalid());
            }
            let (inner, required) = if let Some(inner) = word.strip_prefix('<').and_then(|w| w.strip_suffix('>')) {
                (inner, true)
            } else if let Some(inner) = word.strip_prefix('[').and_then(|w| w.strip_suffix(']')) {
                (inner, false)
            } else {
                return Err(invalid());
            };
            if required && positionals.iter().any(|p| !p.required) {
                return Err(invalid());
            }
            let (arg_name, variadic) = match inner.strip_suffix("...") {
                Some(stripped) => (stripped, true),
                None => (inner, false),
            };
            // `help` is the id of clap's own --help argument
            if arg_name.is_empty() || arg_name == "help" || positionals.iter().any(|p| p.name == arg_name) {
                return Err(invalid());
            }
            positionals.push(PositionalSpec {
                name: arg_name.to_string(),
                required,
                variadic,
            });
        }

        Ok(Self {
            name: name.to_string(),
            positionals,
        })
    }
}

/// How an option takes its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagValue {
    /// Presence flag
    None,
    /// `<value>`
    Required,
    /// `[value]`
    Optional,
}

/// A parsed option flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    /// Flag spec as registered, e.g. `-f, --foo <value>`
    pub flags: String,
    /// Short alias
    pub short: Option<char>,
    /// Long name; also the key in [`Invocation::options`]
    pub long: String,
    /// Value arity
    pub value: FlagValue,
    /// Help text
    pub description: String,
    /// Default value
    pub default: Option<String>,
}

fn flag_regex() -> &'static Regex {
    static FLAG: OnceLock<Regex> = OnceLock::new();
    FLAG.get_or_init(|| {
        Regex::new(r"^(?:-([A-Za-z0-9]),\s*)?--([A-Za-z0-9][A-Za-z0-9_-]*)(?:\s+(<[^<>\s]+>|\[[^\[\]\s]+\]))?$")
            .expect("flag pattern is valid")
    })
}

impl OptionSpec {
    /// Parse a flag spec with its help text and default
    pub fn parse(flags: &str, description: &str, default: Option<&str>) -> DeclarativeResult<Self> {
        let invalid = || DeclarativeError::InvalidFlag(flags.to_string());
        let caps = flag_regex().captures(flags.trim()).ok_or_else(invalid)?;

        let short = caps.get(1).and_then(|m| m.as_str().chars().next());
        let long = caps[2].to_string();
        if long == "help" || short == Some('h') {
            return Err(invalid());
        }
        let value = match caps.get(3).map(|m| m.as_str()) {
            None => FlagValue::None,
            Some(v) if v.starts_with('<') => FlagValue::Required,
            Some(_) => FlagValue::Optional,
        };
        if value == FlagValue::None && default.is_some() {
            return Err(invalid());
        }

        Ok(Self {
            flags: flags.trim().to_string(),
            short,
            long,
            value,
            description: description.to_string(),
            default: default.map(str::to_string),
        })
    }
}

/// Build a clap positional argument
pub fn build_positional(spec: &PositionalSpec) -> Arg {
    let mut arg = Arg::new(spec.name.clone())
        .value_name(spec.name.clone())
        .value_parser(clap::value_parser!(String))
        .required(spec.required);

    if spec.variadic {
        let min_values: usize = if spec.required { 1 } else { 0 };
        arg = arg.action(ArgAction::Append).num_args(min_values..);
    } else {
        arg = arg.action(ArgAction::Set);
    }
    arg
}

/// Build a clap option
pub fn build_option(spec: &OptionSpec) -> Arg {
    let mut arg = Arg::new(spec.long.clone())
        .long(spec.long.clone())
        .help(spec.description.clone());

    if let Some(short) = spec.short {
        arg = arg.short(short);
    }

    match spec.value {
        FlagValue::None => arg.action(ArgAction::SetTrue),
        FlagValue::Required => {
            arg = arg
                .action(ArgAction::Set)
                .value_name("value")
                .value_parser(clap::value_parser!(String));
            if let Some(default) = &spec.default {
                arg = arg.default_value(default.clone());
            }
            arg
        }
        FlagValue::Optional => arg
            .action(ArgAction::Set)
            .num_args(0..=1)
            .value_name("value")
            .value_parser(clap::value_parser!(String)),
    }
}

/// Build the clap subcommand for a registration
pub fn build_subcommand(
    name: &str,
    about: Option<&str>,
    positionals: &[PositionalSpec],
    options: &[OptionSpec],
    passthrough: bool,
) -> Command {
    let mut cmd = Command::new(name.to_string());

    if let Some(about) = about {
        cmd = cmd.about(about.to_string());
    }

    for spec in positionals {
        let mut arg = build_positional(spec);
        if passthrough && spec.variadic {
            arg = arg.trailing_var_arg(true).allow_hyphen_values(true);
        }
        cmd = cmd.arg(arg);
    }

    for spec in options {
        cmd = cmd.arg(build_option(spec));
    }

    cmd
}

/// Read an [`Invocation`] back out of clap's matches
pub fn extract_invocation(
    name: &str,
    positionals: &[PositionalSpec],
    options: &[OptionSpec],
    matches: &ArgMatches,
) -> Invocation {
    let mut invocation = Invocation::new(name);

    for spec in positionals {
        let value = if spec.variadic {
            let values: Vec<Value> = matches
                .get_many::<String>(&spec.name)
                .map(|vals| vals.cloned().map(Value::String).collect())
                .unwrap_or_default();
            Value::Array(values)
        } else {
            matches
                .get_one::<String>(&spec.name)
                .cloned()
                .map(Value::String)
                .unwrap_or(Value::Null)
        };
        invocation.args.push(value);
    }

    for spec in options {
        let value = match spec.value {
            FlagValue::None => Some(Value::Bool(matches.get_flag(&spec.long))),
            FlagValue::Required => matches.get_one::<String>(&spec.long).cloned().map(Value::String),
            FlagValue::Optional => match matches.get_one::<String>(&spec.long) {
                Some(v) => Some(Value::String(v.clone())),
                // `--foo` given without a value
                None if matches.value_source(&spec.long) == Some(ValueSource::CommandLine) => {
                    Some(Value::Bool(true))
                }
                None => None,
            },
        };
        if let Some(value) = value {
            invocation.options.insert(spec.long.clone(), value);
        }
    }

    invocation
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_bare_signature() {
        let sig = Signature::parse("deployment-list").unwrap();
        assert_eq!(sig.name, "deployment-list");
        assert!(sig.positionals.is_empty());
    }

    #[test]
    fn test_parse_signature_with_args() {
        let sig = Signature::parse("deploy <name> [version]").unwrap();
        assert_eq!(sig.name, "deploy");
        assert_eq!(
            sig.positionals,
            vec![
                PositionalSpec { name: "name".into(), required: true, variadic: false },
                PositionalSpec { name: "version".into(), required: false, variadic: false },
            ]
        );
    }

    #[test]
    fn test_parse_variadic_signature() {
        let sig = Signature::parse("exec <cmd> [args...]").unwrap();
        assert!(sig.positionals[1].variadic);
        assert_eq!(sig.positionals[1].name, "args");
    }

    #[test]
    fn test_reject_bad_signatures() {
        for spec in ["", "<name>", "cmd name", "cmd [a] <b>", "cmd [a...] [b]", "cmd <a> <a>", "cmd <>", "cmd <help>", "cmd [help...]"] {
            assert!(Signature::parse(spec).is_err(), "accepted {:?}", spec);
        }
    }

    #[test]
    fn test_parse_required_value_flag() {
        let spec = OptionSpec::parse("-f, --foo <value>", "", Some("bar")).unwrap();
        assert_eq!(spec.short, Some('f'));
        assert_eq!(spec.long, "foo");
        assert_eq!(spec.value, FlagValue::Required);
        assert_eq!(spec.default.as_deref(), Some("bar"));
    }

    #[test]
    fn test_parse_presence_and_optional_flags() {
        let verbose = OptionSpec::parse("--verbose", "Verbose output", None).unwrap();
        assert_eq!(verbose.value, FlagValue::None);
        assert_eq!(verbose.short, None);

        let data = OptionSpec::parse("-d, --data [value]", "", None).unwrap();
        assert_eq!(data.value, FlagValue::Optional);
    }

    #[test]
    fn test_reject_bad_flags() {
        assert!(OptionSpec::parse("foo", "", None).is_err());
        assert!(OptionSpec::parse("-fo, --foo", "", None).is_err());
        assert!(OptionSpec::parse("--help", "", None).is_err());
        assert!(OptionSpec::parse("--verbose", "", Some("x")).is_err());
    }

    fn sample_command() -> (Vec<PositionalSpec>, Vec<OptionSpec>, Command) {
        let sig = Signature::parse("add <name> [rest...]").unwrap();
        let options = vec![
            OptionSpec::parse("-f, --foo <value>", "", Some("bar")).unwrap(),
            OptionSpec::parse("--verbose", "", None).unwrap(),
            OptionSpec::parse("--data [value]", "", None).unwrap(),
        ];
        let cmd = build_subcommand(&sig.name, None, &sig.positionals, &options, false);
        (sig.positionals, options, cmd)
    }

    #[test]
    fn test_extract_defaults() {
        let (positionals, options, cmd) = sample_command();
        let matches = cmd.try_get_matches_from(["add", "prod"]).unwrap();
        let inv = extract_invocation("add", &positionals, &options, &matches);

        assert_eq!(inv.args, vec![json!("prod"), json!([])]);
        assert_eq!(inv.options.get("foo"), Some(&json!("bar")));
        assert_eq!(inv.options.get("verbose"), Some(&json!(false)));
        assert!(!inv.options.contains_key("data"));
    }

    #[test]
    fn test_extract_given_values() {
        let (positionals, options, cmd) = sample_command();
        let matches = cmd
            .try_get_matches_from(["add", "prod", "a", "b", "-f", "baz", "--verbose", "--data"])
            .unwrap();
        let inv = extract_invocation("add", &positionals, &options, &matches);

        assert_eq!(inv.args, vec![json!("prod"), json!(["a", "b"])]);
        assert_eq!(inv.options.get("foo"), Some(&json!("baz")));
        assert_eq!(inv.options.get("verbose"), Some(&json!(true)));
        assert_eq!(inv.options.get("data"), Some(&json!(true)));
    }

    #[test]
    fn test_missing_required_positional_is_rejected() {
        let (_, _, cmd) = sample_command();
        assert!(cmd.try_get_matches_from(["add"]).is_err());
    }
}
