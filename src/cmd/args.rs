//! getopt-style argument parsing for commands
//!
//! A template such as `"bc:de:"` lists the accepted flags; a flag followed by
//! `:` takes a value. Flags may be grouped (`-bd`), values may be attached
//! (`-l30%`) or separate, and repeated flags keep every value. Parsing stops
//! at `--` or at the first argument that is not a flag.

use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgsError {
    #[error("unknown flag -{0}")]
    UnknownFlag(char),

    #[error("-{0} expects an argument")]
    MissingValue(char),
}

/// Parsed flags and positional arguments
#[derive(Clone, Debug, Default)]
pub struct Args {
    flags: BTreeMap<char, Vec<String>>,
    values: Vec<String>,
}

impl Args {
    pub fn parse(template: &str, argv: &[String]) -> Result<Self, ArgsError> {
        let mut args = Args::default();
        let mut i = 0;

        while i < argv.len() {
            let arg = &argv[i];
            if arg == "--" {
                i += 1;
                break;
            }
            let Some(group) = arg.strip_prefix('-').filter(|g| !g.is_empty()) else {
                break;
            };
            i += 1;

            for (pos, flag) in group.char_indices() {
                let Some(takes_value) = flag_spec(template, flag) else {
                    return Err(ArgsError::UnknownFlag(flag));
                };
                if !takes_value {
                    args.flags.entry(flag).or_default();
                    continue;
                }
                let attached = &group[pos + flag.len_utf8()..];
                let value = if !attached.is_empty() {
                    attached.to_string()
                } else if i < argv.len() {
                    i += 1;
                    argv[i - 1].clone()
                } else {
                    return Err(ArgsError::MissingValue(flag));
                };
                args.flags.entry(flag).or_default().push(value);
                break;
            }
        }

        args.values = argv[i..].to_vec();
        Ok(args)
    }

    pub fn has(&self, flag: char) -> bool {
        self.flags.contains_key(&flag)
    }

    /// Last value given for a flag
    pub fn get(&self, flag: char) -> Option<&str> {
        self.flags.get(&flag)?.last().map(String::as_str)
    }

    /// Every value given for a flag, in order
    pub fn all(&self, flag: char) -> &[String] {
        self.flags.get(&flag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Positional arguments
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// `Some(takes_value)` when `flag` is in the template
fn flag_spec(template: &str, flag: char) -> Option<bool> {
    if flag == ':' {
        return None;
    }
    let at = template.find(flag)?;
    Some(template[at + flag.len_utf8()..].starts_with(':'))
}
