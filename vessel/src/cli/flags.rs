//! Flag sets bound to an options value.
//!
//! A [`FlagSet<O>`] pairs each clap argument with a binder that stores the
//! parsed value in a field of `O`. Sets from independent providers are
//! lifted onto a containing options type and composed with a command's own
//! flags, so every layer writes into the same options value.

use crate::cli::RegistrationError;
use clap::parser::ValueSource;
use clap::builder::BoolishValueParser;
use clap::{Arg, ArgAction, ArgMatches, value_parser};
use libvessel::OptionalBool;
use std::collections::HashSet;
use std::path::PathBuf;

type Binder<O> = Box<dyn Fn(&ArgMatches, &mut O) + Send + Sync>;

/// Accessor for the options field a flag writes into.
pub type Field<O, T> = fn(&mut O) -> &mut T;

pub struct Flag<O> {
    arg: Arg,
    bind: Binder<O>,
}

impl<O> Flag<O> {
    pub fn arg(&self) -> &Arg {
        &self.arg
    }

    pub fn id(&self) -> &str {
        self.arg.get_id().as_str()
    }
}

pub struct FlagSet<O> {
    flags: Vec<Flag<O>>,
}

impl<O> Default for FlagSet<O> {
    fn default() -> Self {
        Self { flags: Vec::new() }
    }
}

impl<O: 'static> FlagSet<O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a flag with a custom binder.
    pub fn flag<F>(mut self, arg: Arg, bind: F) -> Self
    where
        F: Fn(&ArgMatches, &mut O) + Send + Sync + 'static,
    {
        self.flags.push(Flag {
            arg,
            bind: Box::new(bind),
        });
        self
    }

    /// `--name`, storing whether it was given.
    pub fn bool_flag(self, arg: Arg, field: Field<O, bool>) -> Self {
        let id = arg.get_id().to_string();
        self.flag(arg.action(ArgAction::SetTrue), move |matches, options| {
            *field(options) = matches.get_flag(&id);
        })
    }

    /// `--name VALUE`
    pub fn string_flag(self, arg: Arg, field: Field<O, Option<String>>) -> Self {
        let id = arg.get_id().to_string();
        self.flag(
            arg.action(ArgAction::Set).value_parser(value_parser!(String)),
            move |matches, options| {
                *field(options) = matches.get_one::<String>(&id).cloned();
            },
        )
    }

    /// `--name PATH`
    pub fn path_flag(self, arg: Arg, field: Field<O, Option<PathBuf>>) -> Self {
        let id = arg.get_id().to_string();
        self.flag(
            arg.action(ArgAction::Set).value_parser(value_parser!(PathBuf)),
            move |matches, options| {
                *field(options) = matches.get_one::<PathBuf>(&id).cloned();
            },
        )
    }

    /// Repeatable `--name VALUE`.
    pub fn strings_flag(self, arg: Arg, field: Field<O, Vec<String>>) -> Self {
        let id = arg.get_id().to_string();
        self.flag(
            arg.action(ArgAction::Append)
                .value_parser(value_parser!(String)),
            move |matches, options| {
                *field(options) = matches
                    .get_many::<String>(&id)
                    .map(|values| values.cloned().collect())
                    .unwrap_or_default();
            },
        )
    }

    /// `--name[=BOOL]`: a bare flag means true and help shows the `false`
    /// default, but the bound value stays unset unless the flag was given.
    pub fn tri_state_flag(self, arg: Arg, field: Field<O, OptionalBool>) -> Self {
        let id = arg.get_id().to_string();
        let arg = arg
            .action(ArgAction::Set)
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
            .default_value("false")
            .value_parser(BoolishValueParser::new());

        self.flag(arg, move |matches, options| {
            *field(options) = match matches.value_source(&id) {
                Some(ValueSource::CommandLine) => matches
                    .get_one::<bool>(&id)
                    .copied()
                    .map(OptionalBool::from)
                    .unwrap_or_default(),
                _ => OptionalBool::Unset,
            };
        })
    }

    /// Re-targets the set onto a containing options type.
    pub fn lift<P: 'static>(self, project: Field<P, O>) -> FlagSet<P> {
        let flags = self
            .flags
            .into_iter()
            .map(|flag| {
                let bind = flag.bind;
                Flag {
                    arg: flag.arg,
                    bind: Box::new(move |matches: &ArgMatches, options: &mut P| {
                        bind(matches, project(options))
                    }) as Binder<P>,
                }
            })
            .collect();
        FlagSet { flags }
    }

    /// Merges provider sets and a command's local set, providers first.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::DuplicateFlag`] when an id, long name or short
    /// name occurs twice.
    pub fn compose(
        command: &str,
        local: FlagSet<O>,
        providers: Vec<FlagSet<O>>,
    ) -> Result<Self, RegistrationError> {
        let mut composed = Self::new();
        let mut seen = HashSet::new();

        for flag in providers.into_iter().flat_map(|p| p.flags).chain(local.flags) {
            for (key, name) in flag_keys(&flag.arg) {
                if !seen.insert(key) {
                    return Err(RegistrationError::DuplicateFlag {
                        command: command.to_string(),
                        flag: name,
                    });
                }
            }
            composed.flags.push(flag);
        }

        Ok(composed)
    }

    /// The clap arguments, for building the command.
    pub fn args(&self) -> Vec<Arg> {
        self.flags.iter().map(|flag| flag.arg.clone()).collect()
    }

    /// Stores every parsed value in `options`.
    pub fn bind(&self, matches: &ArgMatches, options: &mut O) {
        for flag in &self.flags {
            (flag.bind)(matches, options);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Flag<O>> {
        self.flags.iter()
    }
}

/// Names under which `arg` can collide: its id, `--long` and `-s`.
///
/// Each entry pairs a namespaced key with the name shown in errors.
pub fn flag_keys(arg: &Arg) -> Vec<(String, String)> {
    let id = arg.get_id().to_string();
    let mut keys = vec![(format!("id:{}", id), id)];
    if let Some(long) = arg.get_long() {
        let name = format!("--{}", long);
        keys.push((name.clone(), name));
    }
    if let Some(short) = arg.get_short() {
        let name = format!("-{}", short);
        keys.push((name.clone(), name));
    }
    keys
}

#[cfg(test)]
#[path = "flags_tests.rs"]
mod tests;
