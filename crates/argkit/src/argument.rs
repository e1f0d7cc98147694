use std::sync::atomic::{AtomicU32, Ordering};

use indexmap::IndexMap;

use crate::error::ConfigError;
use crate::literals::Literals;
use crate::name_table::validate_name;
use crate::parser::Parser;

static NEXT_SCOPE: AtomicU32 = AtomicU32::new(1);

pub(crate) fn next_scope() -> u32 {
    NEXT_SCOPE.fetch_add(1, Ordering::Relaxed)
}

/// Stable identity of a registered argument.
///
/// Ids are only meaningful for the parser that issued them; looking one up in
/// another parser (including a nested sub-parser) finds nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArgId {
    pub(crate) scope: u32,
    pub(crate) index: usize,
}

/// Upper bound on how many times an argument may be given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxCount {
    Limited(usize),
    Unlimited,
}

impl MaxCount {
    pub(crate) fn is_reached(self, count: usize) -> bool {
        match self {
            Self::Limited(max) => count >= max,
            Self::Unlimited => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Switch,
    Valued,
    Positional,
    Exclusive,
    Subcommands,
}

#[derive(Debug, Clone)]
pub(crate) enum Payload {
    Switch,
    Valued,
    Positional,
    Exclusive,
    Subcommands(IndexMap<String, Parser>),
}

#[derive(Debug, Clone)]
pub(crate) struct Definition {
    pub(crate) names: Vec<String>,
    pub(crate) description: String,
    pub(crate) min_count: usize,
    pub(crate) max_count: MaxCount,
    pub(crate) default_values: Vec<String>,
    pub(crate) allowed_values: Vec<String>,
    pub(crate) group: Option<usize>,
    pub(crate) payload: Payload,
}

impl Definition {
    pub(crate) fn new(names: Vec<String>, payload: Payload, group: Option<usize>) -> Self {
        let min_count = match payload {
            Payload::Subcommands(_) => 1,
            _ => 0,
        };
        Self {
            names,
            description: String::new(),
            min_count,
            max_count: MaxCount::Limited(1),
            default_values: Vec::new(),
            allowed_values: Vec::new(),
            group,
            payload,
        }
    }

    pub(crate) fn kind(&self) -> ArgKind {
        match self.payload {
            Payload::Switch => ArgKind::Switch,
            Payload::Valued => ArgKind::Valued,
            Payload::Positional => ArgKind::Positional,
            Payload::Exclusive => ArgKind::Exclusive,
            Payload::Subcommands(_) => ArgKind::Subcommands,
        }
    }

    /// First registered name, used in error messages.
    pub(crate) fn display_name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or_default()
    }
}

/// Read-only view of a registered argument, for help renderers and tooling.
#[derive(Debug, Clone, Copy)]
pub struct ArgumentInfo<'p> {
    pub(crate) id: ArgId,
    pub(crate) def: &'p Definition,
}

impl<'p> ArgumentInfo<'p> {
    pub fn id(&self) -> ArgId {
        self.id
    }

    pub fn kind(&self) -> ArgKind {
        self.def.kind()
    }

    pub fn names(&self) -> &'p [String] {
        &self.def.names
    }

    pub fn description(&self) -> &'p str {
        &self.def.description
    }

    pub fn min_count(&self) -> usize {
        self.def.min_count
    }

    pub fn max_count(&self) -> MaxCount {
        self.def.max_count
    }

    pub fn default_values(&self) -> &'p [String] {
        &self.def.default_values
    }

    pub fn allowed_values(&self) -> &'p [String] {
        &self.def.allowed_values
    }

    /// Index into [`Parser::groups`] when registered through a group.
    pub fn group(&self) -> Option<usize> {
        self.def.group
    }

    /// Sub-command names with their parsers, in registration order.
    pub fn subcommands(&self) -> impl Iterator<Item = (&'p str, &'p Parser)> + 'p {
        let parsers = match &self.def.payload {
            Payload::Subcommands(parsers) => Some(parsers),
            _ => None,
        };
        parsers
            .into_iter()
            .flat_map(|p| p.iter().map(|(name, parser)| (name.as_str(), parser)))
    }
}

macro_rules! arity_setters {
    ($handle:ident) => {
        impl<'r> $handle<'r> {
            pub fn id(&self) -> ArgId {
                self.id
            }

            pub fn set_description(self, description: impl Into<String>) -> Self {
                self.def.description = description.into();
                self
            }

            pub fn set_min_count(self, count: usize) -> Self {
                self.def.min_count = count;
                self
            }

            pub fn set_max_count(self, count: usize) -> Self {
                self.def.max_count = MaxCount::Limited(count);
                self
            }

            pub fn set_max_count_unlimited(self) -> Self {
                self.def.max_count = MaxCount::Unlimited;
                self
            }
        }
    };
}

macro_rules! value_setters {
    ($handle:ident) => {
        impl<'r> $handle<'r> {
            pub fn set_default_value(self, value: impl Into<String>) -> Self {
                self.def.default_values = vec![value.into()];
                self
            }

            /// Values reported when the argument is absent. They must be among
            /// the allowed values, if any; otherwise every parse that relies on
            /// them fails with `InvalidValue`.
            pub fn set_default_values<I, S>(self, values: I) -> Self
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                self.def.default_values = values.into_iter().map(Into::into).collect();
                self
            }

            /// Restrict accepted values. An empty set accepts anything.
            pub fn set_allowed_values<I, S>(self, values: I) -> Self
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                self.def.allowed_values = values.into_iter().map(Into::into).collect();
                self
            }
        }
    };
}

/// A flag without a value (`--verbose`).
#[derive(Debug)]
pub struct SwitchArg<'r> {
    pub(crate) def: &'r mut Definition,
    pub(crate) id: ArgId,
}

/// A named option taking one value per occurrence (`--output out.txt`).
#[derive(Debug)]
pub struct ValuedArg<'r> {
    pub(crate) def: &'r mut Definition,
    pub(crate) id: ArgId,
}

/// An argument matched by position among the leftover tokens.
#[derive(Debug)]
pub struct PositionalArg<'r> {
    pub(crate) def: &'r mut Definition,
    pub(crate) id: ArgId,
}

/// A set of switch-like alternatives of which only one may be used.
///
/// The recorded value is the alias the user typed.
#[derive(Debug)]
pub struct ExclusiveArg<'r> {
    pub(crate) def: &'r mut Definition,
    pub(crate) id: ArgId,
}

arity_setters!(SwitchArg);
arity_setters!(ValuedArg);
arity_setters!(PositionalArg);
arity_setters!(ExclusiveArg);
value_setters!(ValuedArg);
value_setters!(PositionalArg);

/// Dispatcher selecting a nested parser by the first positional token.
#[derive(Debug)]
pub struct SubcommandSet<'r> {
    pub(crate) def: &'r mut Definition,
    pub(crate) id: ArgId,
    pub(crate) literals: &'r Literals,
}

impl<'r> SubcommandSet<'r> {
    pub fn id(&self) -> ArgId {
        self.id
    }

    pub fn set_description(self, description: impl Into<String>) -> Self {
        self.def.description = description.into();
        self
    }

    /// `0` makes the sub-command optional.
    pub fn set_min_count(self, count: usize) -> Self {
        self.def.min_count = count;
        self
    }

    /// Register a sub-command and return its parser for configuration.
    ///
    /// The nested parser inherits this parser's literals.
    pub fn add_parser(&mut self, name: impl Into<String>) -> Result<&mut Parser, ConfigError> {
        let name = name.into();
        validate_name(&name, self.literals)?;

        if !matches!(self.def.payload, Payload::Subcommands(_)) {
            return Err(ConfigError::StructuralConflict {
                name: self.def.display_name().to_string(),
                reason: "not a subcommand argument",
            });
        }
        let Payload::Subcommands(parsers) = &mut self.def.payload else {
            unreachable!("payload checked above");
        };
        if parsers.contains_key(&name) {
            return Err(ConfigError::DuplicateName(name));
        }

        tracing::debug!(subcommand = %name, "registering subcommand parser");
        let parser = parsers
            .entry(name)
            .or_insert_with(|| Parser::with_literals(self.literals.clone()));
        Ok(parser)
    }

    /// Parser of an already registered sub-command.
    pub fn parser(&mut self, name: &str) -> Option<&mut Parser> {
        match &mut self.def.payload {
            Payload::Subcommands(parsers) => parsers.get_mut(name),
            _ => None,
        }
    }
}
