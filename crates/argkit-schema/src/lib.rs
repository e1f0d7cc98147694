//! Declarative parser schemas.
//!
//! A [`ParserSchema`] describes the arguments of a command (and, recursively,
//! of its sub-commands) as JSON. [`ParserSchema::build`] registers everything
//! into an [`argkit::Parser`], so registration errors surface the same way as
//! with hand-written registration code.

use std::fs;
use std::path::Path;

use argkit::{
    ArgumentGroup, ConfigError, ExclusiveArg, Literals, Parser, PositionalArg, SwitchArg, ValuedArg,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default schema file name looked up in the working directory.
pub const DEFAULT_SCHEMA_NAME: &str = "argkit.json";

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read schema {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse schema JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{path}: {source}")]
    Config { path: String, source: ConfigError },

    #[error("{path}: '{field}' is not supported for {kind} arguments")]
    Unsupported {
        path: String,
        field: &'static str,
        kind: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgKindSchema {
    Switch,
    Valued,
    Positional,
    Exclusive,
}

impl ArgKindSchema {
    fn as_str(self) -> &'static str {
        match self {
            Self::Switch => "switch",
            Self::Valued => "valued",
            Self::Positional => "positional",
            Self::Exclusive => "exclusive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unlimited {
    Unlimited,
}

/// `"max-count": 3` or `"max-count": "unlimited"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaxCountSchema {
    Limited(usize),
    Unlimited(Unlimited),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArgSchema {
    pub kind: ArgKindSchema,
    pub names: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_count: Option<MaxCountSchema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub default_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GroupSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgSchema>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SubcommandsSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_count: Option<usize>,
    #[serde(default)]
    pub commands: IndexMap<String, ParserSchema>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LiteralsSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_separator: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcommand_separator: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switch_enabled: Option<String>,
}

impl LiteralsSchema {
    fn to_literals(&self) -> Literals {
        let mut literals = Literals::default();
        if let Some(c) = self.value_separator {
            literals = literals.value_separator(c);
        }
        if let Some(c) = self.subcommand_separator {
            literals = literals.subcommand_separator(c);
        }
        if let Some(s) = &self.switch_enabled {
            literals = literals.switch_enabled(s.clone());
        }
        literals
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParserSchema {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Only honoured on the top-level schema; sub-commands inherit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literals: Option<LiteralsSchema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgSchema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcommands: Option<SubcommandsSchema>,
}

impl ParserSchema {
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        let contents = fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Register every declared argument into a new parser.
    pub fn build(&self) -> Result<Parser, SchemaError> {
        let literals = self
            .literals
            .as_ref()
            .map(LiteralsSchema::to_literals)
            .unwrap_or_default();
        let mut parser = Parser::with_literals(literals);
        let root = if self.name.is_empty() {
            "<root>".to_string()
        } else {
            self.name.clone()
        };
        self.register_into(&mut parser, &root)?;
        Ok(parser)
    }

    fn register_into(&self, parser: &mut Parser, path: &str) -> Result<(), SchemaError> {
        for arg in &self.args {
            register_arg(&mut *parser, arg, path)?;
        }

        for group in &self.groups {
            let mut target = parser.add_group(group.name.clone());
            target.set_description(group.description.clone());
            let group_path = format!("{path} > {}", group.name);
            for arg in &group.args {
                register_arg(&mut target, arg, &group_path)?;
            }
        }

        if let Some(subcommands) = &self.subcommands {
            let config = |source: ConfigError| SchemaError::Config {
                path: path.to_string(),
                source,
            };
            let mut set = parser
                .add_subparsers(subcommands.name.clone())
                .map_err(config)?
                .set_description(subcommands.description.clone());
            if let Some(min) = subcommands.min_count {
                set = set.set_min_count(min);
            }
            for (name, schema) in &subcommands.commands {
                tracing::debug!(subcommand = %name, "building subcommand parser");
                let nested = set.add_parser(name.clone()).map_err(config)?;
                schema.register_into(nested, &format!("{path} > {name}"))?;
            }
        }

        Ok(())
    }

    /// Schema written by `argkit init`.
    pub fn sample() -> Self {
        let arg = |kind, names: &[&str], description: &str| ArgSchema {
            kind,
            names: names.iter().map(|s| s.to_string()).collect(),
            description: description.to_string(),
            min_count: None,
            max_count: None,
            default_values: Vec::new(),
            allowed_values: Vec::new(),
        };

        let mut build = ParserSchema {
            description: "Build the project".to_string(),
            ..Default::default()
        };
        build.args.push(ArgSchema {
            default_values: vec!["debug".to_string()],
            allowed_values: vec!["debug".to_string(), "release".to_string()],
            ..arg(ArgKindSchema::Valued, &["-p", "--profile"], "Build profile")
        });
        build.args.push(ArgSchema {
            max_count: Some(MaxCountSchema::Unlimited(Unlimited::Unlimited)),
            ..arg(ArgKindSchema::Positional, &["targets"], "Targets to build")
        });

        ParserSchema {
            name: "my-cli".to_string(),
            description: "Example command line".to_string(),
            literals: None,
            args: vec![arg(ArgKindSchema::Switch, &["-v", "--verbose"], "Verbose output")],
            groups: vec![GroupSchema {
                name: "Output".to_string(),
                description: "Output format".to_string(),
                args: vec![arg(ArgKindSchema::Exclusive, &["--json", "--text"], "Output format")],
            }],
            subcommands: Some(SubcommandsSchema {
                name: "command".to_string(),
                description: "Command to run".to_string(),
                min_count: None,
                commands: IndexMap::from([("build".to_string(), build)]),
            }),
        }
    }
}

/// Where schema arguments get registered: the parser itself or one of its groups.
trait Target {
    fn switch(&mut self, names: Vec<String>) -> Result<SwitchArg<'_>, ConfigError>;
    fn valued(&mut self, names: Vec<String>) -> Result<ValuedArg<'_>, ConfigError>;
    fn positional(&mut self, name: String) -> Result<PositionalArg<'_>, ConfigError>;
    fn exclusive(&mut self, names: Vec<String>) -> Result<ExclusiveArg<'_>, ConfigError>;
}

impl Target for Parser {
    fn switch(&mut self, names: Vec<String>) -> Result<SwitchArg<'_>, ConfigError> {
        self.add_switch(names)
    }
    fn valued(&mut self, names: Vec<String>) -> Result<ValuedArg<'_>, ConfigError> {
        self.add_valued(names)
    }
    fn positional(&mut self, name: String) -> Result<PositionalArg<'_>, ConfigError> {
        self.add_positional(name)
    }
    fn exclusive(&mut self, names: Vec<String>) -> Result<ExclusiveArg<'_>, ConfigError> {
        self.add_exclusive(names)
    }
}

impl Target for ArgumentGroup<'_> {
    fn switch(&mut self, names: Vec<String>) -> Result<SwitchArg<'_>, ConfigError> {
        self.add_switch(names)
    }
    fn valued(&mut self, names: Vec<String>) -> Result<ValuedArg<'_>, ConfigError> {
        self.add_valued(names)
    }
    fn positional(&mut self, name: String) -> Result<PositionalArg<'_>, ConfigError> {
        self.add_positional(name)
    }
    fn exclusive(&mut self, names: Vec<String>) -> Result<ExclusiveArg<'_>, ConfigError> {
        self.add_exclusive(names)
    }
}

macro_rules! configure_arity {
    ($handle:expr, $arg:expr) => {{
        let mut handle = $handle.set_description($arg.description.clone());
        if let Some(min) = $arg.min_count {
            handle = handle.set_min_count(min);
        }
        match $arg.max_count {
            Some(MaxCountSchema::Limited(max)) => handle.set_max_count(max),
            Some(MaxCountSchema::Unlimited(_)) => handle.set_max_count_unlimited(),
            None => handle,
        }
    }};
}

fn register_arg(target: &mut impl Target, arg: &ArgSchema, path: &str) -> Result<(), SchemaError> {
    let config = |source: ConfigError| SchemaError::Config {
        path: path.to_string(),
        source,
    };
    let names = arg.names.clone();

    match arg.kind {
        ArgKindSchema::Switch | ArgKindSchema::Exclusive => {
            if !arg.default_values.is_empty() || !arg.allowed_values.is_empty() {
                let field = if arg.default_values.is_empty() {
                    "allowed-values"
                } else {
                    "default-values"
                };
                return Err(SchemaError::Unsupported {
                    path: format!("{path} > {}", names.join(", ")),
                    field,
                    kind: arg.kind.as_str(),
                });
            }
            if arg.kind == ArgKindSchema::Switch {
                configure_arity!(target.switch(names).map_err(config)?, arg);
            } else {
                configure_arity!(target.exclusive(names).map_err(config)?, arg);
            }
        }
        ArgKindSchema::Valued => {
            let handle = configure_arity!(target.valued(names).map_err(config)?, arg);
            handle
                .set_default_values(arg.default_values.clone())
                .set_allowed_values(arg.allowed_values.clone());
        }
        ArgKindSchema::Positional => {
            let mut names = names.into_iter();
            let name = names.next().unwrap_or_default();
            if let Some(extra) = names.next() {
                return Err(SchemaError::Config {
                    path: path.to_string(),
                    source: ConfigError::InvalidName {
                        name: extra,
                        reason: "positional arguments take exactly one name",
                    },
                });
            }
            let handle = configure_arity!(target.positional(name).map_err(config)?, arg);
            handle
                .set_default_values(arg.default_values.clone())
                .set_allowed_values(arg.allowed_values.clone());
        }
    }
    Ok(())
}
