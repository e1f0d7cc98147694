use crate::argument::{
    ArgId, ArgumentInfo, ExclusiveArg, PositionalArg, SubcommandSet, SwitchArg, ValuedArg,
};
use crate::engine;
use crate::error::{ConfigError, ParseError};
use crate::group::{ArgumentGroup, collect_names};
use crate::literals::Literals;
use crate::repository::{Group, Repository};
use crate::results::{ArgKey, Results};
use crate::sink::ValueSink;
use crate::table::ArgumentTable;

/// Argument registry of one command plus the entry point for parsing.
///
/// Registration needs `&mut self`; parsing only borrows the parser, so one
/// configured parser can serve any number of parses.
///
/// A clone is an independent parser: ids of the original do not resolve in it.
#[derive(Debug, Clone)]
pub struct Parser {
    pub(crate) repository: Repository,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self::with_literals(Literals::default())
    }

    pub fn with_literals(literals: Literals) -> Self {
        Self {
            repository: Repository::new(literals),
        }
    }

    pub fn literals(&self) -> &Literals {
        &self.repository.literals
    }

    pub fn add_switch<I, S>(&mut self, names: I) -> Result<SwitchArg<'_>, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let index = self.repository.add_switch(collect_names(names), None)?;
        Ok(self.repository.switch_arg(index))
    }

    pub fn add_valued<I, S>(&mut self, names: I) -> Result<ValuedArg<'_>, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let index = self.repository.add_valued(collect_names(names), None)?;
        Ok(self.repository.valued_arg(index))
    }

    pub fn add_exclusive<I, S>(&mut self, names: I) -> Result<ExclusiveArg<'_>, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let index = self.repository.add_exclusive(collect_names(names), None)?;
        Ok(self.repository.exclusive_arg(index))
    }

    /// Positionals are consumed in registration order. A slot whose max count
    /// is not exactly one keeps every following token, so it must come last.
    pub fn add_positional(&mut self, name: impl Into<String>) -> Result<PositionalArg<'_>, ConfigError> {
        let index = self.repository.add_positional(name.into(), None)?;
        Ok(self.repository.positional_arg(index))
    }

    /// Register the sub-command dispatcher. A parser has either positionals
    /// or one dispatcher.
    pub fn add_subparsers(&mut self, name: impl Into<String>) -> Result<SubcommandSet<'_>, ConfigError> {
        let index = self.repository.add_subparsers(name.into())?;
        Ok(self.repository.subcommand_set(index))
    }

    /// The registered dispatcher, to add more sub-commands later.
    pub fn subparsers(&mut self) -> Option<SubcommandSet<'_>> {
        let index = self.repository.dispatcher?;
        Some(self.repository.subcommand_set(index))
    }

    pub fn add_group(&mut self, name: impl Into<String>) -> ArgumentGroup<'_> {
        let index = self.repository.add_group(name.into());
        ArgumentGroup {
            repo: &mut self.repository,
            index,
        }
    }

    pub fn groups(&self) -> &[Group] {
        &self.repository.groups
    }

    /// Registered arguments in registration order.
    pub fn arguments(&self) -> impl Iterator<Item = ArgumentInfo<'_>> {
        let repo = &self.repository;
        repo.definitions
            .iter()
            .enumerate()
            .map(|(index, def)| ArgumentInfo {
                id: repo.id(index),
                def,
            })
    }

    pub fn argument(&self, key: impl ArgKey) -> Option<ArgumentInfo<'_>> {
        let id = key.arg_id(self)?;
        let index = self.repository.index_of(id)?;
        Some(ArgumentInfo {
            id,
            def: &self.repository.definitions[index],
        })
    }

    /// Id of the argument registered under `name`.
    pub fn find(&self, name: &str) -> Option<ArgId> {
        self.repository
            .lookup(name)
            .map(|index| self.repository.id(index))
    }

    pub fn parse(&self, table: &ArgumentTable) -> Result<Results<'_>, ParseError> {
        self.parse_with_sink(table, None)
    }

    /// Parse a full argument vector whose first element is the program name.
    pub fn parse_argv<I, S>(&self, argv: I) -> Result<Results<'_>, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parse(&ArgumentTable::from_argv(argv))
    }

    /// Parse and, on success, hand every value to `sink`.
    pub fn parse_with_sink(
        &self,
        table: &ArgumentTable,
        sink: Option<&mut dyn ValueSink>,
    ) -> Result<Results<'_>, ParseError> {
        tracing::debug!(
            app = table.app_name(),
            tokens = table.tokens().len(),
            "parsing arguments"
        );
        let results = engine::run(self, table.app_name().to_string(), table.tokens())?;
        if let Some(sink) = sink {
            results.feed(sink);
        }
        Ok(results)
    }
}
