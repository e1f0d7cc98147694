use crate::argument::{ExclusiveArg, PositionalArg, SwitchArg, ValuedArg};
use crate::error::ConfigError;
use crate::repository::Repository;

/// Registers arguments into the parser while recording them as members of
/// one named group.
#[derive(Debug)]
pub struct ArgumentGroup<'p> {
    pub(crate) repo: &'p mut Repository,
    pub(crate) index: usize,
}

impl ArgumentGroup<'_> {
    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.repo.groups[self.index].description = description.into();
        self
    }

    pub fn add_switch<I, S>(&mut self, names: I) -> Result<SwitchArg<'_>, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let index = self.repo.add_switch(collect_names(names), Some(self.index))?;
        Ok(self.repo.switch_arg(index))
    }

    pub fn add_valued<I, S>(&mut self, names: I) -> Result<ValuedArg<'_>, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let index = self.repo.add_valued(collect_names(names), Some(self.index))?;
        Ok(self.repo.valued_arg(index))
    }

    pub fn add_exclusive<I, S>(&mut self, names: I) -> Result<ExclusiveArg<'_>, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let index = self.repo.add_exclusive(collect_names(names), Some(self.index))?;
        Ok(self.repo.exclusive_arg(index))
    }

    pub fn add_positional(&mut self, name: impl Into<String>) -> Result<PositionalArg<'_>, ConfigError> {
        let index = self.repo.add_positional(name.into(), Some(self.index))?;
        Ok(self.repo.positional_arg(index))
    }
}

pub(crate) fn collect_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names.into_iter().map(Into::into).collect()
}
