use indexmap::IndexMap;

use crate::argument::{
    ArgId, Definition, ExclusiveArg, Payload, PositionalArg, SubcommandSet, SwitchArg, ValuedArg,
    next_scope,
};
use crate::error::ConfigError;
use crate::literals::Literals;
use crate::name_table::NameTable;

/// A named set of arguments, kept for help renderers.
#[derive(Debug, Clone)]
pub struct Group {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) members: Vec<ArgId>,
}

impl Group {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn members(&self) -> &[ArgId] {
        &self.members
    }
}

/// Owns every definition of one parsing scope.
///
/// Definitions live in an arena and are referred to by index; the name table,
/// positional order and results only hold indices.
#[derive(Debug)]
pub(crate) struct Repository {
    pub(crate) scope: u32,
    pub(crate) literals: Literals,
    pub(crate) definitions: Vec<Definition>,
    pub(crate) names: NameTable,
    pub(crate) positionals: Vec<usize>,
    pub(crate) dispatcher: Option<usize>,
    pub(crate) groups: Vec<Group>,
}

/// A clone is a new scope: ids issued by the original never resolve in it.
impl Clone for Repository {
    fn clone(&self) -> Self {
        let scope = next_scope();
        let groups = self
            .groups
            .iter()
            .map(|group| Group {
                name: group.name.clone(),
                description: group.description.clone(),
                members: group
                    .members
                    .iter()
                    .map(|id| ArgId {
                        scope,
                        index: id.index,
                    })
                    .collect(),
            })
            .collect();

        Self {
            scope,
            literals: self.literals.clone(),
            definitions: self.definitions.clone(),
            names: self.names.clone(),
            positionals: self.positionals.clone(),
            dispatcher: self.dispatcher,
            groups,
        }
    }
}

impl Repository {
    pub(crate) fn new(literals: Literals) -> Self {
        Self {
            scope: next_scope(),
            literals,
            definitions: Vec::new(),
            names: NameTable::default(),
            positionals: Vec::new(),
            dispatcher: None,
            groups: Vec::new(),
        }
    }

    pub(crate) fn id(&self, index: usize) -> ArgId {
        ArgId {
            scope: self.scope,
            index,
        }
    }

    /// Arena index for `id`, if it was issued by this repository.
    pub(crate) fn index_of(&self, id: ArgId) -> Option<usize> {
        (id.scope == self.scope && id.index < self.definitions.len()).then_some(id.index)
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<usize> {
        self.names.get(name)
    }

    pub(crate) fn add_switch(&mut self, names: Vec<String>, group: Option<usize>) -> Result<usize, ConfigError> {
        self.register(names, Payload::Switch, group)
    }

    pub(crate) fn add_valued(&mut self, names: Vec<String>, group: Option<usize>) -> Result<usize, ConfigError> {
        self.register(names, Payload::Valued, group)
    }

    pub(crate) fn add_exclusive(&mut self, names: Vec<String>, group: Option<usize>) -> Result<usize, ConfigError> {
        self.register(names, Payload::Exclusive, group)
    }

    pub(crate) fn add_positional(&mut self, name: String, group: Option<usize>) -> Result<usize, ConfigError> {
        self.register(vec![name], Payload::Positional, group)
    }

    pub(crate) fn add_subparsers(&mut self, name: String) -> Result<usize, ConfigError> {
        self.register(vec![name], Payload::Subcommands(IndexMap::new()), None)
    }

    pub(crate) fn add_group(&mut self, name: String) -> usize {
        self.groups.push(Group {
            name,
            description: String::new(),
            members: Vec::new(),
        });
        self.groups.len() - 1
    }

    pub(crate) fn switch_arg(&mut self, index: usize) -> SwitchArg<'_> {
        SwitchArg {
            id: self.id(index),
            def: &mut self.definitions[index],
        }
    }

    pub(crate) fn valued_arg(&mut self, index: usize) -> ValuedArg<'_> {
        ValuedArg {
            id: self.id(index),
            def: &mut self.definitions[index],
        }
    }

    pub(crate) fn positional_arg(&mut self, index: usize) -> PositionalArg<'_> {
        PositionalArg {
            id: self.id(index),
            def: &mut self.definitions[index],
        }
    }

    pub(crate) fn exclusive_arg(&mut self, index: usize) -> ExclusiveArg<'_> {
        ExclusiveArg {
            id: self.id(index),
            def: &mut self.definitions[index],
        }
    }

    pub(crate) fn subcommand_set(&mut self, index: usize) -> SubcommandSet<'_> {
        SubcommandSet {
            id: self.id(index),
            def: &mut self.definitions[index],
            literals: &self.literals,
        }
    }

    fn register(
        &mut self,
        names: Vec<String>,
        payload: Payload,
        group: Option<usize>,
    ) -> Result<usize, ConfigError> {
        self.names.check(&names, &self.literals)?;
        self.check_structure(&names, &payload)?;

        let index = self.definitions.len();
        self.names.insert(&names, index);
        match payload {
            Payload::Positional => self.positionals.push(index),
            Payload::Subcommands(_) => self.dispatcher = Some(index),
            _ => {}
        }
        if let Some(group) = group.and_then(|g| self.groups.get_mut(g)) {
            group.members.push(ArgId {
                scope: self.scope,
                index,
            });
        }

        tracing::trace!(names = ?names, index, "registered argument");
        self.definitions.push(Definition::new(names, payload, group));
        Ok(index)
    }

    fn check_structure(&self, names: &[String], payload: &Payload) -> Result<(), ConfigError> {
        let conflict = |reason| ConfigError::StructuralConflict {
            name: names.first().cloned().unwrap_or_default(),
            reason,
        };

        match payload {
            Payload::Positional if self.dispatcher.is_some() => {
                Err(conflict("subcommand argument already registered"))
            }
            Payload::Subcommands(_) if self.dispatcher.is_some() => {
                Err(conflict("subcommand argument already registered"))
            }
            Payload::Subcommands(_) if !self.positionals.is_empty() => {
                Err(conflict("positional arguments already registered"))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> Repository {
        Repository::new(Literals::default())
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn positional_order_follows_registration() {
        let mut r = repo();
        let a = r.add_positional("first".into(), None).unwrap();
        r.add_switch(names(&["-v"]), None).unwrap();
        let b = r.add_positional("second".into(), None).unwrap();
        assert_eq!(r.positionals, vec![a, b]);
        assert_eq!(r.definitions.len(), 3);
    }

    #[test]
    fn positional_after_dispatcher_is_rejected() {
        let mut r = repo();
        r.add_subparsers("command".into()).unwrap();
        let err = r.add_positional("file".into(), None).unwrap_err();
        assert!(matches!(err, ConfigError::StructuralConflict { .. }));
        assert_eq!(r.lookup("file"), None);
        assert!(r.positionals.is_empty());
    }

    #[test]
    fn dispatcher_after_positional_is_rejected() {
        let mut r = repo();
        r.add_positional("file".into(), None).unwrap();
        let err = r.add_subparsers("command".into()).unwrap_err();
        assert!(matches!(err, ConfigError::StructuralConflict { .. }));
        assert_eq!(r.dispatcher, None);
        assert_eq!(r.definitions.len(), 1);
    }

    #[test]
    fn second_dispatcher_is_rejected() {
        let mut r = repo();
        r.add_subparsers("command".into()).unwrap();
        let err = r.add_subparsers("other".into()).unwrap_err();
        assert!(matches!(err, ConfigError::StructuralConflict { .. }));
    }

    #[test]
    fn name_errors_take_precedence_over_structure() {
        let mut r = repo();
        r.add_subparsers("command".into()).unwrap();
        let err = r.add_positional("command".into(), None).unwrap_err();
        assert_eq!(err, ConfigError::DuplicateName("command".to_string()));
    }

    #[test]
    fn duplicate_names_across_kinds() {
        let mut r = repo();
        r.add_switch(names(&["-v", "--verbose"]), None).unwrap();
        assert!(matches!(
            r.add_valued(names(&["--verbose"]), None),
            Err(ConfigError::DuplicateName(_))
        ));
        assert!(matches!(
            r.add_positional("-v".into(), None),
            Err(ConfigError::DuplicateName(_))
        ));
        assert!(matches!(
            r.add_exclusive(names(&["--json", "-v"]), None),
            Err(ConfigError::DuplicateName(_))
        ));
        assert_eq!(r.definitions.len(), 1);
    }

    #[test]
    fn group_members_are_tracked() {
        let mut r = repo();
        let g = r.add_group("Output".into());
        let a = r.add_switch(names(&["--json"]), Some(g)).unwrap();
        r.add_switch(names(&["--quiet"]), None).unwrap();
        assert_eq!(r.groups[g].members(), &[r.id(a)]);
        assert_eq!(r.definitions[a].group, Some(g));
    }

    #[test]
    fn ids_from_other_scopes_do_not_resolve() {
        let mut a = repo();
        let b = repo();
        let index = a.add_switch(names(&["-v"]), None).unwrap();
        let id = a.id(index);
        assert_eq!(a.index_of(id), Some(index));
        assert_eq!(b.index_of(id), None);
    }

    #[test]
    fn subcommand_set_over_a_plain_argument_refuses_parsers() {
        let mut r = repo();
        let index = r.add_switch(names(&["-v"]), None).unwrap();
        let mut set = r.subcommand_set(index);
        let err = set.add_parser("build").unwrap_err();
        assert_eq!(
            err,
            ConfigError::StructuralConflict {
                name: "-v".to_string(),
                reason: "not a subcommand argument",
            }
        );
        assert!(set.parser("build").is_none());
    }

    #[test]
    fn clone_gets_its_own_scope() {
        let mut r = repo();
        let g = r.add_group("Output".into());
        let index = r.add_switch(names(&["--json"]), Some(g)).unwrap();
        let id = r.id(index);

        let copy = r.clone();
        assert_ne!(copy.scope, r.scope);
        assert_eq!(copy.index_of(id), None);
        assert_eq!(copy.lookup("--json"), Some(index));
        assert_eq!(copy.groups[g].members(), &[copy.id(index)]);
    }
}
