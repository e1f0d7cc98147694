use std::collections::HashMap;

use crate::error::ConfigError;
use crate::literals::Literals;

/// Registered names of one repository, each mapping to an arena index.
#[derive(Debug, Clone, Default)]
pub(crate) struct NameTable {
    lookup: HashMap<String, usize>,
}

impl NameTable {
    pub(crate) fn get(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    /// Check a whole name set before anything is inserted.
    pub(crate) fn check(&self, names: &[String], literals: &Literals) -> Result<(), ConfigError> {
        if names.is_empty() {
            return Err(ConfigError::InvalidName {
                name: String::new(),
                reason: "no names given",
            });
        }

        for name in names {
            validate_name(name, literals)?;
        }

        for (i, name) in names.iter().enumerate() {
            if names[i + 1..].contains(name) {
                return Err(ConfigError::DuplicateName(name.clone()));
            }
        }

        if let Some(taken) = names.iter().find(|n| self.lookup.contains_key(n.as_str())) {
            return Err(ConfigError::DuplicateName(taken.clone()));
        }

        Ok(())
    }

    /// Insert names previously accepted by [`NameTable::check`].
    pub(crate) fn insert(&mut self, names: &[String], index: usize) {
        for name in names {
            self.lookup.insert(name.clone(), index);
        }
    }
}

/// Character rules shared by argument names and sub-command names.
pub(crate) fn validate_name(name: &str, literals: &Literals) -> Result<(), ConfigError> {
    let invalid = |reason| ConfigError::InvalidName {
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("name must not be empty"));
    }
    for c in name.chars() {
        if c.is_whitespace() {
            return Err(invalid("name must not contain whitespace characters"));
        }
        if c == literals.value_separator {
            return Err(invalid("name must not contain the value separator"));
        }
        if c == literals.subcommand_separator {
            return Err(invalid("name must not contain the subcommand separator"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn check(table: &NameTable, list: &[&str]) -> Result<(), ConfigError> {
        table.check(&names(list), &Literals::default())
    }

    #[test]
    fn rejects_empty_name_set() {
        let err = check(&NameTable::default(), &[]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidName { reason: "no names given", .. }));
    }

    #[test]
    fn rejects_bad_characters() {
        let table = NameTable::default();
        for bad in ["", "--a b", "--a\tb", "--a=b", "--a/b"] {
            let err = check(&table, &["-x", bad]).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidName { ref name, .. } if name == bad),
                "expected InvalidName for {bad:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn custom_separators_change_the_forbidden_characters() {
        let literals = Literals::default()
            .value_separator(':')
            .subcommand_separator('.');
        assert!(validate_name("--a=b", &literals).is_ok());
        assert!(validate_name("--a/b", &literals).is_ok());
        assert!(validate_name("--a:b", &literals).is_err());
        assert!(validate_name("--a.b", &literals).is_err());
    }

    #[test]
    fn rejects_duplicates_within_one_call() {
        let err = check(&NameTable::default(), &["-v", "--verbose", "-v"]).unwrap_err();
        assert_eq!(err, ConfigError::DuplicateName("-v".to_string()));
    }

    #[test]
    fn rejects_already_registered_names() {
        let mut table = NameTable::default();
        table.insert(&names(&["-v", "--verbose"]), 0);

        let err = check(&table, &["-q", "--verbose"]).unwrap_err();
        assert_eq!(err, ConfigError::DuplicateName("--verbose".to_string()));
        assert_eq!(table.get("-q"), None);
    }

    #[test]
    fn every_alias_maps_to_the_same_index() {
        let mut table = NameTable::default();
        let set = names(&["-o", "--output"]);
        check(&table, &["-o", "--output"]).unwrap();
        table.insert(&set, 3);
        assert_eq!(table.get("-o"), Some(3));
        assert_eq!(table.get("--output"), Some(3));
    }
}
