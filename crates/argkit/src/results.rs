use crate::argument::ArgId;
use crate::parser::Parser;
use crate::sink::ValueSink;

/// Something that identifies an argument of a parser: an [`ArgId`] or one of
/// its registered names.
pub trait ArgKey {
    fn arg_id(&self, parser: &Parser) -> Option<ArgId>;
}

impl ArgKey for ArgId {
    fn arg_id(&self, parser: &Parser) -> Option<ArgId> {
        parser.repository.index_of(*self).map(|_| *self)
    }
}

impl ArgKey for &str {
    fn arg_id(&self, parser: &Parser) -> Option<ArgId> {
        parser.find(self)
    }
}

impl ArgKey for &String {
    fn arg_id(&self, parser: &Parser) -> Option<ArgId> {
        parser.find(self)
    }
}

/// Values collected by one successful parse.
///
/// Borrows the parser that produced it; queries never mutate anything.
#[derive(Debug, Clone)]
pub struct Results<'p> {
    parser: &'p Parser,
    app_name: String,
    pub(crate) values: Vec<Vec<String>>,
    pub(crate) subcommand: Option<Box<Results<'p>>>,
}

impl<'p> Results<'p> {
    pub(crate) fn new(parser: &'p Parser, app_name: String) -> Self {
        Self {
            parser,
            app_name,
            values: vec![Vec::new(); parser.repository.definitions.len()],
            subcommand: None,
        }
    }

    /// Program name; for sub-commands it is joined with the parent's name.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn parser(&self) -> &'p Parser {
        self.parser
    }

    /// Number of recorded occurrences. Defaults are not counted.
    pub fn count(&self, key: impl ArgKey) -> usize {
        self.recorded(key).map_or(0, Vec::len)
    }

    pub fn is_present(&self, key: impl ArgKey) -> bool {
        self.count(key) > 0
    }

    /// Recorded values in input order, or the configured defaults when the
    /// argument was not given.
    pub fn values(&self, key: impl ArgKey) -> &[String] {
        let Some(index) = self.index(&key) else {
            return &[];
        };
        let recorded = &self.values[index];
        if recorded.is_empty() {
            &self.parser.repository.definitions[index].default_values
        } else {
            recorded
        }
    }

    /// Last value (the last occurrence wins), falling back to the last default.
    pub fn get(&self, key: impl ArgKey) -> Option<&str> {
        self.values(key).last().map(String::as_str)
    }

    /// Selected sub-command name and its results.
    pub fn subcommand(&self) -> Option<(&str, &Results<'p>)> {
        let nested = self.subcommand.as_deref()?;
        let index = self.parser.repository.dispatcher?;
        let name = self.values[index].first()?;
        Some((name.as_str(), nested))
    }

    fn index(&self, key: &impl ArgKey) -> Option<usize> {
        let id = key.arg_id(self.parser)?;
        self.parser.repository.index_of(id)
    }

    fn recorded(&self, key: impl ArgKey) -> Option<&Vec<String>> {
        self.index(&key).map(|index| &self.values[index])
    }

    pub(crate) fn feed(&self, sink: &mut dyn ValueSink) {
        let repo = &self.parser.repository;
        for (index, def) in repo.definitions.iter().enumerate() {
            let id = repo.id(index);
            for value in self.values(id) {
                sink.store(id, def.display_name(), value);
            }
        }
        if let Some(nested) = &self.subcommand {
            nested.feed(sink);
        }
    }
}
