/// Characters and strings with a fixed meaning while parsing.
///
/// `value_separator` splits `--name=value` tokens and `subcommand_separator`
/// joins nested application names (`app/build`). Neither may appear inside an
/// argument name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literals {
    pub value_separator: char,
    pub subcommand_separator: char,
    /// Value recorded for every occurrence of a switch.
    pub switch_enabled: String,
}

impl Default for Literals {
    fn default() -> Self {
        Self {
            value_separator: '=',
            subcommand_separator: '/',
            switch_enabled: "1".to_string(),
        }
    }
}

impl Literals {
    pub fn value_separator(mut self, c: char) -> Self {
        self.value_separator = c;
        self
    }

    pub fn subcommand_separator(mut self, c: char) -> Self {
        self.subcommand_separator = c;
        self
    }

    pub fn switch_enabled(mut self, value: impl Into<String>) -> Self {
        self.switch_enabled = value.into();
        self
    }

    /// Split `token` at the first value separator.
    pub(crate) fn split_inline<'t>(&self, token: &'t str) -> (&'t str, Option<&'t str>) {
        match token.split_once(self.value_separator) {
            Some((name, value)) => (name, Some(value)),
            None => (token, None),
        }
    }
}
