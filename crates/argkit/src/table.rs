/// Program name plus the tokens to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentTable {
    app_name: String,
    tokens: Vec<String>,
}

impl ArgumentTable {
    pub fn new<I, S>(app_name: impl Into<String>, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            app_name: app_name.into(),
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from a full argument vector; element 0 is the program name.
    pub fn from_argv<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let app_name = argv.next().unwrap_or_default();
        Self {
            app_name,
            tokens: argv.collect(),
        }
    }

    /// Arguments of the current process. Non UTF-8 arguments are converted lossily.
    pub fn from_env() -> Self {
        Self::from_argv(std::env::args_os().map(|a| a.to_string_lossy().into_owned()))
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}
