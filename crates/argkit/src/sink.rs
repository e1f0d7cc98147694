use crate::argument::ArgId;

/// Receives the values of a successful parse.
///
/// Values are delivered after the whole parse (including sub-commands)
/// succeeded, argument by argument in registration order. Arguments that were
/// not given deliver their default values, if any.
pub trait ValueSink {
    fn store(&mut self, id: ArgId, name: &str, value: &str);
}

impl<F> ValueSink for F
where
    F: FnMut(ArgId, &str, &str),
{
    fn store(&mut self, id: ArgId, name: &str, value: &str) {
        self(id, name, value)
    }
}
