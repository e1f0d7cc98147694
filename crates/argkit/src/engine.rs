//! Two-phase parse: named arguments first, then positionals or a sub-command.

use crate::argument::{MaxCount, Payload};
use crate::cursor::TokenCursor;
use crate::error::ParseError;
use crate::parser::Parser;
use crate::repository::Repository;
use crate::results::Results;

pub(crate) fn run<'p>(
    parser: &'p Parser,
    app_name: String,
    tokens: &[String],
) -> Result<Results<'p>, ParseError> {
    let mut engine = Engine {
        repo: &parser.repository,
        results: Results::new(parser, app_name),
    };
    let mut cursor = TokenCursor::new(tokens);

    engine.parse_named_arguments(&mut cursor)?;
    match engine.repo.dispatcher {
        Some(index) => engine.dispatch_subcommand(index, &mut cursor)?,
        None => engine.parse_positional_arguments(&mut cursor)?,
    }
    engine.check_min_counts()?;
    engine.check_defaults()?;

    Ok(engine.results)
}

struct Engine<'p> {
    repo: &'p Repository,
    results: Results<'p>,
}

impl<'p> Engine<'p> {
    fn parse_named_arguments(&mut self, cursor: &mut TokenCursor<'_>) -> Result<(), ParseError> {
        while cursor.has_more() {
            if !self.parse_named_argument(cursor)? {
                break;
            }
        }
        tracing::debug!(remaining = cursor.remaining().len(), "named arguments done");
        Ok(())
    }

    /// Returns `false` when the next token is not a named argument.
    fn parse_named_argument(&mut self, cursor: &mut TokenCursor<'_>) -> Result<bool, ParseError> {
        let repo = self.repo;
        let Some(token) = cursor.peek() else {
            return Ok(false);
        };
        let (name, inline_value) = repo.literals.split_inline(token);
        let Some(index) = repo.lookup(name) else {
            // not an argument name, leave it to the positional phase
            return Ok(false);
        };
        let def = &repo.definitions[index];

        let value = match (&def.payload, inline_value) {
            (Payload::Switch | Payload::Exclusive, Some(_)) => {
                return Err(ParseError::UnexpectedValue(def.display_name().to_string()));
            }
            (Payload::Switch, None) => {
                cursor.take();
                repo.literals.switch_enabled.clone()
            }
            (Payload::Exclusive, None) => {
                cursor.take();
                name.to_string()
            }
            (Payload::Valued, Some(value)) => {
                cursor.take();
                value.to_string()
            }
            (Payload::Valued, None) => {
                cursor.take();
                let Some(value) = cursor.take() else {
                    return Err(ParseError::MissingValue(def.display_name().to_string()));
                };
                value.to_string()
            }
            (Payload::Positional | Payload::Subcommands(_), _) => return Ok(false),
        };

        self.record(index, value)?;
        Ok(true)
    }

    fn parse_positional_arguments(&mut self, cursor: &mut TokenCursor<'_>) -> Result<(), ParseError> {
        let repo = self.repo;
        let positionals = &repo.positionals;
        let mut slot = 0;

        while let Some(token) = cursor.peek() {
            let Some(&index) = positionals.get(slot) else {
                return Err(ParseError::UnexpectedArgument(token.to_string()));
            };
            cursor.take();
            self.record(index, token.to_string())?;

            // multi-value slots keep everything that follows
            if repo.definitions[index].max_count == MaxCount::Limited(1) {
                slot += 1;
            }
        }

        for &index in &positionals[slot.min(positionals.len())..] {
            let def = &repo.definitions[index];
            if def.min_count > 0 && self.results.values[index].is_empty() {
                return Err(ParseError::RequiredArgumentMissing(
                    def.display_name().to_string(),
                ));
            }
        }
        Ok(())
    }

    fn dispatch_subcommand(&mut self, index: usize, cursor: &mut TokenCursor<'_>) -> Result<(), ParseError> {
        let repo = self.repo;
        let def = &repo.definitions[index];
        let Payload::Subcommands(parsers) = &def.payload else {
            return Ok(());
        };

        let Some(token) = cursor.take() else {
            if def.min_count > 0 {
                return Err(ParseError::RequiredArgumentMissing(
                    def.display_name().to_string(),
                ));
            }
            return Ok(());
        };
        let Some(parser) = parsers.get(token) else {
            return Err(ParseError::UnknownSubcommand(token.to_string()));
        };
        self.record(index, token.to_string())?;

        let app_name = format!(
            "{}{}{}",
            self.results.app_name(),
            repo.literals.subcommand_separator,
            token
        );
        tracing::debug!(
            subcommand = token,
            forwarded = cursor.remaining().len(),
            "dispatching to subcommand parser"
        );
        let nested = run(parser, app_name, cursor.remaining())?;
        self.results.subcommand = Some(Box::new(nested));
        Ok(())
    }

    fn check_min_counts(&self) -> Result<(), ParseError> {
        for (def, values) in self.repo.definitions.iter().zip(&self.results.values) {
            let count = values.len();
            if count >= def.min_count {
                continue;
            }
            if count == 0 {
                return Err(ParseError::RequiredArgumentMissing(
                    def.display_name().to_string(),
                ));
            }
            return Err(ParseError::TooFewOccurrences {
                name: def.display_name().to_string(),
                min: def.min_count,
                count,
            });
        }
        Ok(())
    }

    /// Defaults stand in for absent arguments, so they obey the allowed values too.
    fn check_defaults(&self) -> Result<(), ParseError> {
        let absent = self
            .repo
            .definitions
            .iter()
            .zip(&self.results.values)
            .filter(|(def, values)| values.is_empty() && !def.allowed_values.is_empty());

        for (def, _) in absent {
            if let Some(value) = def
                .default_values
                .iter()
                .find(|value| !def.allowed_values.contains(value))
            {
                return Err(ParseError::InvalidValue {
                    name: def.display_name().to_string(),
                    value: value.clone(),
                    allowed: def.allowed_values.join(", "),
                });
            }
        }
        Ok(())
    }

    fn record(&mut self, index: usize, value: String) -> Result<(), ParseError> {
        let def = &self.repo.definitions[index];
        let recorded = &mut self.results.values[index];

        if let (Payload::Exclusive, Some(previous)) = (&def.payload, recorded.first()) {
            if *previous != value {
                return Err(ParseError::ExclusiveConflict {
                    given: value,
                    previous: previous.clone(),
                });
            }
        }

        if def.max_count.is_reached(recorded.len()) {
            return Err(ParseError::TooManyOccurrences(
                def.display_name().to_string(),
            ));
        }

        if !def.allowed_values.is_empty() && !def.allowed_values.contains(&value) {
            return Err(ParseError::InvalidValue {
                name: def.display_name().to_string(),
                value,
                allowed: def.allowed_values.join(", "),
            });
        }

        tracing::trace!(argument = def.display_name(), value = %value, "recorded value");
        recorded.push(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ArgumentTable;

    fn parse<'p>(parser: &'p Parser, tokens: &[&str]) -> Result<Results<'p>, ParseError> {
        parser.parse(&ArgumentTable::new("prog", tokens.iter().copied()))
    }

    #[test]
    fn named_phase_stops_at_first_unknown_token() {
        let mut parser = Parser::new();
        parser.add_switch(["-v"]).unwrap();
        parser
            .add_positional("files")
            .unwrap()
            .set_max_count_unlimited();

        // "-v" after a positional is taken as a positional value
        let r = parse(&parser, &["-v", "a", "-v"]).unwrap();
        assert_eq!(r.count("-v"), 1);
        assert_eq!(r.values("files"), &["a".to_string(), "-v".to_string()]);
    }

    #[test]
    fn unknown_inline_name_goes_to_positionals() {
        let mut parser = Parser::new();
        parser.add_positional("expr").unwrap();
        let r = parse(&parser, &["--x=1"]).unwrap();
        assert_eq!(r.get("expr"), Some("--x=1"));
    }

    #[test]
    fn positional_name_is_not_a_named_argument() {
        let mut parser = Parser::new();
        parser.add_positional("file").unwrap();
        let r = parse(&parser, &["file"]).unwrap();
        assert_eq!(r.get("file"), Some("file"));
    }

    #[test]
    fn inline_value_splits_at_first_separator() {
        let mut parser = Parser::new();
        parser.add_valued(["--define"]).unwrap();
        let r = parse(&parser, &["--define=a=b"]).unwrap();
        assert_eq!(r.get("--define"), Some("a=b"));

        let r = parse(&parser, &["--define="]).unwrap();
        assert_eq!(r.get("--define"), Some(""));
    }

    #[test]
    fn value_token_is_taken_verbatim() {
        let mut parser = Parser::new();
        parser.add_switch(["-v"]).unwrap();
        parser.add_valued(["-o"]).unwrap();
        let r = parse(&parser, &["-o", "-v"]).unwrap();
        assert_eq!(r.get("-o"), Some("-v"));
        assert!(!r.is_present("-v"));
    }

    #[test]
    fn missing_value_at_end_of_input() {
        let mut parser = Parser::new();
        parser.add_valued(["-o", "--output"]).unwrap();
        let err = parse(&parser, &["--output"]).unwrap_err();
        assert_eq!(err, ParseError::MissingValue("-o".to_string()));
    }

    #[test]
    fn switch_rejects_inline_value() {
        let mut parser = Parser::new();
        parser.add_switch(["--flag"]).unwrap();
        let err = parse(&parser, &["--flag=yes"]).unwrap_err();
        assert_eq!(err, ParseError::UnexpectedValue("--flag".to_string()));
    }

    #[test]
    fn exclusive_rejects_inline_value() {
        let mut parser = Parser::new();
        parser.add_exclusive(["--json", "--yaml"]).unwrap();
        let err = parse(&parser, &["--yaml=x"]).unwrap_err();
        assert_eq!(err, ParseError::UnexpectedValue("--json".to_string()));
    }

    #[test]
    fn repeated_switch_exceeds_default_max() {
        let mut parser = Parser::new();
        parser.add_switch(["-v", "--verbose"]).unwrap();
        let err = parse(&parser, &["-v", "--verbose"]).unwrap_err();
        assert_eq!(err, ParseError::TooManyOccurrences("-v".to_string()));
    }

    #[test]
    fn defaults_outside_allowed_values_are_rejected() {
        let mut parser = Parser::new();
        parser
            .add_valued(["--color"])
            .unwrap()
            .set_default_value("always")
            .set_allowed_values(["auto", "never"]);

        let err = parse(&parser, &[]).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidValue {
                name: "--color".to_string(),
                value: "always".to_string(),
                allowed: "auto, never".to_string(),
            }
        );
        // a given value replaces the default
        let r = parse(&parser, &["--color", "never"]).unwrap();
        assert_eq!(r.get("--color"), Some("never"));
    }

    #[test]
    fn allowed_values_are_enforced() {
        let mut parser = Parser::new();
        parser
            .add_valued(["--color"])
            .unwrap()
            .set_allowed_values(["auto", "never"]);
        assert!(parse(&parser, &["--color", "auto"]).is_ok());
        let err = parse(&parser, &["--color=always"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidValue {
                name: "--color".to_string(),
                value: "always".to_string(),
                allowed: "auto, never".to_string(),
            }
        );
    }

    #[test]
    fn exclusive_alternatives_record_the_alias_used() {
        let mut parser = Parser::new();
        let format = parser.add_exclusive(["--json", "--yaml"]).unwrap().id();
        let r = parse(&parser, &["--yaml"]).unwrap();
        assert_eq!(r.get(format), Some("--yaml"));

        let err = parse(&parser, &["--json", "--json"]).unwrap_err();
        assert_eq!(err, ParseError::TooManyOccurrences("--json".to_string()));

        let err = parse(&parser, &["--json", "--yaml"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::ExclusiveConflict {
                given: "--yaml".to_string(),
                previous: "--json".to_string(),
            }
        );
    }

    #[test]
    fn bounded_multi_value_positional() {
        let mut parser = Parser::new();
        parser.add_positional("pair").unwrap().set_max_count(2);
        assert_eq!(parse(&parser, &["a", "b"]).unwrap().count("pair"), 2);
        let err = parse(&parser, &["a", "b", "c"]).unwrap_err();
        assert_eq!(err, ParseError::TooManyOccurrences("pair".to_string()));
    }

    #[test]
    fn too_few_occurrences() {
        let mut parser = Parser::new();
        parser
            .add_valued(["-I"])
            .unwrap()
            .set_min_count(2)
            .set_max_count_unlimited();
        let err = parse(&parser, &["-I", "a"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::TooFewOccurrences {
                name: "-I".to_string(),
                min: 2,
                count: 1,
            }
        );
        assert!(parse(&parser, &["-I", "a", "-I", "b"]).is_ok());
    }

    #[test]
    fn required_named_argument() {
        let mut parser = Parser::new();
        parser
            .add_valued(["--name"])
            .unwrap()
            .set_min_count(1)
            .set_default_value("ignored");
        let err = parse(&parser, &[]).unwrap_err();
        assert_eq!(err, ParseError::RequiredArgumentMissing("--name".to_string()));
    }

    #[test]
    fn optional_subcommand() {
        let mut parser = Parser::new();
        let mut commands = parser.add_subparsers("command").unwrap().set_min_count(0);
        commands.add_parser("build").unwrap();

        let r = parse(&parser, &[]).unwrap();
        assert!(r.subcommand().is_none());
    }

    #[test]
    fn required_subcommand_missing() {
        let mut parser = Parser::new();
        let mut commands = parser.add_subparsers("command").unwrap();
        commands.add_parser("build").unwrap();

        let err = parse(&parser, &[]).unwrap_err();
        assert_eq!(err, ParseError::RequiredArgumentMissing("command".to_string()));
    }
}
