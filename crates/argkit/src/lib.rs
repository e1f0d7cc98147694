//! Declarative command-line argument registry and two-phase parser.
//!
//! Arguments are registered on a [`Parser`] (switches, valued options,
//! positionals, exclusive alternatives and one optional sub-command
//! dispatcher). Parsing then runs in two phases:
//! - a named phase consuming `--name`, `--name value` and `--name=value`
//!   tokens from the front of the input until a token is not a registered name;
//! - a positional phase assigning the rest to positionals in registration
//!   order, or handing it to the selected sub-command parser.
//!
//! ```
//! use argkit::{ArgumentTable, Parser};
//!
//! let mut parser = Parser::new();
//! let verbose = parser.add_switch(["-v", "--verbose"])?.id();
//! parser.add_valued(["-o", "--output"])?.set_default_value("out.txt");
//! parser.add_positional("input")?.set_min_count(1);
//!
//! let results = parser.parse(&ArgumentTable::from_argv(["prog", "-v", "in.txt"]))?;
//! assert!(results.is_present(verbose));
//! assert_eq!(results.get("--output"), Some("out.txt"));
//! assert_eq!(results.get("input"), Some("in.txt"));
//! # Ok::<(), argkit::Error>(())
//! ```

mod argument;
mod cursor;
mod engine;
mod error;
mod group;
mod literals;
mod name_table;
mod parser;
mod repository;
mod results;
mod sink;
mod table;

pub use argument::{
    ArgId, ArgKind, ArgumentInfo, ExclusiveArg, MaxCount, PositionalArg, SubcommandSet, SwitchArg,
    ValuedArg,
};
pub use cursor::TokenCursor;
pub use error::{ConfigError, Error, ParseError, Result};
pub use group::ArgumentGroup;
pub use literals::Literals;
pub use parser::Parser;
pub use repository::Group;
pub use results::{ArgKey, Results};
pub use sink::ValueSink;
pub use table::ArgumentTable;
