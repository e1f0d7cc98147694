use argkit::Results;
use indexmap::IndexMap;
use serde::Serialize;

/// What a parse produced, keyed by each argument's first name.
#[derive(Debug, Serialize)]
pub struct ParseReport {
    pub app: String,
    /// Recorded values, or defaults for arguments that were not given.
    pub values: IndexMap<String, Vec<String>>,
    /// Arguments given on the command line.
    pub present: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcommand: Option<SubcommandReport>,
}

#[derive(Debug, Serialize)]
pub struct SubcommandReport {
    pub name: String,
    #[serde(flatten)]
    pub report: Box<ParseReport>,
}

pub fn report(results: &Results<'_>) -> ParseReport {
    let mut values = IndexMap::new();
    let mut present = Vec::new();

    for info in results.parser().arguments() {
        let Some(name) = info.names().first() else {
            continue;
        };
        let id = info.id();
        if results.is_present(id) {
            present.push(name.clone());
        }
        let collected = results.values(id);
        if !collected.is_empty() {
            values.insert(name.clone(), collected.to_vec());
        }
    }

    let subcommand = results.subcommand().map(|(name, nested)| SubcommandReport {
        name: name.to_string(),
        report: Box::new(report(nested)),
    });

    ParseReport {
        app: results.app_name().to_string(),
        values,
        present,
        subcommand,
    }
}

pub fn print_human(report: &ParseReport) {
    println!("{}", report.app);
    for (name, values) in &report.values {
        let marker = if report.present.contains(name) {
            ""
        } else {
            " (default)"
        };
        println!("  {name} = {}{marker}", values.join(", "));
    }
    if let Some(sub) = &report.subcommand {
        println!();
        print_human(&sub.report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argkit::{ArgumentTable, Parser};

    #[test]
    fn report_lists_values_defaults_and_subcommands() {
        let mut parser = Parser::new();
        parser.add_switch(["-v", "--verbose"]).unwrap();
        parser.add_valued(["--color"]).unwrap().set_default_value("auto");
        parser.add_switch(["-q"]).unwrap();
        let mut commands = parser.add_subparsers("command").unwrap();
        commands
            .add_parser("run")
            .unwrap()
            .add_positional("target")
            .unwrap();

        let results = parser
            .parse(&ArgumentTable::new("tool", ["-v", "run", "x"]))
            .unwrap();
        let report = report(&results);

        assert_eq!(report.app, "tool");
        assert_eq!(report.present, vec!["-v".to_string(), "command".to_string()]);
        let keys: Vec<&str> = report.values.keys().map(String::as_str).collect();
        assert_eq!(keys, ["-v", "--color", "command"]);
        assert_eq!(report.values["--color"], vec!["auto".to_string()]);

        let sub = report.subcommand.as_ref().unwrap();
        assert_eq!(sub.name, "run");
        assert_eq!(sub.report.app, "tool/run");
        assert_eq!(sub.report.values["target"], vec!["x".to_string()]);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["subcommand"]["name"], "run");
        assert_eq!(json["subcommand"]["values"]["target"][0], "x");
    }
}
