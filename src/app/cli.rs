#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Reconstruct,
    Next,
    CheckSchedule,
    Help,
    Unknown,
}

pub fn parse_cli_verb(input: &str) -> CliVerb {
    match input {
        "reconstruct" => CliVerb::Reconstruct,
        "next" => CliVerb::Next,
        "check-schedule" => CliVerb::CheckSchedule,
        "help" | "--help" | "-h" => CliVerb::Help,
        _ => CliVerb::Unknown,
    }
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  reconstruct --schedule <expr> --created <rfc3339> [--last <rfc3339>]".to_string(),
        "              [--now <rfc3339>] [--deadline-seconds <n>] [--include-deadline]"
            .to_string(),
        "              [--timezone <tz>] [--config <path>]".to_string(),
        "                                       Count missed fires and the most recent one"
            .to_string(),
        "  next --cronjob <manifest.yaml> [--now <rfc3339>] [--config <path>]".to_string(),
        "                                       Show the due fire, job name and requeue delay"
            .to_string(),
        "  check-schedule <expr> [--timezone <tz>] [--from <rfc3339>] [--count <n>]".to_string(),
        "                                       Validate an expression and list next fires"
            .to_string(),
    ]
}

pub(crate) fn help_text() -> String {
    cli_help_lines().join("\n")
}

/// `--name value` options and bare `--flag` switches, plus positionals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ParsedArgs {
    pub positionals: Vec<String>,
    options: Vec<(String, Option<String>)>,
}

impl ParsedArgs {
    pub fn parse(args: &[String], switches: &[&str]) -> Result<Self, String> {
        let mut parsed = Self::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let Some(name) = arg.strip_prefix("--") else {
                parsed.positionals.push(arg.clone());
                continue;
            };
            if name.is_empty() {
                return Err("empty option name `--`".to_string());
            }
            if switches.contains(&name) {
                parsed.options.push((name.to_string(), None));
                continue;
            }
            let value = iter
                .next()
                .ok_or_else(|| format!("option `--{name}` requires a value"))?;
            parsed.options.push((name.to_string(), Some(value.clone())));
        }
        Ok(parsed)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn required(&self, name: &str) -> Result<&str, String> {
        self.value(name)
            .ok_or_else(|| format!("missing required option `--{name}`"))
    }

    pub fn switch(&self, name: &str) -> bool {
        self.options.iter().any(|(key, _)| key == name)
    }

    pub fn reject_unknown(&self, known: &[&str]) -> Result<(), String> {
        match self
            .options
            .iter()
            .find(|(key, _)| !known.contains(&key.as_str()))
        {
            Some((key, _)) => Err(format!("unknown option `--{key}`")),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_options_switches_and_positionals() {
        let parsed = ParsedArgs::parse(
            &args(&["0 * * * *", "--now", "2016-05-19T10:00:00Z", "--include-deadline"]),
            &["include-deadline"],
        )
        .expect("parse");
        assert_eq!(parsed.positionals, vec!["0 * * * *".to_string()]);
        assert_eq!(parsed.value("now"), Some("2016-05-19T10:00:00Z"));
        assert!(parsed.switch("include-deadline"));
        assert!(!parsed.switch("verbose"));
        parsed
            .reject_unknown(&["now", "include-deadline"])
            .expect("known");
        parsed.reject_unknown(&["now"]).expect_err("unknown switch");
    }

    #[test]
    fn options_without_values_are_rejected() {
        let err = ParsedArgs::parse(&args(&["--now"]), &[]).expect_err("missing value");
        assert_eq!(err, "option `--now` requires a value");
    }

    #[test]
    fn recognizes_verbs() {
        assert_eq!(parse_cli_verb("reconstruct"), CliVerb::Reconstruct);
        assert_eq!(parse_cli_verb("check-schedule"), CliVerb::CheckSchedule);
        assert_eq!(parse_cli_verb("--help"), CliVerb::Help);
        assert_eq!(parse_cli_verb("frobnicate"), CliVerb::Unknown);
    }
}
