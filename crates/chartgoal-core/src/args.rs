//! Helm argument synthesis
//!
//! Options are configured at three levels: globally for every helm goal,
//! per goal registration, and per chart. They are merged into a single
//! argument list appended to `helm install` / `helm upgrade`.

use indexmap::IndexMap;

use crate::options::CliOption;

/// Merge option sources into an ordered helm argument list
///
/// Sources are applied in order `global`, `goal`, `chart`:
/// - valued options are merged by key, a later source replaces the value
///   of an earlier one
/// - bare flags from all sources are kept in source order, duplicates included
///
/// The output holds `-f <path>` for every config file in the given order,
/// then `--<key> <value>` for every merged valued option, then `--<flag>`
/// for every bare flag.
pub fn synthesize_args(
    global: &[CliOption],
    goal: &[CliOption],
    chart: &[CliOption],
    config_files: &[String],
) -> Vec<String> {
    let mut values: IndexMap<&str, &str> = IndexMap::new();
    let mut flags: Vec<&str> = Vec::new();

    for option in global.iter().chain(goal).chain(chart) {
        match option {
            CliOption::Flag(name) => flags.push(name),
            CliOption::KeyValue { key, value } => {
                values.insert(key, value);
            }
        }
    }

    let mut args = Vec::with_capacity(config_files.len() * 2 + values.len() * 2 + flags.len());

    for file in config_files {
        args.push("-f".to_string());
        args.push(file.clone());
    }

    for (key, value) in values {
        args.push(format!("--{}", key));
        args.push(value.to_string());
    }

    args.extend(flags.into_iter().map(|flag| format!("--{}", flag)));

    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Collect `--key value` pairs, ignoring position
    fn value_pairs(args: &[String]) -> HashMap<String, String> {
        let mut pairs = HashMap::new();
        let mut iter = args.iter().peekable();
        while let Some(arg) = iter.next() {
            if let Some(key) = arg.strip_prefix("--") {
                if let Some(next) = iter.peek() {
                    if !next.starts_with('-') {
                        pairs.insert(key.to_string(), iter.next().unwrap().clone());
                    }
                }
            }
        }
        pairs
    }

    #[test]
    fn test_empty_sources() {
        assert!(synthesize_args(&[], &[], &[], &[]).is_empty());
    }

    #[test]
    fn test_higher_priority_source_wins() {
        let global = vec![
            CliOption::value("timeout", "100"),
            CliOption::value("tiller-namespace", "kube-system"),
            CliOption::value("wait-for", "global"),
        ];
        let goal = vec![
            CliOption::value("timeout", "200"),
            CliOption::value("wait-for", "goal"),
        ];
        let chart = vec![CliOption::value("timeout", "300")];

        let args = synthesize_args(&global, &goal, &chart, &[]);
        let pairs = value_pairs(&args);

        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs["timeout"], "300");
        assert_eq!(pairs["wait-for"], "goal");
        assert_eq!(pairs["tiller-namespace"], "kube-system");
        assert_eq!(args.len(), 6);
    }

    #[test]
    fn test_bare_flags_keep_source_order_and_duplicates() {
        let global = vec![CliOption::flag("debug")];
        let goal = vec![CliOption::flag("wait"), CliOption::value("timeout", "60")];
        let chart = vec![CliOption::flag("debug"), CliOption::flag("atomic")];

        let args = synthesize_args(&global, &goal, &chart, &[]);
        let flags: Vec<&str> = args
            .iter()
            .filter(|a| matches!(a.as_str(), "--debug" | "--wait" | "--atomic"))
            .map(String::as_str)
            .collect();

        assert_eq!(flags, vec!["--debug", "--wait", "--debug", "--atomic"]);
    }

    #[test]
    fn test_config_files_come_first_in_order() {
        let goal = vec![CliOption::value("namespace-override", "x")];
        let files = vec!["values-prod.yaml".to_string(), "secrets.yaml".to_string()];

        let args = synthesize_args(&[], &goal, &[], &files);

        assert_eq!(
            &args[..4],
            &["-f", "values-prod.yaml", "-f", "secrets.yaml"]
        );
        assert_eq!(&args[4..], &["--namespace-override", "x"]);
    }

    #[test]
    fn test_value_pairs_follow_config_files() {
        let chart = vec![CliOption::value("set", "image.tag=1.0"), CliOption::flag("wait")];
        let files = vec!["a.yaml".to_string()];

        let args = synthesize_args(&[], &[], &chart, &files);

        let first_value = args.iter().position(|a| a == "--set").unwrap();
        let last_file = args.iter().rposition(|a| a == "-f").unwrap();
        assert!(last_file < first_value);
        assert_eq!(args.last().map(String::as_str), Some("--wait"));
    }
}
