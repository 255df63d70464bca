use qterm::registry::{complete_name, CommandRegistry, Completion};
use rustyline::completion::{Completer, Pair};
use rustyline::{Context, Helper, Highlighter, Hinter, Validator};

/// Tab completion of command names. Only the first word completes;
/// arguments are free text.
#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CommandCompleter {
    names: Vec<String>,
}

impl CommandCompleter {
    pub fn new(registry: &CommandRegistry) -> Self {
        Self {
            names: registry.names().map(str::to_string).collect(),
        }
    }

    fn candidates(&self, prefix: &str) -> Vec<Pair> {
        let names = match complete_name(self.names.iter().map(String::as_str), prefix) {
            Completion::NoMatch => Vec::new(),
            Completion::Unique(name) => vec![name],
            Completion::Ambiguous(names) => names,
        };
        names
            .into_iter()
            .map(|name| Pair {
                display: name.clone(),
                replacement: name,
            })
            .collect()
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let head = &line[..pos];
        let start = head.len() - head.trim_start().len();
        let word = &head[start..];
        if word.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        Ok((start, self.candidates(word)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qterm::commands::build_registry;
    use rustyline::history::DefaultHistory;

    fn complete(line: &str) -> (usize, Vec<String>) {
        let completer = CommandCompleter::new(&build_registry().unwrap());
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        let (start, pairs) = completer.complete(line, line.len(), &ctx).unwrap();
        (start, pairs.into_iter().map(|p| p.replacement).collect())
    }

    #[test]
    fn unique_prefix_completes() {
        assert_eq!(complete("he"), (0, vec!["help".to_string()]));
        assert_eq!(complete("  th"), (2, vec!["theme".to_string()]));
    }

    #[test]
    fn ambiguous_prefix_lists_in_registry_order() {
        let (_, names) = complete("latest_");
        assert_eq!(names, vec!["latest_quant", "latest_optics", "latest_atom"]);
    }

    #[test]
    fn empty_input_lists_every_command() {
        let (start, names) = complete("");
        assert_eq!(start, 0);
        assert_eq!(
            names,
            vec![
                "help",
                "ask",
                "explain",
                "derive",
                "quiz",
                "arxiv",
                "latest_quant",
                "latest_optics",
                "latest_atom",
                "clear",
                "theme",
            ]
        );
    }

    #[test]
    fn arguments_and_unknown_prefixes_do_not_complete() {
        assert!(complete("arxiv he").1.is_empty());
        assert!(complete("zzz").1.is_empty());
    }
}
