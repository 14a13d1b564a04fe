const INCLUDE_FLAG: &str = "-I";
const SOURCE_FLAG: &str = "-c";

/// Result of parsing a compiler invocation for the only two flags we care
/// about.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParsedCommandLine {
    /// Values of every `-I` flag, in order of appearance
    pub include_paths: Vec<String>,
    /// Value of the last `-c` flag
    pub source_file: Option<String>,
    /// Everything else, passed through verbatim
    pub remaining_args: Vec<String>,
}

/// Split a `command` string on whitespace. Shell quoting is not interpreted.
pub fn split_command_line(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_owned).collect()
}

pub fn parse_command_line<I, S>(tokens: I) -> ParsedCommandLine
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut parsed = ParsedCommandLine::default();

    let mut token_it = tokens.into_iter().map(Into::into);
    while let Some(token) = token_it.next() {
        if token == INCLUDE_FLAG || token == SOURCE_FLAG {
            match token_it.next() {
                Some(value) if token == INCLUDE_FLAG => parsed.include_paths.push(value),
                Some(value) => parsed.source_file = Some(value),
                None => parsed.remaining_args.push(token),
            }
        } else if let Some(include_path) = token.strip_prefix(INCLUDE_FLAG) {
            parsed.include_paths.push(include_path.to_owned());
        } else {
            parsed.remaining_args.push(token);
        }
    }

    parsed
}
