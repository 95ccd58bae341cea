//! Strict text template renderer.
//!
//! Templates, command strings and config paths all share one language:
//! literal text interleaved with actions delimited by `{{` and `}}`.
//! Supported actions:
//!
//! - `{{.}}` prints the current value (the whole data mapping at the top)
//! - `{{.a.b}}` walks nested mappings from the current value, `{{$.a}}`
//!   from the top of the data
//! - `{{if P}} .. {{else if P}} .. {{else}} .. {{end}}`
//! - `{{range P}} .. {{else}} .. {{end}}` over sequences, and over mappings
//!   in key order
//! - `{{with P}} .. {{else with P}} .. {{else}} .. {{end}}`
//! - `{{/* ... */}}` is a comment and prints nothing
//! - `{{- ` and ` -}}` trim the whitespace before or after the action
//!
//! A pipeline `P` is a single operand (a field, a `"string"`, a number,
//! `true` or `false`) or a call to one of `not`, `and`, `or`, `eq`, `ne`
//! and `len`.  `false`, `0`, null and empty strings or collections are
//! false; everything else is true.
//!
//! Referencing a key that is not present is always an error, in output and
//! conditions alike; there is no lenient mode.  Pipes, variables and any
//! other function are rejected as unsupported.
use serde_yaml::{Mapping, Number, Value};
use thiserror::Error;

const LEFT_DELIM: &str = "{{";
const RIGHT_DELIM: &str = "}}";
const LEFT_COMMENT: &str = "/*";
const RIGHT_COMMENT: &str = "*/";
const TRIM_MARKER: char = '-';

const FUNCTIONS: &[&str] = &["not", "and", "or", "eq", "ne", "len"];

/// Errors raised while rendering a template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// An action was opened with `{{` but never closed.
    #[error("line {line}: unclosed action")]
    UnclosedAction {
        /// Line the action starts on.
        line: usize,
    },

    /// A comment was opened with `/*` but never closed with `*/}}`.
    #[error("line {line}: unclosed comment")]
    UnclosedComment {
        /// Line the comment starts on.
        line: usize,
    },

    /// `{{}}` with nothing inside, or a block without a pipeline.
    #[error("line {line}: missing value for action")]
    EmptyAction {
        /// Line of the empty action.
        line: usize,
    },

    /// The action is valid template syntax elsewhere but not supported here.
    #[error("line {line}: unsupported action <{action}>")]
    Unsupported {
        /// Line of the action.
        line: usize,
        /// Action text without delimiters.
        action: String,
    },

    /// `{{else}}` or `{{end}}` outside of a block.
    #[error("line {line}: unexpected <{action}>")]
    UnexpectedAction {
        /// Line of the action.
        line: usize,
        /// Action text without delimiters.
        action: String,
    },

    /// An `if`, `range` or `with` block has no `{{end}}`.
    #[error("line {line}: missing end for <{action}>")]
    UnclosedBlock {
        /// Line the block starts on.
        line: usize,
        /// Opening action text without delimiters.
        action: String,
    },

    /// A function was called with the wrong number of arguments.
    #[error("line {line}: wrong number of args for {name} in <{action}>")]
    WrongArguments {
        /// Line of the action.
        line: usize,
        /// Pipeline text.
        action: String,
        /// Function name.
        name: String,
    },

    /// The data has no entry for a referenced key.
    #[error("line {line}: executing <{action}>: map has no entry for key \"{key}\"")]
    MissingKey {
        /// Line of the action.
        line: usize,
        /// Field text.
        action: String,
        /// The key that was not found.
        key: String,
    },

    /// A field was accessed on a value that is not a mapping.
    #[error("line {line}: executing <{action}>: can't evaluate field {key} in a non-mapping value")]
    NotAMapping {
        /// Line of the action.
        line: usize,
        /// Field text.
        action: String,
        /// The field that was accessed.
        key: String,
    },

    /// A value of the wrong type reached a function or `range`.
    #[error("line {line}: executing <{action}>: {reason}")]
    Invalid {
        /// Line of the action.
        line: usize,
        /// Pipeline text.
        action: String,
        /// What was wrong with the value.
        reason: &'static str,
    },
}

/// Render `source` against `data`.
///
/// # Examples
///
/// ```
/// use deploy_configs::template::{data_from_pairs, render};
///
/// let data = data_from_pairs([("var1", "value1"), ("var2", "value2")]);
/// assert_eq!(render("{{.var1}} {{.var2}}", &data).unwrap(), "value1 value2");
/// assert_eq!(
///     render(r#"{{if eq .var1 "value1"}}yes{{else}}no{{end}}"#, &data).unwrap(),
///     "yes"
/// );
/// assert!(render("{{.missingVar}}", &data).is_err());
/// ```
///
/// # Errors
///
/// Returns [`TemplateError`] for malformed or unsupported actions and for
/// references to keys missing from `data`.  Nothing is rendered partially.
pub fn render(source: &str, data: &Mapping) -> Result<String, TemplateError> {
    let nodes = Parser::new(lex(source)?).parse()?;
    let root = Value::Mapping(data.clone());
    let mut out = String::with_capacity(source.len());
    Exec { root: &root }.walk(&nodes, &root, &mut out)?;
    Ok(out)
}

/// Build a data mapping of string values, e.g. `Input`/`Output` for a
/// command line or `GitRoot`/`Home` for config paths.
#[must_use]
pub fn data_from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Mapping
where
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (Value::String(k.into()), Value::String(v.into())))
        .collect()
}

// ---------------------------------------------------------------------------
// Lexing
// ---------------------------------------------------------------------------

enum Token<'a> {
    Text(&'a str),
    Action { code: &'a str, line: usize },
}

/// A delimited action body.
enum Action<'a> {
    Comment,
    Code(&'a str),
}

fn lex(source: &str) -> Result<Vec<Token<'_>>, TemplateError> {
    let mut tokens = Vec::new();
    let mut rest = source;
    let mut line = 1;

    while let Some((text, after)) = rest.split_once(LEFT_DELIM) {
        let (trim_left, body) = match after.strip_prefix(TRIM_MARKER) {
            Some(stripped) if stripped.starts_with(is_space) => (true, stripped),
            _ => (false, after),
        };
        tokens.push(Token::Text(if trim_left {
            text.trim_end_matches(is_space)
        } else {
            text
        }));
        line += count_lines(text);

        let (action, trim_right, remaining) = split_action(body, line)?;
        if let Action::Code(code) = action {
            tokens.push(Token::Action {
                code: code.trim_matches(is_space),
                line,
            });
        }
        line += count_lines(body.strip_suffix(remaining).unwrap_or_default());

        rest = if trim_right {
            let trimmed = remaining.trim_start_matches(is_space);
            line += count_lines(remaining.strip_suffix(trimmed).unwrap_or_default());
            trimmed
        } else {
            remaining
        };
    }
    tokens.push(Token::Text(rest));
    Ok(tokens)
}

/// Split the text following `{{` into the action, its right trim flag and
/// the text after the closing `}}`.
fn split_action(body: &str, line: usize) -> Result<(Action<'_>, bool, &str), TemplateError> {
    if let Some(comment) = body
        .trim_start_matches(is_space)
        .strip_prefix(LEFT_COMMENT)
    {
        let (_, after) = comment
            .split_once(RIGHT_COMMENT)
            .ok_or(TemplateError::UnclosedComment { line })?;
        if let Some(remaining) = after.strip_prefix(RIGHT_DELIM) {
            return Ok((Action::Comment, false, remaining));
        }
        let remaining = after
            .trim_start_matches(is_space)
            .strip_prefix(TRIM_MARKER)
            .and_then(|s| s.strip_prefix(RIGHT_DELIM))
            .ok_or(TemplateError::UnclosedComment { line })?;
        return Ok((Action::Comment, true, remaining));
    }

    let (inner, remaining) = body
        .split_once(RIGHT_DELIM)
        .ok_or(TemplateError::UnclosedAction { line })?;
    match inner.strip_suffix(TRIM_MARKER) {
        Some(code) if code.ends_with(is_space) => Ok((Action::Code(code), true, remaining)),
        _ => Ok((Action::Code(inner), false, remaining)),
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

enum Node<'a> {
    Text(&'a str),
    Output(Pipeline<'a>),
    Block {
        kind: BlockKind,
        pipe: Pipeline<'a>,
        body: Vec<Node<'a>>,
        otherwise: Vec<Node<'a>>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    If,
    Range,
    With,
}

impl BlockKind {
    fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "if" => Some(Self::If),
            "range" => Some(Self::Range),
            "with" => Some(Self::With),
            _ => None,
        }
    }

    /// Whether `{{else <kind> ..}}` may continue a block of this kind.
    const fn chains(self) -> bool {
        !matches!(self, Self::Range)
    }
}

struct Pipeline<'a> {
    text: &'a str,
    line: usize,
    command: Command<'a>,
}

enum Command<'a> {
    Operand(Operand<'a>),
    Call {
        name: &'a str,
        args: Vec<Operand<'a>>,
    },
}

enum Operand<'a> {
    Field {
        text: &'a str,
        from_root: bool,
        keys: Vec<&'a str>,
    },
    Literal(Value),
}

enum Word<'a> {
    Function(&'a str),
    Operand(Operand<'a>),
}

/// What ended a list of nodes.
enum Stop<'a> {
    Eof,
    End { line: usize },
    Else { clause: &'a str, line: usize },
}

struct Parser<'a> {
    tokens: std::vec::IntoIter<Token<'a>>,
}

impl<'a> Parser<'a> {
    fn new(tokens: Vec<Token<'a>>) -> Self {
        Self {
            tokens: tokens.into_iter(),
        }
    }

    fn parse(mut self) -> Result<Vec<Node<'a>>, TemplateError> {
        match self.parse_list()? {
            (nodes, Stop::Eof) => Ok(nodes),
            (_, Stop::End { line }) => Err(TemplateError::UnexpectedAction {
                line,
                action: "end".to_string(),
            }),
            (_, Stop::Else { clause, line }) => Err(unexpected_else(clause, line)),
        }
    }

    fn parse_list(&mut self) -> Result<(Vec<Node<'a>>, Stop<'a>), TemplateError> {
        let mut nodes = Vec::new();
        while let Some(token) = self.tokens.next() {
            let (code, line) = match token {
                Token::Text(text) => {
                    nodes.push(Node::Text(text));
                    continue;
                }
                Token::Action { code, line } => (code, line),
            };
            let (word, rest) = split_keyword(code);
            match word {
                "end" if rest.is_empty() => return Ok((nodes, Stop::End { line })),
                "else" => return Ok((nodes, Stop::Else { clause: rest, line })),
                _ => match BlockKind::from_keyword(word) {
                    Some(kind) => nodes.push(self.parse_block(kind, code, rest, line)?),
                    None => nodes.push(Node::Output(Pipeline::parse(code, line)?)),
                },
            }
        }
        Ok((nodes, Stop::Eof))
    }

    fn parse_block(
        &mut self,
        kind: BlockKind,
        code: &'a str,
        pipe: &'a str,
        line: usize,
    ) -> Result<Node<'a>, TemplateError> {
        let unclosed = || TemplateError::UnclosedBlock {
            line,
            action: code.to_string(),
        };
        let pipe = Pipeline::parse(pipe, line)?;
        let (body, stop) = self.parse_list()?;

        let otherwise = match stop {
            Stop::Eof => return Err(unclosed()),
            Stop::End { .. } => Vec::new(),
            Stop::Else { clause: "", .. } => match self.parse_list()? {
                (nodes, Stop::End { .. }) => nodes,
                (_, Stop::Eof) => return Err(unclosed()),
                (_, Stop::Else { clause, line }) => return Err(unexpected_else(clause, line)),
            },
            Stop::Else {
                clause,
                line: else_line,
            } => {
                let (word, rest) = split_keyword(clause);
                if !(kind.chains() && BlockKind::from_keyword(word) == Some(kind)) {
                    return Err(TemplateError::Unsupported {
                        line: else_line,
                        action: format!("else {clause}"),
                    });
                }
                vec![self.parse_block(kind, clause, rest, else_line)?]
            }
        };

        Ok(Node::Block {
            kind,
            pipe,
            body,
            otherwise,
        })
    }
}

impl<'a> Pipeline<'a> {
    fn parse(text: &'a str, line: usize) -> Result<Self, TemplateError> {
        let unsupported = || TemplateError::Unsupported {
            line,
            action: text.to_string(),
        };
        let mut words = split_words(text)
            .ok_or_else(unsupported)?
            .into_iter()
            .map(|word| classify(word).ok_or_else(unsupported));

        let command = match words.next().transpose()? {
            None => return Err(TemplateError::EmptyAction { line }),
            Some(Word::Function(name)) => {
                let args = words
                    .map(|word| match word? {
                        Word::Operand(operand) => Ok(operand),
                        Word::Function(_) => Err(unsupported()),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Command::Call { name, args }
            }
            Some(Word::Operand(operand)) => {
                if words.next().is_some() {
                    return Err(unsupported());
                }
                Command::Operand(operand)
            }
        };

        Ok(Self {
            text,
            line,
            command,
        })
    }

    fn invalid(&self, reason: &'static str) -> TemplateError {
        TemplateError::Invalid {
            line: self.line,
            action: self.text.to_string(),
            reason,
        }
    }
}

fn unexpected_else(clause: &str, line: usize) -> TemplateError {
    TemplateError::UnexpectedAction {
        line,
        action: if clause.is_empty() {
            "else".to_string()
        } else {
            format!("else {clause}")
        },
    }
}

/// Split off the first word of an action.
fn split_keyword(code: &str) -> (&str, &str) {
    code.split_once(is_space)
        .map_or((code, ""), |(word, rest)| (word, rest.trim_matches(is_space)))
}

/// Split a pipeline into words, keeping quoted strings whole.  `None` for
/// an unterminated string.
fn split_words(text: &str) -> Option<Vec<&str>> {
    let mut words = Vec::new();
    let mut rest = text.trim_start_matches(is_space);
    while let Some(first) = rest.chars().next() {
        let end = match first {
            '"' | '`' => closing_quote(rest, first)? + 1,
            _ => rest.find(is_space).unwrap_or(rest.len()),
        };
        let (word, tail) = rest.split_at_checked(end)?;
        words.push(word);
        rest = tail.trim_start_matches(is_space);
    }
    Some(words)
}

fn closing_quote(text: &str, quote: char) -> Option<usize> {
    let mut escaped = false;
    text.char_indices()
        .skip(1)
        .find(|&(_, c)| {
            let closes = c == quote && !escaped;
            escaped = quote == '"' && c == '\\' && !escaped;
            closes
        })
        .map(|(i, _)| i)
}

fn classify(word: &str) -> Option<Word<'_>> {
    if let Some(path) = word.strip_prefix('$') {
        return field(word, true, path);
    }
    if word.starts_with('.') {
        return field(word, false, word);
    }
    if let Some(quoted) = word.strip_prefix('"').and_then(|w| w.strip_suffix('"')) {
        return Some(literal(Value::String(unescape(quoted)?)));
    }
    if let Some(raw) = word.strip_prefix('`').and_then(|w| w.strip_suffix('`')) {
        return Some(literal(Value::String(raw.to_string())));
    }
    match word {
        "true" => return Some(literal(Value::Bool(true))),
        "false" => return Some(literal(Value::Bool(false))),
        _ => {}
    }
    if is_identifier(word) {
        return FUNCTIONS.contains(&word).then_some(Word::Function(word));
    }
    if let Ok(n) = word.parse::<i64>() {
        return Some(literal(Value::Number(Number::from(n))));
    }
    word.parse::<f64>()
        .ok()
        .map(|f| literal(Value::Number(Number::from(f))))
}

/// A field reference: `.`, `.a.b`, `$` or `$.a.b`.
fn field<'a>(text: &'a str, from_root: bool, path: &'a str) -> Option<Word<'a>> {
    let keys: Vec<&str> = if path.is_empty() || path == "." {
        Vec::new()
    } else {
        path.strip_prefix('.')?.split('.').collect()
    };
    keys.iter().all(|k| is_identifier(k)).then(|| {
        Word::Operand(Operand::Field {
            text,
            from_root,
            keys,
        })
    })
}

const fn literal<'a>(value: Value) -> Word<'a> {
    Word::Operand(Operand::Literal(value))
}

fn unescape(quoted: &str) -> Option<String> {
    let mut out = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        out.push(match chars.next()? {
            'n' => '\n',
            't' => '\t',
            c @ ('\\' | '"') => c,
            _ => return None,
        });
    }
    Some(out)
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

struct Exec<'d> {
    root: &'d Value,
}

impl Exec<'_> {
    fn walk(&self, nodes: &[Node<'_>], dot: &Value, out: &mut String) -> Result<(), TemplateError> {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Output(pipe) => out.push_str(&format_value(&self.eval(pipe, dot)?)),
                Node::Block {
                    kind,
                    pipe,
                    body,
                    otherwise,
                } => {
                    let value = self.eval(pipe, dot)?;
                    match kind {
                        BlockKind::If if is_true(&value) => self.walk(body, dot, out)?,
                        BlockKind::With if is_true(&value) => self.walk(body, &value, out)?,
                        BlockKind::If | BlockKind::With => self.walk(otherwise, dot, out)?,
                        BlockKind::Range => {
                            let items = range_items(&value).ok_or_else(|| {
                                pipe.invalid("range can't iterate over a scalar value")
                            })?;
                            if items.is_empty() {
                                self.walk(otherwise, dot, out)?;
                            }
                            for item in items {
                                self.walk(body, item, out)?;
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn eval(&self, pipe: &Pipeline<'_>, dot: &Value) -> Result<Value, TemplateError> {
        match &pipe.command {
            Command::Operand(operand) => self.operand(operand, dot, pipe.line),
            Command::Call { name, args } => self.call(pipe, name, args, dot),
        }
    }

    fn operand(&self, operand: &Operand<'_>, dot: &Value, line: usize) -> Result<Value, TemplateError> {
        let (text, from_root, keys) = match operand {
            Operand::Literal(value) => return Ok(value.clone()),
            Operand::Field {
                text,
                from_root,
                keys,
            } => (*text, *from_root, keys),
        };

        let mut current = if from_root { self.root } else { dot };
        for key in keys {
            let map = untag(current)
                .as_mapping()
                .ok_or_else(|| TemplateError::NotAMapping {
                    line,
                    action: text.to_string(),
                    key: (*key).to_string(),
                })?;
            current = map.get(*key).ok_or_else(|| TemplateError::MissingKey {
                line,
                action: text.to_string(),
                key: (*key).to_string(),
            })?;
        }
        Ok(current.clone())
    }

    fn call(
        &self,
        pipe: &Pipeline<'_>,
        name: &str,
        args: &[Operand<'_>],
        dot: &Value,
    ) -> Result<Value, TemplateError> {
        let arg = |operand: &Operand<'_>| self.operand(operand, dot, pipe.line);

        match (name, args) {
            ("not", [value]) => Ok(Value::Bool(!is_true(&arg(value)?))),
            ("len", [value]) => length(&arg(value)?)
                .map(|n| Value::Number(Number::from(n)))
                .ok_or_else(|| pipe.invalid("len of a scalar value")),
            // Both return the deciding argument and stop evaluating there.
            ("and", [_, ..]) => {
                let mut last = Value::Null;
                for operand in args {
                    last = arg(operand)?;
                    if !is_true(&last) {
                        break;
                    }
                }
                Ok(last)
            }
            ("or", [_, ..]) => {
                let mut last = Value::Null;
                for operand in args {
                    last = arg(operand)?;
                    if is_true(&last) {
                        break;
                    }
                }
                Ok(last)
            }
            ("eq", [first, rest @ ..]) if !rest.is_empty() => {
                let first = arg(first)?;
                for other in rest {
                    if equal(&first, &arg(other)?).ok_or_else(|| pipe.invalid(INCOMPARABLE))? {
                        return Ok(Value::Bool(true));
                    }
                }
                Ok(Value::Bool(false))
            }
            ("ne", [a, b]) => equal(&arg(a)?, &arg(b)?)
                .map(|eq| Value::Bool(!eq))
                .ok_or_else(|| pipe.invalid(INCOMPARABLE)),
            _ => Err(TemplateError::WrongArguments {
                line: pipe.line,
                action: pipe.text.to_string(),
                name: name.to_string(),
            }),
        }
    }
}

const INCOMPARABLE: &str = "incompatible types for comparison";

/// Values visited by `range`: sequence items, or mapping values sorted by
/// key.  Null yields nothing.
fn range_items(value: &Value) -> Option<Vec<&Value>> {
    match untag(value) {
        Value::Null => Some(Vec::new()),
        Value::Sequence(items) => Some(items.iter().collect()),
        Value::Mapping(map) => {
            let mut entries: Vec<(String, &Value)> =
                map.iter().map(|(k, v)| (format_value(k), v)).collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Some(entries.into_iter().map(|(_, v)| v).collect())
        }
        _ => None,
    }
}

fn is_true(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n
            .as_i64()
            .map_or_else(|| n.as_f64().is_some_and(|f| f.abs() > 0.0), |i| i != 0),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(items) => !items.is_empty(),
        Value::Mapping(map) => !map.is_empty(),
        Value::Tagged(tagged) => is_true(&tagged.value),
    }
}

/// Equality of two scalars; `None` when the types can't be compared.
fn equal(a: &Value, b: &Value) -> Option<bool> {
    match (untag(a), untag(b)) {
        (Value::Null, Value::Null) => Some(true),
        (Value::Bool(x), Value::Bool(y)) => Some(x == y),
        (Value::String(x), Value::String(y)) => Some(x == y),
        (Value::Number(x), Value::Number(y)) => Some(match (x.as_i64(), y.as_i64()) {
            (Some(i), Some(j)) => i == j,
            _ => x == y,
        }),
        _ => None,
    }
}

fn length(value: &Value) -> Option<usize> {
    match untag(value) {
        Value::String(s) => Some(s.len()),
        Value::Sequence(items) => Some(items.len()),
        Value::Mapping(map) => Some(map.len()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Format a value the way the deployed templates have always printed them:
/// sequences as `[a b]`, mappings as `map[k:v]` with sorted keys and null
/// as `<no value>`.
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "<no value>".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => {
            let items: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", items.join(" "))
        }
        Value::Mapping(map) => format_mapping(map),
        Value::Tagged(tagged) => format_value(&tagged.value),
    }
}

fn format_mapping(map: &Mapping) -> String {
    let mut entries: Vec<(String, String)> = map
        .iter()
        .map(|(k, v)| (format_value(k), format_value(v)))
        .collect();
    entries.sort();
    let entries: Vec<String> = entries.into_iter().map(|(k, v)| format!("{k}:{v}")).collect();
    format!("map[{}]", entries.join(" "))
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

const fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn count_lines(text: &str) -> usize {
    text.matches('\n').count()
}
