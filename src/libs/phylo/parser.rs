use super::error::TreeError;
use super::node::NodeId;
use super::taxon::DuplicatePolicy;
use super::tree::Tree;
use nom::{
    branch::alt,
    bytes::complete::{is_not, take_while},
    character::complete::{char, digit1, multispace0},
    combinator::{cut, map, opt, recognize},
    error::{context, ContextError, ErrorKind, FromExternalError, ParseError},
    multi::many0,
    sequence::{delimited, preceded, terminated},
    IResult, Offset, Parser,
};

// ================================================================================================
// Error Handling Structures
// ================================================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum TraceFrame {
    Context(&'static str),
    Nom(ErrorKind),
}

/// nom error that keeps every context it passed through, innermost first.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseTrace<'a> {
    pub frames: Vec<(&'a str, TraceFrame)>,
}

impl<'a> ParseError<&'a str> for ParseTrace<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        ParseTrace {
            frames: vec![(input, TraceFrame::Nom(kind))],
        }
    }

    fn append(input: &'a str, kind: ErrorKind, mut other: Self) -> Self {
        other.frames.push((input, TraceFrame::Nom(kind)));
        other
    }
}

impl<'a> ContextError<&'a str> for ParseTrace<'a> {
    fn add_context(input: &'a str, ctx: &'static str, mut other: Self) -> Self {
        other.frames.push((input, TraceFrame::Context(ctx)));
        other
    }
}

impl<'a, E> FromExternalError<&'a str, E> for ParseTrace<'a> {
    fn from_external_error(input: &'a str, kind: ErrorKind, _e: E) -> Self {
        ParseTrace {
            frames: vec![(input, TraceFrame::Nom(kind))],
        }
    }
}

type PResult<'a, O> = IResult<&'a str, O, ParseTrace<'a>>;

// ================================================================================================
// Intermediate Structure
// ================================================================================================

/// What follows a leaf or a closing parenthesis:
/// `label[comment]:length[comment]`, every part optional.
#[derive(Debug, Default)]
struct NodeData {
    label: Option<String>,
    comment: Option<String>,
    length: Option<String>,
    length_comment: Option<String>,
}

impl NodeData {
    /// Store on node `id`. A leaf's label becomes a taxon, an internal
    /// node's label its name.
    fn apply(self, tree: &mut Tree, id: NodeId) -> Result<(), TreeError> {
        let is_leaf = tree.get_node(id).is_some_and(|n| n.is_leaf());

        let taxon = match (&self.label, is_leaf) {
            (Some(label), true) => Some(
                tree.taxa_mut()
                    .new_taxon(label.as_str(), DuplicatePolicy::Allow)?,
            ),
            _ => None,
        };

        if let Some(node) = tree.get_node_mut(id) {
            if taxon.is_some() {
                node.taxon = taxon;
            } else {
                node.name = self.label;
            }
            node.comment = self.comment;
            node.length = self.length;
            node.length_comment = self.length_comment;
        }

        Ok(())
    }
}

// ================================================================================================
// Parsers
// ================================================================================================

// Wraps a parser and ignores surrounding whitespace (spaces, tabs, newlines).
fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

// Node label.
// - Unquoted: stops at "():;,[]", surrounding whitespace trimmed
// - 'single quoted', with '' for an embedded quote
// - "double quoted", with "" for an embedded quote
fn parse_label(input: &str) -> PResult<'_, String> {
    let unquoted = map(take_while(|c: char| !"():;,[]".contains(c)), |s: &str| {
        s.trim().to_string()
    });

    let single_quoted = map(
        many0(alt((
            map(is_not("'"), |s: &str| s.to_string()),
            map((char('\''), char('\'')), |_| "'".to_string()),
        ))),
        |parts: Vec<String>| parts.concat(),
    );
    let single_quoted = delimited(
        preceded(multispace0, char('\'')),
        single_quoted,
        terminated(char('\''), multispace0),
    );

    let double_quoted = map(
        many0(alt((
            map(is_not("\""), |s: &str| s.to_string()),
            map((char('"'), char('"')), |_| "\"".to_string()),
        ))),
        |parts: Vec<String>| parts.concat(),
    );
    let double_quoted = delimited(
        preceded(multispace0, char('"')),
        double_quoted,
        terminated(char('"'), multispace0),
    );

    context("label", alt((single_quoted, double_quoted, unquoted))).parse(input)
}

// Branch length after a colon, kept as written.
// Accepts 1, 1., 0.25, .25, -0.1, 1e-5, 2.5E+3
fn parse_length(input: &str) -> PResult<'_, String> {
    let mantissa = alt((
        recognize((digit1, opt((char('.'), opt(digit1))))),
        recognize((char('.'), digit1)),
    ));
    let exponent = (
        alt((char('e'), char('E'))),
        opt(alt((char('+'), char('-')))),
        digit1,
    );
    let number = recognize((opt(alt((char('+'), char('-')))), mantissa, opt(exponent)));

    context(
        "length",
        preceded(
            ws(char(':')),
            // Once a ':' is seen the number must follow
            cut(map(number, |s: &str| s.to_string())),
        ),
    )
    .parse(input)
}

// Zero or more bracketed comments, kept verbatim with their brackets.
fn parse_comments(input: &str) -> PResult<'_, Option<String>> {
    let comment = preceded(
        multispace0,
        recognize(delimited(
            char('['),
            take_while(|c: char| c != ']'),
            cut(char(']')),
        )),
    );

    context(
        "comment",
        map(many0(comment), |found: Vec<&str>| {
            if found.is_empty() {
                None
            } else {
                Some(found.concat())
            }
        }),
    )
    .parse(input)
}

// label[comment]:length[comment]
fn parse_node_data(input: &str) -> PResult<'_, NodeData> {
    let (input, label) = opt(parse_label).parse(input)?;
    let (input, comment) = parse_comments(input)?;
    let (input, length) = opt(parse_length).parse(input)?;
    let (input, length_comment) = parse_comments(input)?;

    let data = NodeData {
        label: label.filter(|l| !l.is_empty()),
        comment,
        length,
        length_comment,
    };

    Ok((input, data))
}

// ================================================================================================
// Entry Point
// ================================================================================================

/// Parses a single Newick tree.
///
/// Comments before the tree, such as the rooting flag `[&R]`, are kept on the
/// tree. The tree must end with `;`. Only whitespace may follow it.
///
/// Clades are opened and closed with an explicit stack, so the nesting depth
/// is bounded by memory only.
///
/// ```
/// use nwkgraft::libs::phylo::parser::parse_newick;
/// let tree = parse_newick("(A:0.10,(B,C)L1:2e-3)R;").unwrap();
/// assert_eq!(tree.len(), 5);
/// assert_eq!(tree.to_newick(), "(A:0.10,(B,C)L1:2e-3)R;");
///
/// let tree = parse_newick("[&R] (A,B);").unwrap();
/// assert_eq!(tree.comment(), Some("[&R]"));
///
/// assert!(parse_newick("(A,B").is_err());
/// ```
pub fn parse_newick(input: &str) -> Result<Tree, TreeError> {
    let mut tree = Tree::new();

    let (mut rest, comment) = parse_comments(input).map_err(|e| nom_to_error(input, e))?;
    tree.set_comment(comment);

    // Internal nodes whose ')' is still ahead
    let mut open: Vec<NodeId> = Vec::new();
    let mut expect_clade = true;

    loop {
        rest = rest.trim_start();

        if expect_clade {
            let id = tree.add_node();
            match open.last() {
                Some(&parent) => tree.add_child(parent, id)?,
                None => tree.set_root(id),
            }

            if let Some(after) = rest.strip_prefix('(') {
                open.push(id);
                rest = after;
            } else {
                rest = read_node_data(&mut tree, id, input, rest)?;
                expect_clade = false;
            }
            continue;
        }

        match (rest.chars().next(), open.last().copied()) {
            (Some(','), Some(_)) => {
                rest = &rest[1..];
                expect_clade = true;
            }
            (Some(')'), Some(id)) => {
                open.pop();
                rest = read_node_data(&mut tree, id, input, &rest[1..])?;
            }
            (Some(';'), None) => {
                rest = &rest[1..];
                break;
            }
            (_, Some(_)) => return Err(error_at(input, rest, "expected ',' or ')'")),
            (_, None) => return Err(error_at(input, rest, "expected ';' after the tree")),
        }
    }

    if !rest.trim().is_empty() {
        return Err(error_at(input, rest, "unexpected text after ';'"));
    }

    Ok(tree)
}

fn read_node_data<'a>(
    tree: &mut Tree,
    id: NodeId,
    input: &'a str,
    rest: &'a str,
) -> Result<&'a str, TreeError> {
    let (rest, data) = parse_node_data(rest).map_err(|e| nom_to_error(input, e))?;
    data.apply(tree, id)?;
    Ok(rest)
}

// Line and column (both 1-based) of `remaining` within `input`.
fn locate(input: &str, remaining: &str) -> (usize, usize) {
    let offset = input.offset(remaining);
    let prefix = &input[..offset];
    let line = prefix.chars().filter(|&c| c == '\n').count() + 1;
    let last_newline = prefix.rfind('\n').map(|p| p + 1).unwrap_or(0);
    (line, offset - last_newline + 1)
}

fn error_at(input: &str, remaining: &str, message: &str) -> TreeError {
    let (line, column) = locate(input, remaining);
    TreeError::ParseError {
        message: message.to_string(),
        line,
        column,
        snippet: remaining.chars().take(50).collect(),
    }
}

fn nom_to_error<'a>(input: &'a str, err: nom::Err<ParseTrace<'a>>) -> TreeError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => trace_to_error(input, e),
        nom::Err::Incomplete(_) => TreeError::ParseError {
            message: "Incomplete input".to_string(),
            line: 0,
            column: 0,
            snippet: "".to_string(),
        },
    }
}

// Locate the innermost failure and describe the contexts around it.
fn trace_to_error(input: &str, trace: ParseTrace) -> TreeError {
    let remaining = trace.frames.first().map(|(rest, _)| *rest).unwrap_or(input);
    let (line, column) = locate(input, remaining);

    let mut message = String::new();
    for (_, frame) in trace.frames.iter().rev() {
        match frame {
            TraceFrame::Context(ctx) => message.push_str(&format!("while parsing {}:\n", ctx)),
            TraceFrame::Nom(kind) => message.push_str(&format!("  error: {:?}\n", kind)),
        }
    }

    TreeError::ParseError {
        message,
        line,
        column,
        snippet: remaining.chars().take(50).collect(),
    }
}
