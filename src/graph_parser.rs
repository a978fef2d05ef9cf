use winnow::prelude::*;
use winnow::ascii::{Caseless, multispace0};
use winnow::combinator::{alt, not, opt, peek, terminated};
use winnow::token::{any, literal, one_of, take_till, take_until, take_while};

use crate::error::{Error, Result};
use crate::graph_ast::*;

pub fn parse_graph(text: &str) -> Result<Graph> {
    let mut input = text;
    let mut graph = Graph::new();
    match digraph(&mut input, &mut graph) {
        Ok(()) => {
            graph.resolve_edge_status();
            Ok(graph)
        }
        Err(_) => Err(syntax_error(text, input)),
    }
}

fn syntax_error(text: &str, rest: &str) -> Error {
    let consumed = &text[..text.len() - rest.len()];
    let line = consumed.matches('\n').count() + 1;
    let column = consumed
        .rsplit('\n')
        .next()
        .map(|l| l.chars().count())
        .unwrap_or(0)
        + 1;
    let context = rest.lines().next().unwrap_or("").trim();
    let context = if context.is_empty() {
        "end of input".to_string()
    } else if context.chars().count() > 40 {
        let head: String = context.chars().take(40).collect();
        format!("{head}...")
    } else {
        context.to_string()
    };
    Error::Parse {
        line,
        column,
        context,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Scope {
    Root,
    Subgraph,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum AttrTarget {
    Graph,
    Node,
    Edge,
}

fn digraph(input: &mut &str, graph: &mut Graph) -> winnow::Result<()> {
    ws(input)?;
    graph.strict = opt(keyword("strict")).parse_next(input)?.is_some();
    ws(input)?;
    keyword("digraph").parse_next(input)?;
    ws(input)?;
    if !input.starts_with('{') {
        graph.name = Some(id.parse_next(input)?);
        ws(input)?;
    }
    "{".parse_next(input)?;
    stmt_list(input, graph, Scope::Root, &mut Attributes::new())?;
    "}".parse_next(input)?;
    ws(input)?;
    if !input.is_empty() {
        return Err(winnow::error::ParserError::from_input(input));
    }
    Ok(())
}

/// `local_edge` holds the `edge [...]` defaults opened by enclosing subgraphs.
fn stmt_list(input: &mut &str, graph: &mut Graph, scope: Scope, local_edge: &mut Attributes) -> winnow::Result<()> {
    loop {
        ws(input)?;
        if input.starts_with('}') || input.is_empty() {
            return Ok(());
        }
        stmt(input, graph, scope, local_edge)?;
        ws(input)?;
        opt(";").parse_next(input)?;
    }
}

fn stmt(input: &mut &str, graph: &mut Graph, scope: Scope, local_edge: &mut Attributes) -> winnow::Result<()> {
    if input.starts_with('{') || opt(peek(keyword("subgraph"))).parse_next(input)?.is_some() {
        return subgraph(input, graph, local_edge);
    }

    if let Some(target) = opt(attr_stmt_head).parse_next(input)? {
        let attrs = attr_lists(input)?;
        match (target, scope) {
            (AttrTarget::Graph, Scope::Root) => graph.graph_attrs.merge(&attrs),
            (AttrTarget::Node, Scope::Root) => graph.node_defaults.merge(&attrs),
            (AttrTarget::Edge, Scope::Root) => graph.edge_defaults.merge(&attrs),
            // folded into the subgraph's edges so their status survives flattening
            (AttrTarget::Edge, Scope::Subgraph) => local_edge.merge(&attrs),
            // subgraph-local graph and node settings only steer layout
            (_, Scope::Subgraph) => {}
        }
        return Ok(());
    }

    let first = node_id.parse_next(input)?;
    ws(input)?;
    port(input)?;

    if opt("=").parse_next(input)?.is_some() {
        ws(input)?;
        let value = id.parse_next(input)?;
        if scope == Scope::Root {
            graph.graph_attrs.insert(first, value);
        }
        return Ok(());
    }

    if input.starts_with("->") {
        return edge_chain(input, graph, first, local_edge);
    }

    let attrs = if input.starts_with('[') {
        attr_lists(input)?
    } else {
        Attributes::new()
    };
    graph.add_node(&first, &attrs);
    Ok(())
}

fn edge_chain(input: &mut &str, graph: &mut Graph, first: String, local_edge: &Attributes) -> winnow::Result<()> {
    let mut chain = vec![first];
    loop {
        ws(input)?;
        if opt("->").parse_next(input)?.is_none() {
            break;
        }
        ws(input)?;
        chain.push(node_id.parse_next(input)?);
        ws(input)?;
        port(input)?;
    }
    let mut attrs = local_edge.clone();
    if input.starts_with('[') {
        attrs.merge(&attr_lists(input)?);
    }
    for pair in chain.windows(2) {
        graph.add_edge(Edge::new(pair[0].clone(), pair[1].clone(), attrs.clone()));
    }
    Ok(())
}

fn subgraph(input: &mut &str, graph: &mut Graph, inherited: &Attributes) -> winnow::Result<()> {
    if opt(keyword("subgraph")).parse_next(input)?.is_some() {
        ws(input)?;
        if !input.starts_with('{') {
            id.parse_next(input)?;
            ws(input)?;
        }
    }
    "{".parse_next(input)?;
    let mut local_edge = inherited.clone();
    stmt_list(input, graph, Scope::Subgraph, &mut local_edge)?;
    "}".parse_next(input)?;
    Ok(())
}

fn attr_stmt_head(input: &mut &str) -> winnow::Result<AttrTarget> {
    terminated(
        alt((
            keyword("graph").value(AttrTarget::Graph),
            keyword("node").value(AttrTarget::Node),
            keyword("edge").value(AttrTarget::Edge),
        )),
        (ws, peek("[")),
    )
    .parse_next(input)
}

fn attr_lists(input: &mut &str) -> winnow::Result<Attributes> {
    let mut attrs = Attributes::new();
    while input.starts_with('[') {
        attr_list(input, &mut attrs)?;
        ws(input)?;
    }
    Ok(attrs)
}

fn attr_list(input: &mut &str, attrs: &mut Attributes) -> winnow::Result<()> {
    "[".parse_next(input)?;
    loop {
        ws(input)?;
        if opt("]").parse_next(input)?.is_some() {
            return Ok(());
        }
        let key = id.parse_next(input)?;
        ws(input)?;
        "=".parse_next(input)?;
        ws(input)?;
        let value = id.parse_next(input)?;
        attrs.insert(key, value);
        ws(input)?;
        opt(one_of([',', ';'])).parse_next(input)?;
    }
}

/// `:port` and `:port:compass` suffixes on a node reference. Layout only, so dropped.
fn port(input: &mut &str) -> winnow::Result<()> {
    while opt(":").parse_next(input)?.is_some() {
        ws(input)?;
        id.parse_next(input)?;
        ws(input)?;
    }
    Ok(())
}

/// Identifier in statement position; bare keywords are not node names.
fn node_id(input: &mut &str) -> winnow::Result<String> {
    if opt(peek(reserved)).parse_next(input)?.is_some() {
        return Err(winnow::error::ParserError::from_input(input));
    }
    id.parse_next(input)
}

fn reserved(input: &mut &str) -> winnow::Result<()> {
    alt((
        keyword("node"),
        keyword("edge"),
        keyword("graph"),
        keyword("digraph"),
        keyword("subgraph"),
        keyword("strict"),
    ))
    .void()
    .parse_next(input)
}

fn id(input: &mut &str) -> winnow::Result<String> {
    alt((quoted, numeral.map(str::to_string), bare.map(str::to_string))).parse_next(input)
}

fn is_id_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.' || !c.is_ascii()
}

fn bare<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    take_while(1.., is_id_char).parse_next(input)
}

fn numeral<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    ("-", take_while(1.., |c: char| c.is_ascii_digit() || c == '.'))
        .take()
        .parse_next(input)
}

fn quoted(input: &mut &str) -> winnow::Result<String> {
    "\"".parse_next(input)?;
    let mut out = String::new();
    loop {
        let c: char = any.parse_next(input)?;
        match c {
            '"' => return Ok(out),
            '\\' => {
                let next: char = any.parse_next(input)?;
                match next {
                    '"' => out.push('"'),
                    // escaped newline continues the string
                    '\n' => {}
                    other => {
                        out.push('\\');
                        out.push(other);
                    }
                }
            }
            other => out.push(other),
        }
    }
}

fn keyword<'s>(kw: &'static str) -> impl FnMut(&mut &'s str) -> winnow::Result<&'s str> {
    move |input: &mut &'s str| {
        terminated(literal(Caseless(kw)), not(one_of(is_id_char))).parse_next(input)
    }
}

/// Whitespace, `//` and `#` line comments, `/* */` block comments.
fn ws(input: &mut &str) -> winnow::Result<()> {
    loop {
        multispace0.parse_next(input)?;
        if input.starts_with("//") || input.starts_with('#') {
            take_till(0.., '\n').parse_next(input)?;
        } else if input.starts_with("/*") {
            "/*".parse_next(input)?;
            take_until(0.., "*/").parse_next(input)?;
            "*/".parse_next(input)?;
        } else {
            return Ok(());
        }
    }
}
