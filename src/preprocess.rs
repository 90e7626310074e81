use nom::bytes::complete::take_till1;
use nom::character::complete::char;
use nom::sequence::terminated;
use nom::IResult;

// --- Semantic Role Stripping ---

fn is_delimiter(c: char) -> bool {
    matches!(c, '(' | ')' | '|')
}

/// `role:` up to the first colon, without crossing a delimiter.
fn role_prefix(input: &str) -> IResult<&str, &str> {
    terminated(take_till1(|c: char| c == ':' || is_delimiter(c)), char(':'))(input)
}

/// True when what follows a candidate role is still a tagged node: either a
/// `TAG:WORD` leaf or a `TAG(` phrase.
fn tagged_node_follows(rest: &str) -> bool {
    let end = rest.find(is_delimiter).unwrap_or(rest.len());
    let span = &rest[..end];
    !span.is_empty() && (span.contains(':') || rest[end..].starts_with('('))
}

/// Removes the semantic-role prefix after each `(` and `|`, e.g.
/// `VP(Head:VC2:看|goal:NP(Head:Nab:樹))` becomes `VP(VC2:看|NP(Nab:樹))`.
/// Nodes that carry no role are left alone.
pub fn strip_semantic_roles(tree: &str) -> String {
    let mut out = String::with_capacity(tree.len());
    let mut rest = tree;
    while let Some(idx) = rest.find(|c: char| c == '(' || c == '|') {
        out.push_str(&rest[..=idx]);
        rest = &rest[idx + 1..];
        if let Ok((after, _role)) = role_prefix(rest) {
            if tagged_node_follows(after) {
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
