//! Collapsing element chains into flat bodies and back.
//!
//! A chain is a fixed sequence of kinds, outermost first. A node matches
//! when it is an element of the first kind and every non-innermost link has
//! exactly one child, an element of the next kind. The children of the
//! innermost link become the paragraph content untouched.

use msdesc_tree::{FlatParagraph, FlatText, Kind, Node, NodeId};

/// Links and content of `node`, `None` unless it matches `chain`
pub(crate) fn collapse(node: &Node, chain: &[Kind]) -> Option<FlatParagraph> {
    let mut links = Vec::with_capacity(chain.len());
    let mut current = node;
    for (depth, kind) in chain.iter().enumerate() {
        let el = current.as_element().filter(|el| el.kind == *kind)?;
        links.push(el.to_link());
        if depth + 1 == chain.len() {
            return Some(FlatParagraph {
                chain: links,
                content: el.children.clone(),
            });
        }
        current = match el.children.as_slice() {
            [only] => only,
            _ => return None,
        };
    }
    None
}

/// Rebuild the element chain of one paragraph
pub(crate) fn expand(paragraph: FlatParagraph) -> Option<Node> {
    let mut links = paragraph.chain.into_iter().rev();
    let innermost = links.next()?;
    let mut node = Node::Element(innermost.into_element(paragraph.content));
    for link in links {
        node = Node::Element(link.into_element(vec![node]));
    }
    Some(node)
}

/// Replace each maximal run of chain-matching children with one flat body.
///
/// Every other child goes through `other` together with its original index.
pub(crate) fn collapse_runs(
    children: Vec<Node>,
    chain: &[Kind],
    mut other: impl FnMut(usize, Node) -> Node,
) -> Vec<Node> {
    let mut out = Vec::with_capacity(children.len());
    let mut run = Vec::new();
    for (index, child) in children.into_iter().enumerate() {
        match collapse(&child, chain) {
            Some(paragraph) => run.push(paragraph),
            None => {
                flush(&mut run, &mut out);
                out.push(other(index, child));
            }
        }
    }
    flush(&mut run, &mut out);
    out
}

/// Expand every flat body among `children` back into its chains
pub(crate) fn expand_runs(
    children: Vec<Node>,
    mut other: impl FnMut(usize, Node) -> Node,
) -> Vec<Node> {
    let mut out = Vec::with_capacity(children.len());
    for (index, child) in children.into_iter().enumerate() {
        match child {
            Node::Flat(flat) => out.extend(flat.paragraphs.into_iter().filter_map(expand)),
            other_node => out.push(other(index, other_node)),
        }
    }
    out
}

fn flush(run: &mut Vec<FlatParagraph>, out: &mut Vec<Node>) {
    if run.is_empty() {
        return;
    }
    let paragraphs = std::mem::take(run);
    let id = paragraphs
        .first()
        .and_then(|paragraph| paragraph.chain.first())
        .map(|link| flat_id(&link.id))
        .unwrap_or_default();
    out.push(Node::Flat(FlatText { id, paragraphs }));
}

/// Identity of a flat body, derived from its first collapsed element
fn flat_id(first: &NodeId) -> NodeId {
    if first.is_unassigned() {
        return NodeId::unassigned();
    }
    NodeId::new(format!("{}-flat", first))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(text: &str) -> Node {
        Node::element(Kind::Note, vec![Node::element(Kind::P, vec![Node::text(text)])])
    }

    #[test]
    fn test_chain_requires_a_single_link_child() {
        let chain = [Kind::Note, Kind::P];
        assert!(collapse(&note("a"), &chain).is_some());

        let two = Node::element(
            Kind::Note,
            vec![Node::element(Kind::P, vec![]), Node::element(Kind::P, vec![])],
        );
        assert!(collapse(&two, &chain).is_none());
        assert!(collapse(&Node::element(Kind::Note, vec![Node::text("x")]), &chain).is_none());
        assert!(collapse(&Node::text("x"), &chain).is_none());
    }

    #[test]
    fn test_runs_collapse_and_expand() {
        let children = vec![
            note("one"),
            note("two"),
            Node::element(Kind::Locus, vec![]),
            note("three"),
        ];
        let collapsed = collapse_runs(children.clone(), &[Kind::Note, Kind::P], |_, n| n);

        assert_eq!(collapsed.len(), 3);
        match &collapsed[0] {
            Node::Flat(flat) => assert_eq!(flat.paragraphs.len(), 2),
            other => panic!("expected flat body, got {:?}", other),
        }
        assert!(collapsed[1].is_kind(Kind::Locus));

        let expanded = expand_runs(collapsed, |_, n| n);
        assert_eq!(expanded, children);
    }

    #[test]
    fn test_flat_identity_derives_from_first_link() {
        let mut p = Node::element(Kind::P, vec![Node::text("x")]);
        p.set_id(NodeId::new("doc-4"));
        let out = collapse_runs(vec![p], &[Kind::P], |_, n| n);
        assert_eq!(out[0].id(), &NodeId::new("doc-4-flat"));
    }
}
