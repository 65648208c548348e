use crate::node::*;

/// Visitor pattern for traversing document nodes immutably
///
/// Default implementations walk the entire tree, including the content held
/// inside flat text bodies. Override specific visit_* methods to act on nodes.
pub trait Visitor: Sized {
    fn visit_node(&mut self, node: &Node) {
        walk_node(self, node);
    }

    fn visit_element(&mut self, element: &Element) {
        walk_element(self, element);
    }

    fn visit_text(&mut self, _text: &Text) {
        // Leaf node, no children to walk
    }

    fn visit_flat(&mut self, flat: &FlatText) {
        walk_flat(self, flat);
    }

    fn visit_opaque(&mut self, opaque: &Opaque) {
        walk_opaque(self, opaque);
    }
}

/// Mutable visitor pattern for rewriting document nodes
pub trait VisitorMut: Sized {
    fn visit_node_mut(&mut self, node: &mut Node) {
        walk_node_mut(self, node);
    }

    fn visit_element_mut(&mut self, element: &mut Element) {
        walk_element_mut(self, element);
    }

    fn visit_text_mut(&mut self, _text: &mut Text) {
        // Leaf node, no children to walk
    }

    fn visit_flat_mut(&mut self, flat: &mut FlatText) {
        walk_flat_mut(self, flat);
    }

    fn visit_opaque_mut(&mut self, opaque: &mut Opaque) {
        walk_opaque_mut(self, opaque);
    }
}

// Default walk implementations for immutable visitor

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &Node) {
    match node {
        Node::Element(el) => visitor.visit_element(el),
        Node::Text(text) => visitor.visit_text(text),
        Node::Flat(flat) => visitor.visit_flat(flat),
        Node::Opaque(opaque) => visitor.visit_opaque(opaque),
    }
}

pub fn walk_element<V: Visitor>(visitor: &mut V, element: &Element) {
    for child in &element.children {
        visitor.visit_node(child);
    }
}

pub fn walk_flat<V: Visitor>(visitor: &mut V, flat: &FlatText) {
    for paragraph in &flat.paragraphs {
        for node in &paragraph.content {
            visitor.visit_node(node);
        }
    }
}

pub fn walk_opaque<V: Visitor>(visitor: &mut V, opaque: &Opaque) {
    for child in &opaque.children {
        visitor.visit_node(child);
    }
}

// Default walk implementations for mutable visitor

pub fn walk_node_mut<V: VisitorMut>(visitor: &mut V, node: &mut Node) {
    match node {
        Node::Element(el) => visitor.visit_element_mut(el),
        Node::Text(text) => visitor.visit_text_mut(text),
        Node::Flat(flat) => visitor.visit_flat_mut(flat),
        Node::Opaque(opaque) => visitor.visit_opaque_mut(opaque),
    }
}

pub fn walk_element_mut<V: VisitorMut>(visitor: &mut V, element: &mut Element) {
    for child in &mut element.children {
        visitor.visit_node_mut(child);
    }
}

pub fn walk_flat_mut<V: VisitorMut>(visitor: &mut V, flat: &mut FlatText) {
    for paragraph in &mut flat.paragraphs {
        for node in &mut paragraph.content {
            visitor.visit_node_mut(node);
        }
    }
}

pub fn walk_opaque_mut<V: VisitorMut>(visitor: &mut V, opaque: &mut Opaque) {
    for child in &mut opaque.children {
        visitor.visit_node_mut(child);
    }
}

/// Collects every identity in a forest, including chain links of flat bodies
#[derive(Default)]
pub struct IdCollector {
    pub ids: Vec<NodeId>,
}

impl Visitor for IdCollector {
    fn visit_node(&mut self, node: &Node) {
        self.ids.push(node.id().clone());
        walk_node(self, node);
    }

    fn visit_flat(&mut self, flat: &FlatText) {
        for paragraph in &flat.paragraphs {
            self.ids.extend(paragraph.chain.iter().map(|link| link.id.clone()));
        }
        walk_flat(self, flat);
    }
}

/// All identities in `nodes`, in document order
pub fn collect_ids(nodes: &[Node]) -> Vec<NodeId> {
    let mut collector = IdCollector::default();
    for node in nodes {
        collector.visit_node(node);
    }
    collector.ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::Kind;

    struct CountElements(usize);

    impl Visitor for CountElements {
        fn visit_element(&mut self, element: &Element) {
            self.0 += 1;
            walk_element(self, element);
        }
    }

    #[test]
    fn test_walk_reaches_opaque_descendants() {
        let tree = Node::element(
            Kind::MsDesc,
            vec![Node::opaque(
                "facsimile",
                vec![Node::element(Kind::P, vec![Node::text("x")])],
            )],
        );

        let mut counter = CountElements(0);
        counter.visit_node(&tree);
        assert_eq!(counter.0, 2);
    }

    #[test]
    fn test_collect_ids_in_document_order() {
        let mut head = Element::new(Kind::Head);
        head.id = NodeId::new("b");
        let mut desc = Element::new(Kind::MsDesc).with_children(vec![Node::Element(head)]);
        desc.id = NodeId::new("a");

        let ids = collect_ids(&[Node::Element(desc)]);
        assert_eq!(ids, vec![NodeId::new("a"), NodeId::new("b")]);
    }
}
