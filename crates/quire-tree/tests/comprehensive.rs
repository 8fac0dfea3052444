//! Comprehensive tests for quire-tree
//!
//! Path-copying edits, structural sharing and styled traversal.

use quire_codec::Value;
use quire_style::{Color, Keyword, Length, PropertyRegistry, Side, StyleMap, StyleVisitor};
use quire_tree::{Node, NodeKind};

fn styled(name: &str, value: Value) -> StyleMap {
    let property = PropertyRegistry::standard().resolve(name).unwrap();
    StyleMap::empty().set(&property, value).unwrap()
}

fn document() -> Node {
    Node::new_style(
        vec![
            Node::new_style_name(vec![Node::new_text("Title")], "h1"),
            Node::new_style(
                vec![Node::new_text("Hello, "), Node::new_placeholder("name")],
                styled("fontSize", Value::new(Length::px(12.0))),
            ),
            Node::new_text("!"),
        ],
        styled("textColor", Value::new(Color::BLACK)),
    )
}

#[test]
fn test_document_text() {
    let doc = document();
    assert_eq!(doc.text(), "TitleHello, !");
    assert_eq!(doc.child_count(), 3);
    assert_eq!(doc.child(0).unwrap().style_name(), Some("h1"));
}

#[test]
fn test_parent_invariant_holds_everywhere() {
    let doc = document();
    for node in doc.descendants() {
        let parent = node.parent().unwrap();
        let index = node.index().unwrap();
        assert_eq!(parent.child(index).unwrap(), node);
    }
}

#[test]
fn test_deep_edit_shares_untouched_subtrees() {
    let doc = document();
    let greeting = doc.child(1).unwrap().child(0).unwrap();
    let edited = greeting.parent().unwrap().replace_child(0, Node::new_text("Hi, ")).unwrap();

    let new_doc = edited.root();
    assert_eq!(new_doc.text(), "TitleHi, !");
    assert_eq!(doc.text(), "TitleHello, !");
    assert!(Node::ptr_eq(&new_doc.child(0).unwrap(), &doc.child(0).unwrap()));
    assert!(Node::ptr_eq(&new_doc.child(2).unwrap(), &doc.child(2).unwrap()));
    assert!(Node::ptr_eq(
        &edited.child(1).unwrap(),
        &doc.child(1).unwrap().child(1).unwrap()
    ));
    assert!(!Node::ptr_eq(&new_doc, &doc));
}

#[test]
fn test_remove_and_insert() {
    let doc = document();
    let removed = doc.remove_child(2).unwrap();
    assert_eq!(removed.text(), "TitleHello, ");
    let restored = removed.insert_child(2, Node::new_text("!")).unwrap();
    assert!(restored.structural_eq(&doc));
}

#[test]
fn test_removing_to_single_child_collapses_unstyled_container() {
    let list = Node::new_style(
        vec![Node::new_text("a"), Node::new_text("b")],
        StyleMap::empty(),
    );
    let collapsed = list.remove_child(1).unwrap();
    assert_eq!(collapsed.kind(), NodeKind::Text);
    assert_eq!(collapsed.text(), "a");
}

#[test]
fn test_set_attributes_inside_tree() {
    let doc = document();
    let bang = doc.child(2).unwrap();
    let bold = styled("fontWeight", Value::new(Keyword::new("bold")));
    let wrapped = bang.set_attributes(bold);
    assert_eq!(wrapped.kind(), NodeKind::Style);
    assert_eq!(wrapped.path(), vec![2]);
    assert_eq!(wrapped.root().child_count(), 3);
    assert_eq!(wrapped.child(0).unwrap().text(), "!");
}

#[derive(Default)]
struct Collect {
    colors: Vec<Color>,
    sizes: Vec<Length>,
    margins: usize,
}

impl StyleVisitor for Collect {
    fn text_color(&mut self, color: &Color) {
        self.colors.push(*color);
    }

    fn font_size(&mut self, size: &Length) {
        self.sizes.push(*size);
    }

    fn margin(&mut self, _side: Side, _length: &Length) {
        self.margins += 1;
    }
}

#[test]
fn test_walk_styles_visits_every_container() {
    let mut collect = Collect::default();
    document().walk_styles(&mut collect);
    assert_eq!(collect.colors, vec![Color::BLACK]);
    assert_eq!(collect.sizes, vec![Length::px(12.0)]);
    assert_eq!(collect.margins, 0);
}
