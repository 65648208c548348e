//! Sequences of mutations through the editor: notification order, cascades
//! and document integrity between steps

use msdesc_editor::{
    ChangeEvent, ChangeMethod, Config, Document, Editor, EditorError, Mutation, MutationError,
    Placement, PostEffect,
};
use msdesc_schema::Registry;
use msdesc_tree::{Kind, Node, NodeId, NodeKind, Path};
use std::cell::RefCell;
use std::rc::Rc;

fn el(kind: Kind, children: Vec<Node>) -> Node {
    Node::element(kind, children)
}

fn loaded() -> Editor {
    let mut editor = Editor::new(&Config::default());
    let diagnostics = editor.load(&[el(
        Kind::MsDesc,
        vec![
            el(Kind::MsIdentifier, vec![el(Kind::Idno, vec![Node::text("Cod. 7")])]),
            el(Kind::Head, vec![el(Kind::Title, vec![Node::text("Breviary")])]),
            el(
                Kind::MsContents,
                vec![el(Kind::MsItem, vec![el(Kind::Title, vec![Node::text("Psalms")])])],
            ),
            el(Kind::History, vec![el(Kind::P, vec![Node::text("Italy, s. XV")])]),
        ],
    )]);
    assert!(diagnostics.is_empty());
    editor
}

fn id_of(editor: &Editor, kind: Kind) -> NodeId {
    editor
        .summary()
        .iter()
        .find(|entry| entry.kind == kind)
        .map(|entry| entry.id.clone())
        .expect("component present")
}

fn path_of(editor: &Editor, kind: Kind) -> Path {
    editor.document().path_of(&id_of(editor, kind)).expect("path")
}

fn recorder(editor: &mut Editor) -> Rc<RefCell<Vec<ChangeEvent>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    editor.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    seen
}

#[test]
fn test_insert_then_delete_notify_in_order_after_commit() {
    let mut editor = loaded();
    let seen = recorder(&mut editor);

    let msdesc = Path::root().child(0, NodeKind::Element(Kind::MsDesc));
    let inserted = editor
        .insert(msdesc, 99, vec![el(Kind::Additional, vec![])])
        .unwrap();
    let inserted_id = inserted[0].events[0].id.clone();
    let history_id = id_of(&editor, Kind::History);
    editor.delete(path_of(&editor, Kind::History)).unwrap();

    // Both mutations are committed, nobody has been told yet
    assert!(seen.borrow().is_empty());
    assert!(editor.document().find(&inserted_id).is_some());
    assert!(editor.document().find(&history_id).is_none());
    assert_eq!(editor.pending_events().len(), 2);

    let delivered = editor.drain_events();
    assert_eq!(delivered, *seen.borrow());
    let methods: Vec<_> = seen.borrow().iter().map(|e| (e.method, e.id.clone())).collect();
    assert_eq!(
        methods,
        vec![
            (ChangeMethod::Insert, inserted_id),
            (ChangeMethod::Delete, history_id),
        ]
    );
    assert!(editor.pending_events().is_empty());
}

#[test]
fn test_deleting_last_wrapped_component_removes_wrapper() {
    let mut editor = loaded();
    let item = id_of(&editor, Kind::MsItem);
    let contents = editor.document().parent_of(&item).unwrap().id().clone();

    let applied = editor.delete(path_of(&editor, Kind::MsItem)).unwrap();
    assert_eq!(applied.len(), 2);

    let events = editor.drain_events();
    assert_eq!(events.len(), 2);
    assert_eq!((events[0].method, &events[0].id), (ChangeMethod::Delete, &item));
    assert_eq!((events[1].method, &events[1].id), (ChangeMethod::Delete, &contents));
    assert_eq!(events[1].kind, NodeKind::Element(Kind::MsContents));

    let sections: Vec<_> = editor.document().nodes()[0]
        .children()
        .iter()
        .filter_map(Node::kind)
        .collect();
    assert_eq!(sections, vec![Kind::MsIdentifier, Kind::Head, Kind::History]);
    assert!(editor.summary().iter().all(|entry| entry.kind != Kind::MsItem));
}

#[test]
fn test_versions_count_every_committed_mutation() {
    let mut editor = loaded();
    assert_eq!(editor.document().version, 0);

    let msdesc = id_of(&editor, Kind::MsDesc);
    editor
        .add_component(&msdesc, Kind::ObjectDesc, Placement::Child)
        .unwrap();
    assert_eq!(editor.document().version, 1);

    // Wrapper cascade: two versions for one call
    editor.delete(path_of(&editor, Kind::MsItem)).unwrap();
    assert_eq!(editor.document().version, 3);

    let stale = Path::root().child(0, NodeKind::Element(Kind::History));
    let err = editor.delete(stale).unwrap_err();
    assert!(matches!(err, EditorError::Mutation(MutationError::StaleAddress { .. })));
    assert_eq!(editor.document().version, 3);
    assert_eq!(editor.pending_events().len(), 3);
}

#[test]
fn test_summary_follows_each_step() {
    let mut editor = loaded();
    let msdesc = id_of(&editor, Kind::MsDesc);
    let before = editor.summary().len();

    let item = id_of(&editor, Kind::MsItem);
    let second = editor
        .add_component(&item, Kind::MsItem, Placement::After)
        .unwrap();
    assert_eq!(editor.summary().len(), before + 1);
    assert_eq!(
        editor.summary().parent_of(&second).map(|entry| entry.id.clone()),
        Some(msdesc.clone())
    );

    let path = editor.document().path_of(&second).unwrap();
    editor.delete(path).unwrap();
    assert_eq!(editor.summary().len(), before);
    assert!(editor.summary().find(&second).is_none());
}

#[test]
fn test_path_taken_before_a_same_kind_insert_is_stale() {
    let mut editor = loaded();
    let original = id_of(&editor, Kind::MsItem);
    let stale = editor.document().path_of(&original).unwrap();
    editor
        .add_component(&original, Kind::MsItem, Placement::After)
        .unwrap();

    // A new item takes slot 0, the old path still ends in msItem[0]
    let contents = editor.document().parent_of(&original).unwrap().id().clone();
    let contents_path = editor.document().path_of(&contents).unwrap();
    editor
        .insert(contents_path, 0, vec![el(Kind::MsItem, vec![])])
        .unwrap();
    let version = editor.document().version;
    let pending = editor.pending_events().len();

    let err = editor.delete(stale.clone()).unwrap_err();

    assert_eq!(
        err,
        EditorError::Mutation(MutationError::StaleAddress { path: stale })
    );
    assert!(editor.document().find(&original).is_some());
    let items = editor.document().find(&contents).unwrap().children().len();
    assert_eq!(items, 3);
    assert_eq!(editor.document().version, version);
    assert_eq!(editor.pending_events().len(), pending);
}

/// Follows every insert with a delete aimed at nothing
#[derive(Debug)]
struct DeleteMissing;

impl PostEffect for DeleteMissing {
    fn analyze(&self, mutation: &Mutation, _: &Document, _: &Registry) -> Vec<Mutation> {
        match mutation {
            Mutation::Insert { .. } => vec![Mutation::delete(
                Path::root().child(9, NodeKind::Element(Kind::Note)),
            )],
            _ => vec![],
        }
    }
}

#[test]
fn test_failed_follow_up_still_publishes_committed_insert() {
    let mut editor = loaded();
    editor.add_effect(Box::new(DeleteMissing));
    let msdesc = id_of(&editor, Kind::MsDesc);

    let err = editor
        .add_component(&msdesc, Kind::ObjectDesc, Placement::Child)
        .unwrap_err();
    assert!(matches!(err, EditorError::Mutation(MutationError::StaleAddress { .. })));

    // The insert committed, so the summary and the queue reflect it
    assert_eq!(editor.document().version, 1);
    let object = id_of(&editor, Kind::ObjectDesc);
    assert!(editor.document().find(&object).is_some());

    let events = editor.drain_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].method, ChangeMethod::Insert);
    let inserted = editor.document().find(&events[0].id).and_then(Node::kind);
    assert_eq!(inserted, Some(Kind::PhysDesc));
}
