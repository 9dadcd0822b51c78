use pasmm::ast::{NodeId, NodeKind, SyntaxTree};
use pasmm::errors::{ErrorKind, PascalError, PascalResult};

fn statement(tree: &mut SyntaxTree) -> NodeId {
    tree.add_node(NodeKind::Statement, Vec::new())
}

fn assert_internal(result: PascalResult<()>) {
    match result {
        Err(err @ PascalError::InternalError(_)) => assert_eq!(err.kind(), ErrorKind::InternalConsistency),
        other => panic!("expected an internal error, got {:?}", other),
    }
}

#[test]
fn test_children_keep_append_order() -> PascalResult<()> {
    let mut tree = SyntaxTree::new();
    let root = tree.add_node(NodeKind::Program, Vec::new());
    let ids: Vec<NodeId> = (0..4).map(|_| statement(&mut tree)).collect();
    for &id in &ids {
        tree.append_child(root, id)?;
    }
    assert_eq!(tree.children(root).collect::<Vec<_>>(), ids);
    assert_eq!(tree.siblings(ids[1]).collect::<Vec<_>>(), ids[1..].to_vec());
    assert_eq!(tree.node(root).child(), Some(ids[0]));
    assert_eq!(tree.node(ids[3]).next(), None);
    Ok(())
}

#[test]
fn test_append_sibling_from_middle_of_chain() -> PascalResult<()> {
    let mut tree = SyntaxTree::new();
    let root = tree.add_node(NodeKind::Program, Vec::new());
    let (a, b, c) = (statement(&mut tree), statement(&mut tree), statement(&mut tree));
    tree.append_child(root, a)?;
    tree.append_child(root, b)?;
    // Appending relative to an earlier sibling still lands at the end.
    tree.append_sibling(a, c)?;
    assert_eq!(tree.children(root).collect::<Vec<_>>(), vec![a, b, c]);
    Ok(())
}

#[test]
fn test_detached_chain_is_spliced_whole() -> PascalResult<()> {
    let mut tree = SyntaxTree::new();
    let root = tree.add_node(NodeKind::Program, Vec::new());
    let (a, b, c, d) = (
        statement(&mut tree),
        statement(&mut tree),
        statement(&mut tree),
        statement(&mut tree),
    );
    tree.append_child(root, a)?;
    tree.append_sibling(c, d)?;
    tree.append_sibling(a, b)?;
    tree.append_sibling(b, c)?;
    assert_eq!(tree.children(root).collect::<Vec<_>>(), vec![a, b, c, d]);

    let e = statement(&mut tree);
    tree.append_child(root, e)?;
    assert_eq!(tree.children(root).last(), Some(e));
    Ok(())
}

#[test]
fn test_root_cannot_be_linked() -> PascalResult<()> {
    let mut tree = SyntaxTree::new();
    let root = tree.add_node(NodeKind::Program, Vec::new());
    let main_block = tree.add_node(NodeKind::MainBlock, Vec::new());
    tree.append_child(root, main_block)?;
    assert_internal(tree.append_child(main_block, root));
    assert_internal(tree.append_sibling(main_block, root));
    Ok(())
}

#[test]
fn test_node_cannot_be_linked_twice() -> PascalResult<()> {
    let mut tree = SyntaxTree::new();
    let root = tree.add_node(NodeKind::Program, Vec::new());
    let (a, b) = (statement(&mut tree), statement(&mut tree));
    tree.append_child(root, a)?;
    tree.append_child(root, b)?;
    assert_internal(tree.append_child(a, b));
    assert_internal(tree.append_sibling(b, a));
    assert_eq!(tree.children(root).count(), 2);
    Ok(())
}

#[test]
fn test_cycles_are_rejected() -> PascalResult<()> {
    let mut tree = SyntaxTree::new();
    let _root = tree.add_node(NodeKind::Program, Vec::new());
    let (a, b, c) = (statement(&mut tree), statement(&mut tree), statement(&mut tree));

    assert_internal(tree.append_child(a, a));
    assert_internal(tree.append_sibling(a, a));

    // a -> child b -> child c; a may not become a descendant of c.
    tree.append_child(a, b)?;
    tree.append_child(b, c)?;
    assert_internal(tree.append_child(c, a));
    assert_internal(tree.append_sibling(c, a));

    // x -> next y; x may not follow y.
    let (x, y) = (statement(&mut tree), statement(&mut tree));
    tree.append_sibling(x, y)?;
    assert_internal(tree.append_sibling(y, x));
    assert_internal(tree.append_child(y, x));
    Ok(())
}

#[test]
fn test_links_outside_tree_are_rejected() {
    let mut tree = SyntaxTree::new();
    let root = tree.add_node(NodeKind::Program, Vec::new());
    let mut other = SyntaxTree::new();
    other.add_node(NodeKind::Program, Vec::new());
    other.add_node(NodeKind::Statement, Vec::new());
    let foreign = other.add_node(NodeKind::Statement, Vec::new());
    assert_internal(tree.append_child(root, foreign));
    assert_internal(tree.append_sibling(foreign, root));
}

#[test]
fn test_long_sibling_chain() -> PascalResult<()> {
    let mut tree = SyntaxTree::new();
    let root = tree.add_node(NodeKind::Program, Vec::new());
    let block = tree.add_node(NodeKind::MainBlock, Vec::new());
    tree.append_child(root, block)?;
    for _ in 0..50_000 {
        let id = statement(&mut tree);
        tree.append_child(block, id)?;
    }
    assert_eq!(tree.children(block).count(), 50_000);
    assert_eq!(tree.len(), 50_002);
    Ok(())
}
