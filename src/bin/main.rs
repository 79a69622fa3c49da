use edit_tree::EditTree;

fn show(tree: &EditTree) {
    tree.assert_invariants();
    println!(
        "{:?} {} rotations={}",
        tree.to_string(),
        tree.to_debug_string(),
        tree.total_rotations()
    );
}

fn main() {
    let mut tree = EditTree::new();

    for value in "abcdefgh".chars() {
        tree.insert(0, value).unwrap();
        show(&tree);
    }

    assert_eq!(tree.get_range(2, 3).unwrap(), "fed");

    let removed = tree.delete(3).unwrap();
    assert_eq!(removed, 'e');
    show(&tree);

    tree.insert(3, removed).unwrap();
    show(&tree);

    let copy = tree.clone();
    assert_eq!(copy.total_rotations(), 0);
    show(&copy);

    drop(tree);
}
