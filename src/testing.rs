//! Shared proptest strategies.

use crate::model::IdeaTree;
use proptest::prelude::*;

/// Random trees up to six levels deep with unique ids `n0, n1, ...` in preorder.
pub(crate) fn arb_tree() -> impl Strategy<Value = IdeaTree> {
    let shape = Just(Vec::<IdeaTree>::new()).prop_recursive(5, 64, 6, |inner| {
        prop::collection::vec(inner, 0..6).prop_map(|kids| {
            kids.into_iter()
                .map(|grand| IdeaTree {
                    id: String::new(),
                    label: String::new(),
                    children: grand,
                    collapsed: false,
                })
                .collect()
        })
    });
    shape.prop_map(|children| {
        let mut tree = IdeaTree {
            id: String::new(),
            label: String::new(),
            children,
            collapsed: false,
        };
        let mut next = 0;
        number(&mut tree, &mut next);
        tree
    })
}

fn number(tree: &mut IdeaTree, next: &mut usize) {
    tree.id = format!("n{}", next);
    tree.label = format!("Node {}", next);
    *next += 1;
    for child in &mut tree.children {
        number(child, next);
    }
}
