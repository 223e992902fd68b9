//! Rendering of the BST structure via termtree.

use generational_arena::Index;
use termtree::Tree;

use crate::domain::ModificationGroup;
use crate::tree::{ModificationTree, OrderBy, TreeCore};

/// Display label of a group under the given ordering field.
fn label(order: OrderBy, group: &ModificationGroup) -> String {
    match order {
        OrderBy::Name => format!("{} (id {})", group.name(), group.id()),
        OrderBy::Priority => format!("{} (id {})", group.priority_value(), group.id()),
        OrderBy::AggregateCost => format!("{} (id {})", group.cost(), group.id()),
    }
}

/// Render the ordering edges as a termtree, labelled per the tree's
/// comparator kind.
pub fn render(tree: &ModificationTree) -> Tree<String> {
    let core = tree.read_core();
    match core.root {
        Some(root) => subtree(&core, root, tree.order()),
        None => Tree::new("(empty tree)".to_string()),
    }
}

fn subtree(core: &TreeCore, idx: Index, order: OrderBy) -> Tree<String> {
    let node = &core.arena[idx];
    let leaves: Vec<Tree<String>> = [node.left, node.right]
        .into_iter()
        .flatten()
        .map(|child| subtree(core, child, order))
        .collect();
    Tree::new(label(order, &node.group)).with_leaves(leaves)
}
