#![no_main]

use arbitrary::Arbitrary;
use checktree_core::{Comparator, TreeView, is_consistent};
use checktree_runtime::{
    CheckboxTree, CheckboxTreeConfig, Children, DisabledPredicate, NodeId, ReconcileMode,
    TreeOptions,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, PartialEq)]
struct Node {
    id: u16,
    disabled: bool,
    kids: Vec<Node>,
}

#[derive(Debug, Arbitrary)]
enum Op {
    Toggle(u8),
    Check(u8),
    Uncheck(u8),
    ToggleAll,
    CheckAll,
    UncheckAll,
    SetChecked(Vec<u8>),
    Reshape(Vec<(u8, bool)>),
}

#[derive(Debug, Arbitrary)]
struct Input {
    shape: Vec<(u8, bool)>,
    single_pass: bool,
    ops: Vec<Op>,
}

/// Node `i` (1-based) hangs under `parent % i`, so the shape is always a forest.
fn forest(shape: &[(u8, bool)]) -> Vec<Node> {
    let shape = &shape[..shape.len().min(64)];
    let parents: Vec<usize> = shape
        .iter()
        .enumerate()
        .map(|(i, (p, _))| *p as usize % (i + 1))
        .collect();
    nest(&parents, shape, 0)
}

fn nest(parents: &[usize], shape: &[(u8, bool)], parent: usize) -> Vec<Node> {
    (1..=parents.len())
        .filter(|id| parents[id - 1] == parent)
        .map(|id| Node {
            id: id as u16,
            disabled: shape[id - 1].1,
            kids: nest(parents, shape, id),
        })
        .collect()
}

fuzz_target!(|input: Input| {
    let mode = if input.single_pass {
        ReconcileMode::SinglePass
    } else {
        ReconcileMode::FixedPoint
    };
    let config = CheckboxTreeConfig::new(Children::new(|n: &Node| Some(n.kids.as_slice())))
        .with_comparator(Comparator::by_key(|n: &Node| n.id))
        .with_disabled(DisabledPredicate::new(|n: &Node| n.disabled))
        .with_options(TreeOptions::default().with_reconcile(mode));
    let mut tree = CheckboxTree::new(&forest(&input.shape), config);

    for op in input.ops.iter().take(128) {
        let len = tree.item_tree().len();
        let node = |raw: u8| NodeId(raw as usize % len);
        match op {
            Op::Toggle(raw) => {
                tree.toggle_node(node(*raw)).expect("id in range");
            }
            Op::Check(raw) => {
                tree.check_node(node(*raw)).expect("id in range");
            }
            Op::Uncheck(raw) => {
                tree.uncheck_node(node(*raw)).expect("id in range");
            }
            Op::ToggleAll => {
                tree.toggle_all();
            }
            Op::CheckAll => {
                tree.check_all();
            }
            Op::UncheckAll => {
                tree.uncheck_all();
            }
            Op::SetChecked(raws) => {
                let items: Vec<Node> = raws
                    .iter()
                    .filter_map(|raw| tree.item_tree().item(node(*raw)).cloned())
                    .collect();
                tree.set_checked(items);
            }
            Op::Reshape(shape) => {
                tree.set_items(&forest(shape));
            }
        }

        // Stale ids must fail cleanly, never panic.
        assert!(tree.toggle_node(NodeId(usize::MAX)).is_err());

        if mode == ReconcileMode::FixedPoint {
            let cmp = Comparator::by_key(|n: &Node| n.id);
            let view = TreeView::new(tree.item_tree(), &cmp, tree.disabled_set());
            assert!(is_consistent(tree.selection(), &view), "unsettled collection");
        }
        let mut ids: Vec<u16> = tree.checked_items().iter().map(|n| n.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), tree.checked_items().len(), "duplicate checked item");
    }
});
