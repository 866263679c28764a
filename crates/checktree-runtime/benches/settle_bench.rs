//! Benchmarks for checkbox-tree transitions.
//!
//! Measures the cost of one settled transition (reduce, reconcile, derive)
//! on wide and deep trees, and of a bare reconciliation pass.
//!
//! Run with: cargo bench -p checktree-runtime --bench settle_bench
//!
//! | Scenario                | Tree shape            | Dominant cost            |
//! |-------------------------|-----------------------|--------------------------|
//! | leaf check, wide        | fanout 8, depth 4     | derive sweep             |
//! | leaf check, deep chain  | 1 child per level     | one sweep, membership    |
//! | check_all / uncheck_all | fanout 8, depth 4     | membership scans         |
//! | settle, long chain      | 1024 / 4096 levels    | one sweep, membership    |

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::rc::Rc;

use checktree_core::{
    Children, Comparator, DisabledPredicate, DisabledSet, ItemTree, NodeId, ReconcileMode,
    Selection, TreeView, settle, shake,
};
use checktree_runtime::{CheckboxTree, CheckboxTreeConfig, TreeOptions};

// ============================================================================
// Setup helpers
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Node {
    id: u32,
    kids: Vec<Node>,
}

fn wide(fanout: u32, depth: u32, next: &mut u32) -> Vec<Node> {
    (0..fanout)
        .map(|_| {
            *next += 1;
            let id = *next;
            let kids = if depth > 1 {
                wide(fanout, depth - 1, next)
            } else {
                Vec::new()
            };
            Node { id, kids }
        })
        .collect()
}

fn chain(len: u32) -> Vec<Node> {
    let mut node = Node {
        id: len,
        kids: Vec::new(),
    };
    for id in (1..len).rev() {
        node = Node {
            id,
            kids: vec![node],
        };
    }
    vec![node]
}

/// Chain link shared by `Rc`, so building a deep chain clones no subtrees.
#[derive(Debug)]
struct Link {
    id: u32,
    next: Vec<Rc<Link>>,
}

fn rc_chain(len: u32) -> Rc<Link> {
    let mut node = Rc::new(Link {
        id: len,
        next: Vec::new(),
    });
    for id in (1..len).rev() {
        node = Rc::new(Link {
            id,
            next: vec![node],
        });
    }
    node
}

fn config() -> CheckboxTreeConfig<Node> {
    CheckboxTreeConfig::new(Children::new(|n: &Node| Some(n.kids.as_slice())))
        .with_comparator(Comparator::by_key(|n: &Node| n.id))
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_leaf_toggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("checkbox_tree/leaf_toggle");

    for fanout in [4u32, 8] {
        let items = wide(fanout, 4, &mut 0);
        let mut tree = CheckboxTree::new(&items, config());
        let last = NodeId(tree.item_tree().len() - 1);
        group.bench_with_input(BenchmarkId::new("wide", fanout), &last, |b, &id| {
            b.iter(|| black_box(tree.toggle_node(id)));
        });
    }

    for len in [32u32, 256] {
        let items = chain(len);
        let mut tree = CheckboxTree::new(&items, config());
        let leaf = NodeId(len as usize);
        group.bench_with_input(BenchmarkId::new("chain", len), &leaf, |b, &id| {
            b.iter(|| black_box(tree.toggle_node(id)));
        });
    }

    group.finish();
}

fn bench_bulk(c: &mut Criterion) {
    let items = wide(8, 4, &mut 0);
    let mut tree = CheckboxTree::new(&items, config());
    c.bench_function("checkbox_tree/check_all_uncheck_all", |b| {
        b.iter(|| {
            black_box(tree.check_all());
            black_box(tree.uncheck_all());
        });
    });
}

fn bench_single_pass(c: &mut Criterion) {
    let items = chain(256);
    let mut tree = CheckboxTree::new(
        &items,
        config().with_options(TreeOptions::default().with_reconcile(ReconcileMode::SinglePass)),
    );
    c.bench_function("checkbox_tree/chain_single_pass", |b| {
        b.iter(|| black_box(tree.toggle_node(NodeId(256))));
    });
}

fn bench_shake(c: &mut Criterion) {
    let items = wide(8, 4, &mut 0);
    let tree = ItemTree::build(&items, &Children::new(|n: &Node| Some(n.kids.as_slice())));
    let disabled = DisabledSet::compute(&tree, &DisabledPredicate::never());
    let cmp = Comparator::by_key(|n: &Node| n.id);
    let view = TreeView::new(&tree, &cmp, &disabled);

    // Every leaf checked, no parent yet: one full pass of corrections.
    let leaves: Vec<Node> = tree
        .flatten()
        .filter(|&id| tree.is_leaf(id))
        .filter_map(|id| tree.item(id).cloned())
        .collect();
    let selection = Selection::from_items(leaves, &cmp);

    c.bench_function("reconcile/shake_pass", |b| {
        b.iter(|| black_box(shake(&selection, &view)));
    });
    c.bench_function("reconcile/settle_fixed_point", |b| {
        b.iter(|| black_box(settle(selection.clone(), &view, ReconcileMode::FixedPoint).passes));
    });
}

fn bench_long_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile/settle_chain");

    for len in [1024u32, 4096] {
        let tree = ItemTree::build(
            &[rc_chain(len)],
            &Children::new(|link: &Rc<Link>| Some(link.next.as_slice())),
        );
        let disabled = DisabledSet::compute(&tree, &DisabledPredicate::never());
        let cmp = Comparator::by_key(|link: &Rc<Link>| link.id);
        let view = TreeView::new(&tree, &cmp, &disabled);

        // Only the deepest leaf: every ancestor needs a correction.
        let leaf = tree.item(NodeId(len as usize)).cloned();
        let selection = Selection::from_items(leaf, &cmp);

        group.bench_with_input(BenchmarkId::from_parameter(len), &selection, |b, sel| {
            b.iter(|| black_box(settle(sel.clone(), &view, ReconcileMode::FixedPoint).corrections));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_leaf_toggle,
    bench_bulk,
    bench_single_pass,
    bench_shake,
    bench_long_chain
);
criterion_main!(benches);
