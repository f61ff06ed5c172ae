//! ordmap exposition
//!
//! Walks through insertion, rank lookup, deletion, bulk append, and the
//! value-semantics guarantee, narrating each step so the shape of the
//! tree and its invariants are visible as it evolves.

use ordmap::BTree;

fn dump(label: &str, tree: &BTree<i32, &'static str>) {
    let entries: Vec<_> = tree.iter().collect();
    println!("{label}: {entries:?} (len = {})", tree.len());
}

fn main() {
    println!("Creating an order-4 tree (max 3 keys per node).");
    let mut tree: BTree<i32, &'static str> = BTree::with_order(4).unwrap();

    for (key, payload) in [(10, "ten"), (20, "twenty"), (5, "five"), (6, "six"), (12, "twelve")] {
        println!("\nINSERT({key}, {payload:?})");
        tree.insert(key, payload).unwrap();
        dump("  tree", &tree);
    }

    println!("\nINDEX-OF(12)");
    println!("  rank = {:?}", tree.index_of(&12).map(|p| p.rank()));

    println!("\nSET(12, \"dozen\") replaces in place");
    let previous = tree.set(12, "dozen");
    println!("  previous payload = {previous:?}");
    dump("  tree", &tree);

    println!("\nREMOVE(10)");
    let removed = tree.remove(&10);
    println!("  removed payload = {removed:?}");
    dump("  tree", &tree);

    println!("\nAPPEND-SORTED([(30, \"thirty\")])");
    tree.append_sorted([(30, "thirty")]).unwrap();
    dump("  tree", &tree);

    println!("\nCloning the tree (O(1), shares storage) then mutating the clone.");
    let snapshot = tree.clone();
    tree.remove(&6);
    dump("  snapshot (unaffected)", &snapshot);
    dump("  tree (mutated)", &tree);
}
