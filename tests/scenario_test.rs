//! Interaction scenarios and tree invariants through the public session API

use primetree::application::{ApplicationError, Event, NodeId, Session};
use primetree::domain::{factor_pairs, FactorPair, NodeKind};
use primetree::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn root(session: &Session, tree: usize) -> NodeId {
    session.resolve(tree, 0).expect("root")
}

fn completion(events: &[Event]) -> Option<(String, String)> {
    events.iter().find_map(|e| match e {
        Event::TreeCompleted { factorization, .. } => {
            Some((factorization.expanded(), factorization.compact()))
        }
        _ => None,
    })
}

// ============================================================
// Scenarios
// ============================================================

#[test]
fn given_twelve_when_splitting_two_six_then_two_three_then_tree_completes() {
    let mut s = Session::default();
    let events = s.start("12").unwrap();
    assert_eq!(events, vec![Event::TreeCreated { tree: 0, root: 12 }]);

    let r = root(&s, 0);
    let offered = s.choose_node(r).unwrap();
    match &offered[..] {
        [Event::ChoicesOffered { choices, value, .. }] => {
            assert_eq!(*value, 12);
            assert_eq!(choices, &vec![FactorPair(2, 6), FactorPair(3, 4)]);
        }
        other => panic!("unexpected events {other:?}"),
    }

    let events = s.apply_choice(r, FactorPair(2, 6)).unwrap();
    assert!(completion(&events).is_none());
    let two = s.resolve(0, 1).unwrap();
    let six = s.resolve(0, 2).unwrap();
    let tree = &s.canvas(0).unwrap().tree;
    assert_eq!(tree.node(two.node).unwrap().data.kind, NodeKind::Prime);
    assert_eq!(tree.node(six.node).unwrap().data.kind, NodeKind::Composite);

    let offered = s.choose_node(six).unwrap();
    assert!(matches!(
        &offered[..],
        [Event::ChoicesOffered { choices, .. }] if choices == &vec![FactorPair(2, 3)]
    ));
    let events = s.apply_choice(six, FactorPair(2, 3)).unwrap();
    assert_eq!(
        completion(&events),
        Some(("12 = 2 × 2 × 3".to_string(), "2^2 × 3".to_string()))
    );
    assert!(s.canvas(0).unwrap().result.is_some());
}

#[test]
fn given_prime_when_starting_then_notice_and_no_tree() {
    let mut s = Session::default();
    let events = s.start("7").unwrap();
    assert_eq!(events, vec![Event::PrimeNumber { value: 7 }]);
    assert!(s.canvases().is_empty());
    assert_eq!(s.current_number(), None);
    assert!(!s.is_input_locked());
}

#[test]
fn given_active_session_when_starting_prime_then_reset_then_notice() {
    let mut s = Session::default();
    s.start("12").unwrap();
    let events = s.start("7").unwrap();
    assert_eq!(
        events,
        vec![Event::SessionReset, Event::PrimeNumber { value: 7 }]
    );
    assert!(s.canvases().is_empty());
    assert_eq!(s.current_number(), None);
}

#[test]
fn given_active_twelve_when_starting_twelve_again_then_second_tree_and_reset_clears_both() {
    let mut s = Session::default();
    s.start("12").unwrap();
    let events = s.start("12").unwrap();
    assert_eq!(events, vec![Event::TreeCreated { tree: 1, root: 12 }]);
    assert_eq!(s.canvases().len(), 2);

    // trees are independent
    let r0 = root(&s, 0);
    s.choose_node(r0).unwrap();
    s.apply_choice(r0, FactorPair(3, 4)).unwrap();
    assert_eq!(s.canvas(0).unwrap().tree.len(), 3);
    assert_eq!(s.canvas(1).unwrap().tree.len(), 1);

    assert_eq!(s.reset(), Event::SessionReset);
    assert!(s.canvases().is_empty());
    assert_eq!(s.current_number(), None);
}

#[test]
fn given_invalid_input_when_starting_then_error_and_session_untouched() {
    let mut s = Session::default();
    for raw in ["abc", "1", "0", "-3", "2.5", ""] {
        assert!(matches!(
            s.start(raw),
            Err(ApplicationError::InvalidInput { .. })
        ));
    }
    assert_eq!(s.current_number(), None);

    s.start("12").unwrap();
    assert!(s.start("abc").is_err());
    assert!(s.start("1").is_err());
    assert_eq!(s.current_number(), Some(12));
    assert_eq!(s.canvases().len(), 1);
}

#[test]
fn given_thirty_six_when_splitting_six_six_then_each_two_three_then_squares() {
    let mut s = Session::default();
    s.start("36").unwrap();
    let r = root(&s, 0);
    s.choose_node(r).unwrap();
    s.apply_choice(r, FactorPair(6, 6)).unwrap();

    let mut last = Vec::new();
    for ordinal in [1, 2] {
        let six = s.resolve(0, ordinal).unwrap();
        s.choose_node(six).unwrap();
        last = s.apply_choice(six, FactorPair(2, 3)).unwrap();
    }
    let mut leaves = s.canvas(0).unwrap().tree.prime_leaves();
    leaves.sort();
    assert_eq!(leaves, vec![2, 2, 3, 3]);
    assert_eq!(
        completion(&last),
        Some(("36 = 2 × 2 × 3 × 3".to_string(), "2^2 × 3^2".to_string()))
    );
}

// ============================================================
// Invariants over every choice sequence
// ============================================================

/// Replays a path of choice indices, always splitting the first pending node.
fn replay(n: u64, path: &[usize]) -> Session {
    let mut s = Session::default();
    s.start(&n.to_string()).unwrap();
    for &choice in path {
        let node = s.canvas(0).unwrap().tree.first_pending().unwrap();
        s.choose_node(NodeId { tree: 0, node }).unwrap();
        s.pick(0, choice).unwrap();
    }
    s
}

fn explore(n: u64, path: &mut Vec<usize>, finals: &mut Vec<Vec<u64>>) {
    let s = replay(n, path);
    let tree = &s.canvas(0).unwrap().tree;

    // completion iff the prime leaves multiply back to the root
    let product: u64 = tree.prime_leaves().iter().product();
    assert_eq!(tree.is_complete(), product == n, "n={n} path={path:?}");

    for (_, node) in tree.nodes() {
        // kind stays a function of value
        assert_eq!(node.data.kind, NodeKind::of(node.data.value));
        if let &[l, r] = node.children.as_slice() {
            let lv = tree.node(l).unwrap().data.value;
            let rv = tree.node(r).unwrap().data.value;
            assert_eq!(lv * rv, node.data.value);
            assert_eq!(tree.node(l).unwrap().data.depth, node.data.depth + 1);
        } else {
            assert!(node.children.is_empty());
        }
    }

    match tree.first_pending() {
        None => {
            let mut leaves = tree.prime_leaves();
            leaves.sort();
            finals.push(leaves);
        }
        Some(idx) => {
            let value = tree.node(idx).unwrap().data.value;
            for choice in 0..factor_pairs(value).len() {
                path.push(choice);
                explore(n, path, finals);
                path.pop();
            }
        }
    }
}

#[test]
fn given_any_choice_sequence_when_completing_then_same_factorization() {
    for n in [12u64, 36, 72, 96, 210] {
        let mut finals = Vec::new();
        explore(n, &mut Vec::new(), &mut finals);
        assert!(finals.len() > 1, "n={n} should admit several trees");
        assert!(finals.windows(2).all(|w| w[0] == w[1]), "n={n}");
    }
}

#[test]
fn given_decomposed_nodes_when_checking_others_then_classification_unchanged() {
    let mut s = Session::default();
    s.start("60").unwrap();
    let before: Vec<_> = s
        .canvas(0)
        .unwrap()
        .tree
        .nodes()
        .map(|(_, n)| n.data.kind)
        .collect();
    let r = root(&s, 0);
    s.choose_node(r).unwrap();
    s.apply_choice(r, FactorPair(6, 10)).unwrap();
    let after = s.canvas(0).unwrap().tree.node(r.node).unwrap().data.kind;
    assert_eq!(before[0], after);
}
