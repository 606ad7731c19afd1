use ll1_gen::first_follow::{compute_first_sets, compute_follow_sets};
use ll1_gen::loader::load_str;

#[test]
fn first_set_of_a_simple_non_terminal() {
    let mut g = load_str("S:\n    A T_B\nA:\n    T_A\n").unwrap();
    compute_first_sets(&mut g);
    let a = g.symbol_id("A").unwrap();
    let t_a = g.symbol_id("T_A").unwrap();
    assert!(g.first_set_of(a).contains(&t_a));
}

#[test]
fn follow_set_of_the_root_contains_end() {
    let mut g = load_str("S:\n    A T_B\nA:\n    T_A\n").unwrap();
    compute_first_sets(&mut g);
    compute_follow_sets(&mut g);
    let s = g.symbol_id("S").unwrap();
    let end = g.end_id().unwrap();
    assert!(g.follow_set(s).contains(&end));
}

#[test]
fn first_set_includes_empty_for_a_nullable_non_terminal() {
    let mut g = load_str("S:\n    A T_B\nA:\n    T_A\n    T_\n").unwrap();
    compute_first_sets(&mut g);
    let a = g.symbol_id("A").unwrap();
    let t_a = g.symbol_id("T_A").unwrap();
    let empty = g.empty_id().unwrap();
    assert!(g.first_set_of(a).contains(&t_a));
    assert!(g.first_set_of(a).contains(&empty));
}

#[test]
fn follow_propagates_first_of_the_next_symbol() {
    let text = "S:\n    A B\nA:\n    T_A\nB:\n    T_B\n";
    let mut g = load_str(text).unwrap();
    compute_first_sets(&mut g);
    compute_follow_sets(&mut g);
    let a = g.symbol_id("A").unwrap();
    let t_b = g.symbol_id("T_B").unwrap();
    assert!(g.follow_set(a).contains(&t_b));
}

#[test]
fn empty_never_appears_in_any_follow_set() {
    let text = "S:\n    A T_B\nA:\n    T_A\n    T_\n";
    let mut g = load_str(text).unwrap();
    compute_first_sets(&mut g);
    compute_follow_sets(&mut g);
    let empty = g.empty_id().unwrap();
    for nt in g.non_terminals().iter().copied() {
        assert!(!g.follow_set(nt).contains(&empty));
    }
}

#[test]
fn a_nullable_alternative_propagates_follow_through_it() {
    let text = "S:\n    A T_B\n    T_C\nA:\n    T_A\n    T_\n";
    let mut g = load_str(text).unwrap();
    compute_first_sets(&mut g);
    compute_follow_sets(&mut g);
    let a = g.symbol_id("A").unwrap();
    let t_b = g.symbol_id("T_B").unwrap();
    assert!(g.follow_set(a).contains(&t_b));
}
