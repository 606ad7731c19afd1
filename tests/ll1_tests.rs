use ll1_gen::first_follow::{compute_first_sets, compute_follow_sets};
use ll1_gen::loader::load_str;
use ll1_gen::recursion::eliminate_direct_left_recursion;
use ll1_gen::table::build_parse_table;
use ll1_gen::validator::validate;

fn build(text: &str) -> ll1_gen::Grammar {
    let mut g = load_str(text).unwrap();
    eliminate_direct_left_recursion(&mut g);
    compute_first_sets(&mut g);
    compute_follow_sets(&mut g);
    validate(&mut g).unwrap();
    build_parse_table(&mut g).unwrap();
    g
}

#[test]
fn table_has_an_entry_for_every_first_set_lookahead() {
    let g = build("S:\n    A T_B\nA:\n    T_A\n    T_\n");
    let a = g.symbol_id("A").unwrap();
    let t_a = g.symbol_id("T_A").unwrap();
    assert!(g.parse_table().contains_key(&(a, t_a)));
}

#[test]
fn epsilon_production_is_predicted_through_follow() {
    let g = build("S:\n    A T_B\nA:\n    T_A\n    T_\n");
    let a = g.symbol_id("A").unwrap();
    let t_b = g.symbol_id("T_B").unwrap();
    assert!(g.parse_table().contains_key(&(a, t_b)));
}

#[test]
fn a_non_terminal_with_only_alpha_alternatives_rewrites_to_zero_own_productions() {
    let mut g = load_str("S:\n    S T_A\n").unwrap();
    eliminate_direct_left_recursion(&mut g);
    let s = g.symbol_id("S").unwrap();
    assert_eq!(g.productions_of_sorted(s).len(), 0);
    assert!(g.symbol_id("S-1").is_some());
}

#[test]
fn a_conflicting_grammar_is_rejected_by_the_validator() {
    let mut g = load_str("S:\n    A T_C\n    T_A\nA:\n    T_A\n    T_\n").unwrap();
    compute_first_sets(&mut g);
    compute_follow_sets(&mut g);
    assert!(validate(&mut g).is_err());
}
