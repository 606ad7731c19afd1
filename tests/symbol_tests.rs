use ll1_gen::loader::load_str;
use ll1_gen::symbol::{EMPTY_NAME, END_NAME};

#[test]
fn terminal_and_non_terminal_classify_correctly() {
    let g = load_str("E:\n    T_ID\n").unwrap();
    let e = g.symbol_id("E").unwrap();
    let t_id = g.symbol_id("T_ID").unwrap();
    assert!(g.is_non_terminal(e));
    assert!(!g.is_terminal(e));
    assert!(g.is_terminal(t_id));
    assert!(!g.is_non_terminal(t_id));
}

#[test]
fn empty_and_end_sentinels_are_recognised_by_name() {
    let mut g = load_str("S:\n    T_A\n    T_\n").unwrap();
    let empty = g.symbol_id(EMPTY_NAME).unwrap();
    let end = g.ensure_end();
    assert!(g.symbol(empty).is_empty_symbol());
    assert!(g.symbol(end).is_end_symbol());
    assert_eq!(g.name_of(end), END_NAME);
}

#[test]
fn symbols_order_by_name() {
    let g = load_str("A:\n    T_X\nB:\n    T_Y\n").unwrap();
    let a = g.symbol(g.symbol_id("A").unwrap());
    let b = g.symbol(g.symbol_id("B").unwrap());
    assert!(a < b);
}
