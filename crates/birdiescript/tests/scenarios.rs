//! End-to-end scripts exercising the worked examples and universal
//! invariants a conforming interpreter must satisfy.

use birdiescript::{compare, convert, tokenize, Capabilities, Rank, Runner, RunnerOptions, Value};

fn run(src: &str) -> Vec<Value> {
    let mut runner = Runner::new(src, Capabilities::null(), RunnerOptions::default()).expect("lex error");
    runner.run().expect("run error")
}

fn list_of(ints: &[i64]) -> Value {
    Value::list(ints.iter().map(|&n| Value::int(n)).collect())
}

#[test]
fn add_two_ints() {
    assert_eq!(run("2 3 +"), vec![Value::int(5)]);
}

#[test]
fn add_two_lists_concatenates() {
    assert_eq!(run("[1 2 3] [4 5] +"), vec![list_of(&[1, 2, 3, 4, 5])]);
}

#[test]
fn fold_multiply_over_a_list() {
    // A block folded over a sequence with `*` leaves the single reduced
    // value on top, not wrapped back in a List.
    assert_eq!(run("{*} [1 2 3 4 5] *"), vec![Value::int(120)]);
}

#[test]
fn upto_builds_a_counting_list() {
    assert_eq!(run("10 U"), vec![list_of(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9])]);
}

#[test]
fn split_a_string_around_another_string() {
    let result = run(r#"`ababab` `a` /"#);
    assert_eq!(result, vec![Value::list(vec![Value::str("b"), Value::str("b"), Value::str("b")])]);
}

#[test]
fn split_no_empty_drops_every_empty_piece() {
    // `%`'s SplitNoEmpty sibling drops empty pieces everywhere, not just
    // at the boundaries the way `/`'s Split does.
    let result = run(r#"`aabaa` `a` %"#);
    assert_eq!(result, vec![Value::list(vec![Value::str("b")])]);
}

#[test]
fn multiply_accepts_operands_in_either_order() {
    // The Func-shallow/Num-deep and Seq-shallow/Num-deep orderings both
    // retry with their operands swapped, so `n seq *` means the same
    // thing as `seq n *`.
    let repeated = list_of(&[1, 2, 3, 1, 2, 3]);
    assert_eq!(run("[1 2 3] 2 *"), vec![repeated.clone()]);
    assert_eq!(run("2 [1 2 3] *"), vec![repeated]);
}

#[test]
fn add_commonizes_before_classifying() {
    // A bare number appends/prepends to a sequence by commonizing up to a
    // one-element Seq of the same kind first, and two different Seq kinds
    // concatenate by commonizing the lower-ranked one up to the other's
    // kind.
    assert_eq!(run("5 [1 2 3] +"), vec![list_of(&[5, 1, 2, 3])]);
    assert_eq!(run("[1 2 3] 5 +"), vec![list_of(&[1, 2, 3, 5])]);
    assert_eq!(run(r#"`ab` [99 100] +"#), vec![Value::str("abcd")]);
}

#[test]
fn filter_accepts_block_on_either_side_of_and() {
    assert_eq!(run("[1 2 3 4] {2 %} &"), vec![list_of(&[1, 3])]);
}

#[test]
fn takewhile_accepts_block_on_either_side_of_lt() {
    assert_eq!(run("[1 2 3 4 5] {3 <} <"), vec![list_of(&[1, 2])]);
}

#[test]
fn open_paren_unconses_the_front_of_a_sequence() {
    assert_eq!(run("[1 2 3] ("), vec![list_of(&[2, 3]), Value::int(1)]);
}

#[test]
fn close_paren_unconses_the_back_of_a_sequence() {
    assert_eq!(run("[1 2 3] )"), vec![list_of(&[1, 2]), Value::int(3)]);
}

#[test]
fn unary_func_operators_accept_a_bare_builtin() {
    // `\+` pushes the `+` builtin by reference rather than invoking it;
    // `~` must treat it like a Block, not reject it as a type error.
    let result = run(r"\+ ~");
    assert_eq!(result.len(), 1);
    assert!(matches!(result[0], Value::Block(_)));
}

#[test]
fn define_and_call_a_named_block_twice() {
    // `{ ... }\}Name` binds the block to `Name` and invokes it immediately;
    // calling `Name` again re-runs it against whatever's now on the stack.
    // Squaring 3 twice in a row yields 81.
    assert_eq!(run(r"3 {,*}\}Sq Sq"), vec![Value::int(81)]);
}

#[test]
fn break_unwinds_only_the_innermost_loop() {
    // An outer `W` loop counts a global down from 3 to 0; each iteration
    // runs an inner `Wt` loop whose body breaks after its first pass. The
    // inner break must not touch the outer loop's own termination.
    let script = r"3 :gi ; {gi} { {1 Br} Wt ; gi 1 - :gi ; } W gi";
    assert_eq!(run(script), vec![Value::int(0)]);
}

#[test]
fn global_define_leaves_the_value_on_the_stack() {
    // `Def` binds without popping, so the pushed value and the binding
    // agree without a second dereference.
    let mut runner = Runner::new("5 :gx", Capabilities::null(), RunnerOptions::default()).unwrap();
    assert_eq!(runner.run().unwrap(), vec![Value::int(5)]);
    // The binding persists across calls against the same root scope.
    assert_eq!(runner.run_line(" ; gx").unwrap(), vec![Value::int(5)]);
}

// ---------------------------------------------------------------------
// Universal invariants
// ---------------------------------------------------------------------

#[test]
fn simplify_is_idempotent() {
    let values = [
        Value::Complex(3.0, 0.0),
        Value::Float(4.0),
        Value::Float(4.5),
        Value::int(7),
        Value::str("hi"),
    ];
    for v in values {
        let once = v.simplify();
        let twice = once.simplify();
        assert_eq!(once, twice);
    }
}

#[test]
fn convert_round_trips_across_the_numeric_tower() {
    let original = Value::int(5);
    let as_float = convert(&original, Rank::Float).unwrap();
    let back = convert(&as_float, Rank::Int).unwrap();
    assert_eq!(original, back);

    let as_complex = convert(&original, Rank::Complex).unwrap();
    let back = convert(&as_complex, Rank::Int).unwrap();
    assert_eq!(original, back);
}

#[test]
fn block_concatenation_matches_sequential_execution() {
    let concatenated = run("0 1 + 1 +");
    let mut runner = Runner::new("0 1 +", Capabilities::null(), RunnerOptions::default()).unwrap();
    runner.run().unwrap();
    let sequential = runner.run_line("1 +").unwrap();
    assert_eq!(concatenated, sequential);
}

#[test]
fn list_mark_conservation_ignores_intermediate_pops() {
    assert_eq!(run("[ 1 2 ; 3 ]"), vec![list_of(&[1, 3])]);
}

#[test]
fn addition_is_associative_on_ints() {
    assert_eq!(run("2 3 + 4 +"), run("2 3 4 + +"));
}

#[test]
fn multiplication_is_commutative_on_ints() {
    assert_eq!(run("3 4 *"), run("4 3 *"));
}

#[test]
fn union_preserves_left_first_order_and_dedups() {
    assert_eq!(run("[1 2 2 3] [2 3 4] |"), vec![list_of(&[1, 2, 3, 4])]);
}

#[test]
fn lexer_round_trip_preserves_token_kinds() {
    let source = "2 3 + `hi` [1 2]";
    let first = tokenize(source).unwrap();
    let rejoined = first.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(" ");
    let second = tokenize(&rejoined).unwrap();
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.raw, b.raw);
    }
}

#[test]
fn ordering_respects_numeric_value_across_ranks() {
    use std::cmp::Ordering;
    assert_eq!(compare(&Value::int(2), &Value::Float(3.0)).unwrap(), Ordering::Less);
}
