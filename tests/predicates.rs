use dictregister::construct::{Record, Register};
use dictregister::datatype::{Scalar, Value};
use dictregister::query::{Operator, Predicate};

fn setup() -> Register {
    Register::from_records(vec![
        Record::new().with("x", 1).with("y", 2),
        Record::new()
            .with("x", Value::from_scalars([Scalar::from(1), Scalar::from(3)]).unwrap())
            .with("y", 4),
    ])
}

fn matched(register: &Register, predicate: Predicate) -> usize {
    register.dfilter(&[predicate]).len()
}

#[test]
fn bare_key_means_equality() {
    let predicate = Predicate::parse("x", 1);
    assert_eq!(predicate.key(), "x");
    assert_eq!(predicate.operator(), Operator::Eq);
    assert_eq!(predicate.value(), &Scalar::from(1));
}

#[test]
fn combined_token_splits_key_and_operator() {
    let predicate = Predicate::parse("x__nin", 1);
    assert_eq!(predicate.key(), "x");
    assert_eq!(predicate.operator(), Operator::Nin);
}

#[test]
fn unknown_operator_matches_nothing() {
    let register = setup();
    assert_eq!(matched(&register, Predicate::parse("x__gt", 0)), 0);
}

#[test]
fn separator_inside_key_never_parses_as_key() {
    // the token splits at the first separator, so the trailing part is an
    // unrecognized operator and the predicate matches nothing
    let register = Register::from_records(vec![Record::new().with("a__b", 1)]);
    assert_eq!(matched(&register, Predicate::parse("a__b__eq", 1)), 0);
}

#[test]
fn eq_compares_bare_scalars() {
    let register = setup();
    assert_eq!(matched(&register, Predicate::parse("x__eq", 1)), 1);
    assert_eq!(matched(&register, Predicate::parse("x__eq", 9)), 0);
    // a multi-value is not equal to any bare scalar
    assert_eq!(matched(&register, Predicate::parse("x__eq", 3)), 0);
}

#[test]
fn eq_absent_key_is_false() {
    let register = setup();
    assert_eq!(matched(&register, Predicate::parse("z__eq", 1)), 0);
}

#[test]
fn ne_negates_eq() {
    let register = setup();
    // the multi-value record and the absent-key case both count as "not equal"
    assert_eq!(matched(&register, Predicate::parse("x__ne", 1)), 1);
    assert_eq!(matched(&register, Predicate::parse("z__ne", 1)), 2);
}

#[test]
fn in_matches_multivalue_members_and_bare_scalars() {
    let register = setup();
    assert_eq!(matched(&register, Predicate::parse("x__in", 1)), 2);
    assert_eq!(matched(&register, Predicate::parse("x__in", 3)), 1);
    assert_eq!(matched(&register, Predicate::parse("x__in", 9)), 0);
    assert_eq!(matched(&register, Predicate::parse("z__in", 1)), 0);
}

#[test]
fn in_does_not_iterate_string_scalars() {
    let register = Register::from_records(vec![Record::new().with("x", "abc")]);
    assert_eq!(matched(&register, Predicate::parse("x__in", "a")), 0);
    assert_eq!(matched(&register, Predicate::parse("x__in", "abc")), 1);
}

#[test]
fn nin_negates_in() {
    let register = setup();
    assert_eq!(matched(&register, Predicate::parse("x__nin", 3)), 1);
    assert_eq!(matched(&register, Predicate::parse("x__nin", 1)), 0);
    assert_eq!(matched(&register, Predicate::parse("z__nin", 1)), 2);
}

#[test]
fn iskey_tests_key_presence() {
    let register = setup();
    assert_eq!(matched(&register, Predicate::parse("x__iskey", true)), 2);
    assert_eq!(matched(&register, Predicate::parse("z__iskey", true)), 0);
    assert_eq!(matched(&register, Predicate::parse("z__iskey", false)), 2);
}

#[test]
fn iskey_with_non_boolean_value_matches_nothing() {
    let register = setup();
    assert_eq!(matched(&register, Predicate::parse("x__iskey", 1)), 0);
}

#[test]
fn explicit_construction_equals_parsing() {
    assert_eq!(
        Predicate::new("x", Operator::In, 3),
        Predicate::parse("x__in", 3)
    );
}

#[test]
fn predicate_renders_readably() {
    assert_eq!(format!("{}", Predicate::parse("x__in", 3)), "x__in = 3");
    assert_eq!(format!("{}", Predicate::parse("x", 3)), "x__eq = 3");
}
