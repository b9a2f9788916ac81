use dictregister::construct::{Mapping, Record, Register};
use dictregister::datatype::{Decimal, Scalar, Value};
use dictregister::error::RegisterError;

fn setup() -> Register {
    Register::from_records(vec![
        Record::new().with("x", 1).with("y", 2),
        Record::new().with("x", 3).with("y", 4),
    ])
}

#[test]
fn empty_register() {
    let register: Register = Register::new();
    assert_eq!(register.len(), 0);
    assert!(register.is_empty());
}

#[test]
fn register_from_records() {
    let register = setup();
    assert_eq!(register.len(), 2);
    assert_eq!(
        *register[0].lock().unwrap(),
        Record::new().with("x", 1).with("y", 2)
    );
}

#[test]
fn register_from_collected_records() {
    let register: Register = (0..3)
        .map(|i| Record::new().with("x", i))
        .collect();
    assert_eq!(register.len(), 3);
    assert_eq!(*register[2].lock().unwrap(), Record::new().with("x", 2));
}

#[test]
fn push_appends() {
    let mut register = setup();
    register.push(Record::new().with("x", 4).with("y", 5));
    assert_eq!(register.len(), 3);
}

#[test]
fn json_objects_become_records() {
    let register = Register::from_json(r#"[{"x": 1, "y": 2}, {"x": 3, "y": 4}]"#).expect("valid");
    assert_eq!(register.len(), 2);
    assert_eq!(
        *register[1].lock().unwrap(),
        Record::new().with("x", 3).with("y", 4)
    );
}

#[test]
fn json_array_becomes_multivalue() {
    let register = Register::from_json(r#"[{"x": [1, 3], "y": 2}]"#).expect("valid");
    let record = register[0].lock().unwrap();
    assert_eq!(
        record.value("x"),
        Some(&Value::from_scalars([Scalar::from(1), Scalar::from(3)]).unwrap())
    );
}

#[test]
fn json_singleton_array_stays_scalar() {
    let register = Register::from_json(r#"[{"x": [1], "y": [3, 3]}]"#).expect("valid");
    let record = register[0].lock().unwrap();
    assert_eq!(record.value("x"), Some(&Value::One(Scalar::from(1))));
    assert_eq!(record.value("y"), Some(&Value::One(Scalar::from(3))));
}

#[test]
fn json_empty_array_leaves_key_absent() {
    let register = Register::from_json(r#"[{"x": [], "y": 2}]"#).expect("valid");
    let record = register[0].lock().unwrap();
    assert!(!record.has("x"));
    assert!(record.has("y"));
}

#[test]
fn json_fractional_number_becomes_decimal() {
    let register = Register::from_json(r#"[{"x": 1.5}]"#).expect("valid");
    let record = register[0].lock().unwrap();
    assert_eq!(
        record.value("x"),
        Some(&Value::One(Scalar::Decimal(Decimal::from_str("1.5").unwrap())))
    );
}

#[test]
fn json_non_object_element_is_rejected() {
    let err = Register::from_json(r#"[{"x": 1}, "not-a-mapping"]"#).unwrap_err();
    assert!(matches!(err, RegisterError::InvalidElement(_)));
    assert!(
        format!("{}", err).contains("not a mapping-like object"),
        "error should identify the offending element: {}",
        err
    );
}

#[test]
fn json_non_array_is_rejected() {
    let err = Register::from_json(r#"{"x": 1}"#).unwrap_err();
    assert!(matches!(err, RegisterError::InvalidElement(_)));
}

#[test]
fn malformed_json_is_rejected() {
    let err = Register::from_json("[{").unwrap_err();
    assert!(matches!(err, RegisterError::InvalidElement(_)));
}

#[test]
fn record_from_json_object() {
    let record = Record::from_json(r#"{"x": 1, "y": "alpha"}"#).expect("valid");
    assert_eq!(record, Record::new().with("x", 1).with("y", "alpha"));
}

#[test]
fn registers_compare_by_record_content() {
    assert_eq!(setup(), setup());
    let mut shorter = setup();
    shorter.dpop(&[]).expect("non-empty");
    assert_ne!(setup(), shorter);
}

#[test]
fn cloned_sequence_is_distinct() {
    let register = setup();
    let mut copy = register.clone();
    copy.push(Record::new().with("x", 5));
    assert_eq!(register.len(), 2);
    assert_eq!(copy.len(), 3);
}

#[test]
fn readable_rendering() {
    let register = Register::from_records(vec![Record::new()
        .with("x", Value::from_scalars([Scalar::from(1), Scalar::from(3)]).unwrap())
        .with("y", "alpha")]);
    assert_eq!(format!("{}", register), "[{x: {1, 3}, y: alpha}]");
}
