use bytes::Bytes;
use plb_payload::{
    read_tuple_vector, read_with_options, write_tuple_vector, ColumnCountPolicy, PayloadError,
    ReadOptions,
};
use plb_types::{ResolvedType, Schema};
use plb_vector::{TupleVector, Value, ValueVector};
use pretty_assertions::assert_eq;

fn orders_schema() -> Schema {
    Schema::of([
        ("id", ResolvedType::Int64),
        ("customer", ResolvedType::String),
        ("lines", ResolvedType::array(ResolvedType::Int32)),
    ])
}

fn orders() -> Bytes {
    let tuple = TupleVector::from_rows(
        orders_schema(),
        vec![
            vec![Value::Int64(1), Value::from("ada"), Value::Null],
            vec![Value::Int64(2), Value::Null, Value::Null],
        ],
    )
    .unwrap();
    Bytes::from(write_tuple_vector(&tuple).unwrap())
}

#[test]
fn trusted_read_synthesizes_names() {
    let tuple = read_tuple_vector(orders(), None, false).unwrap();
    assert_eq!(
        tuple.schema().names().collect::<Vec<_>>(),
        vec!["int64_0", "string_1", "array_2"]
    );
    assert_eq!(tuple.row_count(), 2);
}

#[test]
fn validated_read_uses_expected_names() {
    let tuple = read_tuple_vector(orders(), Some(&orders_schema()), false).unwrap();
    assert_eq!(tuple.schema(), &orders_schema());
    let customer = tuple.column_by_name("customer").unwrap();
    assert_eq!(customer.get_string(0).unwrap().as_str(), "ada");
    assert!(customer.is_null(1));
}

#[test]
fn validation_names_the_mismatched_column() {
    let expected = Schema::of([
        ("id", ResolvedType::Int64),
        ("customer", ResolvedType::Int32),
        ("lines", ResolvedType::array(ResolvedType::Int32)),
    ]);
    let err = read_tuple_vector(orders(), Some(&expected), false).unwrap_err();
    assert_eq!(
        err,
        PayloadError::SchemaMismatch {
            column: "customer".to_owned(),
            expected: ResolvedType::Int32,
            actual: ResolvedType::String,
        }
    );
    assert!(err.to_string().contains("customer"));
}

#[test]
fn validation_checks_nested_element_types() {
    let expected = Schema::of([
        ("id", ResolvedType::Int64),
        ("customer", ResolvedType::String),
        ("lines", ResolvedType::array(ResolvedType::String)),
    ]);
    let err = read_tuple_vector(orders(), Some(&expected), false).unwrap_err();
    assert!(
        matches!(&err, PayloadError::SchemaMismatch { column, .. } if column == "lines[]"),
        "{err}"
    );
}

#[test]
fn tolerated_column_counts() {
    let shorter = Schema::of([("id", ResolvedType::Int64)]);
    let tuple = read_tuple_vector(orders(), Some(&shorter), false).unwrap();
    assert_eq!(tuple.column_count(), 1);
    assert_eq!(tuple.column(0).unwrap().get_int64(1), Ok(2));

    let longer = Schema::of([
        ("id", ResolvedType::Int64),
        ("customer", ResolvedType::String),
        ("lines", ResolvedType::array(ResolvedType::Int32)),
        ("note", ResolvedType::String),
    ]);
    let tuple = read_tuple_vector(orders(), Some(&longer), false).unwrap();
    let note = tuple.column_by_name("note").unwrap();
    assert_eq!(note.size(), 2);
    assert!(note.is_null(0) && note.is_null(1));
}

#[test]
fn strict_column_counts() {
    let options = ReadOptions {
        expected_type: Some(ResolvedType::Table(Schema::of([(
            "id",
            ResolvedType::Int64,
        )]))),
        column_count: ColumnCountPolicy::Strict,
        ..ReadOptions::default()
    };
    assert_eq!(
        read_with_options(orders(), &options).unwrap_err(),
        PayloadError::ColumnCountMismatch {
            column: "<root>".to_owned(),
            expected: 1,
            actual: 3,
        }
    );
}

#[test]
fn expansion_appends_payload_columns() {
    let partial = Schema::of([("id", ResolvedType::Int64)]);
    let tuple = read_tuple_vector(orders(), Some(&partial), true).unwrap();
    assert_eq!(
        tuple.schema().names().collect::<Vec<_>>(),
        vec!["id", "string_1", "array_2"]
    );
    assert_eq!(
        tuple.column(1).unwrap().get_string(0).unwrap().as_str(),
        "ada"
    );
}

#[test]
fn expansion_prefers_payload_types_and_keeps_extra_expected_columns() {
    let expected = Schema::of([
        ("id", ResolvedType::String),
        ("customer", ResolvedType::String),
        ("lines", ResolvedType::array(ResolvedType::Int32)),
        ("discount", ResolvedType::Decimal),
    ]);
    let tuple = read_tuple_vector(orders(), Some(&expected), true).unwrap();
    assert_eq!(
        tuple.schema(),
        &Schema::of([
            ("id", ResolvedType::Int64),
            ("customer", ResolvedType::String),
            ("lines", ResolvedType::array(ResolvedType::Int32)),
            ("discount", ResolvedType::Decimal),
        ])
    );
    assert_eq!(tuple.column(0).unwrap().get_int64(0), Ok(1));
    // Typed reads still convert.
    assert_eq!(
        tuple.column(0).unwrap().get_string(1).unwrap().as_str(),
        "2"
    );
    assert!(tuple.column(3).unwrap().is_null(0));
}

#[test]
fn root_type_mismatch_is_reported_at_the_root() {
    let options = ReadOptions::validate(ResolvedType::Int32);
    assert_eq!(
        read_with_options(orders(), &options).unwrap_err(),
        PayloadError::SchemaMismatch {
            column: "<root>".to_owned(),
            expected: ResolvedType::Int32,
            actual: ResolvedType::Table(Schema::of([
                ("int64_0", ResolvedType::Int64),
                ("string_1", ResolvedType::String),
                ("array_2", ResolvedType::array(ResolvedType::Int32)),
            ])),
        }
    );
}

#[test]
fn null_root_reads_as_empty_tuple() {
    use plb_payload::write;
    use plb_vector::LiteralVector;

    let root = LiteralVector::null(ResolvedType::Table(orders_schema()), 1);
    let bytes = Bytes::from(write(&root).unwrap());
    let tuple = read_tuple_vector(bytes, Some(&orders_schema()), false).unwrap();
    assert_eq!(tuple.row_count(), 0);
    assert_eq!(tuple.column_count(), 0);
}
