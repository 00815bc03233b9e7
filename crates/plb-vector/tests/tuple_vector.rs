use plb_types::{ResolvedType, Schema, ValueError};
use plb_vector::{
    vectors_equal, LiteralVector, ObjectVector, TupleVector, Value, ValueVector, ValuesVector,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn people() -> TupleVector {
    let schema = Schema::of([
        ("Id", ResolvedType::Int32),
        ("Name", ResolvedType::String),
        ("Tags", ResolvedType::array(ResolvedType::String)),
    ]);
    TupleVector::from_rows(
        schema,
        vec![
            vec![
                Value::Int32(1),
                Value::from("ada"),
                Value::Array(ValuesVector::string([Some("x"), Some("y")]).into_ref()),
            ],
            vec![Value::Int32(2), Value::Null, Value::Null],
        ],
    )
    .unwrap()
}

#[test]
fn from_rows_builds_columns() {
    let t = people();
    assert_eq!(t.row_count(), 2);
    assert_eq!(t.column_count(), 3);
    assert_eq!(
        t.schema().names().collect::<Vec<_>>(),
        vec!["Id", "Name", "Tags"]
    );
    let name = t.column_by_name("name").unwrap();
    assert_eq!(name.get_string(0).unwrap().as_str(), "ada");
    assert!(name.is_null(1));

    let tags = t.column(2).unwrap().get_array(0).unwrap();
    assert_eq!(tags.size(), 2);
    assert_eq!(tags.get_string(1).unwrap().as_str(), "y");
}

#[test]
fn from_rows_rejects_short_rows() {
    let err = TupleVector::from_rows(
        Schema::of([("a", ResolvedType::Int32), ("b", ResolvedType::Int32)]),
        vec![vec![Value::Int32(1)]],
    )
    .unwrap_err();
    assert_eq!(
        err,
        ValueError::InvalidTuple {
            reason: "row 0 has 1 values, expected 2".to_owned()
        }
    );
}

#[test]
fn content_equality_ignores_names_and_representation() {
    let a = TupleVector::new(
        Schema::of([("x", ResolvedType::Int64)]),
        vec![LiteralVector::new(Value::Int64(5), 3).into_ref()],
    )
    .unwrap();
    let b = TupleVector::new(
        Schema::of([("y", ResolvedType::Int64)]),
        vec![ValuesVector::int64([Some(5); 3]).into_ref()],
    )
    .unwrap();
    assert!(a.content_eq(&b));
    assert_eq!(Value::Table(a.clone()), Value::Table(b));

    let c = TupleVector::new(
        Schema::of([("x", ResolvedType::Int64)]),
        vec![ValuesVector::int64([Some(5), None, Some(5)]).into_ref()],
    )
    .unwrap();
    assert!(!a.content_eq(&c));
}

#[test]
fn table_and_object_cells() {
    let inner = people();
    let outer = TupleVector::new(
        Schema::of([
            ("t", ResolvedType::Table(inner.schema().clone())),
            ("o", ResolvedType::Object(inner.schema().clone())),
        ]),
        vec![
            ValuesVector::tables(inner.schema().clone(), [Some(inner.clone())]).into_ref(),
            ValuesVector::objects(
                inner.schema().clone(),
                [Some(ObjectVector::new(inner.clone(), 1).unwrap())],
            )
            .into_ref(),
        ],
    )
    .unwrap();

    let table = outer.column(0).unwrap().get_table(0).unwrap();
    assert!(table.content_eq(&inner));
    let object = outer.column(1).unwrap().get_object(0).unwrap();
    assert_eq!(object.row(), 1);
    assert_eq!(object.get_any(0), Ok(Value::Int32(2)));
}

#[test]
fn null_composite_cells_read_as_empty() {
    let v = LiteralVector::null(ResolvedType::Table(Schema::empty()), 1);
    assert_eq!(v.get_table(0).unwrap().row_count(), 0);
    let o = LiteralVector::null(ResolvedType::Object(Schema::empty()), 1);
    assert_eq!(o.get_object(0).unwrap().column_count(), 0);
}

#[test]
fn vector_equality_compares_null_positions() {
    let a: Arc<dyn ValueVector> = ValuesVector::string([Some("a"), None]).into_ref();
    let b = ValuesVector::string([Some("a"), Some("")]);
    assert!(!vectors_equal(a.as_ref(), &b));
    assert!(vectors_equal(a.as_ref(), a.as_ref()));
}
