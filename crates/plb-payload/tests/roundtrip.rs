use bytes::Bytes;
use plb_payload::{read, read_with_options, write, ReadOptions};
use plb_types::{
    Decimal, EpochDateTime, EpochDateTimeOffset, ResolvedType, Schema, ValueResult,
};
use plb_vector::{
    vectors_equal, ObjectVector, TupleVector, Value, ValueVector, ValuesVector, VectorRef,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const SIZES: [usize; 5] = [0, 1, 8, 9, 100];

#[derive(Clone, Copy, Debug)]
enum Nulls {
    None,
    All,
    EveryThird,
}

fn inner_schema() -> Schema {
    Schema::of([("n", ResolvedType::Int32), ("s", ResolvedType::String)])
}

fn sample(ty: &ResolvedType, i: usize) -> ValueResult<Value> {
    let n = i as i64;
    Ok(match ty {
        ResolvedType::Boolean => Value::Boolean(i % 3 == 1),
        ResolvedType::Int32 => Value::Int32(i as i32 * 7 - 50),
        ResolvedType::Int64 => Value::Int64(n * 1_000_000_007 - 3),
        ResolvedType::Float32 => Value::Float32(i as f32 / 4.0 - 1.5),
        ResolvedType::Float64 => Value::Float64((n as f64).sqrt() * -1.25),
        ResolvedType::String => Value::from(format!("s{}", i % 5)),
        ResolvedType::DateTime => {
            Value::DateTime(EpochDateTime::from_epoch_millis(1_680_193_853_072 + n * 86_400))
        }
        ResolvedType::Decimal => Value::Decimal(Decimal::from_parts(n * 125 - 9, 2)),
        ResolvedType::Array(_) => Value::Array(
            ValuesVector::int32((0..i % 4).map(|k| (k != 2).then_some(k as i32))).into_ref(),
        ),
        ResolvedType::Table(schema) => Value::Table(TupleVector::from_rows(
            schema.clone(),
            (0..i % 3)
                .map(|k| vec![Value::Int32(k as i32), Value::from(format!("r{k}"))])
                .collect(),
        )?),
        ResolvedType::Object(schema) => Value::Object(ObjectVector::from_values(
            schema.clone(),
            vec![
                Value::Int32(i as i32),
                if i % 2 == 0 { Value::Null } else { Value::from("o") },
            ],
        )?),
        other => panic!("no samples for {other}"),
    })
}

fn build(ty: &ResolvedType, size: usize, nulls: Nulls) -> VectorRef {
    let values = (0..size)
        .map(|i| {
            let null = match nulls {
                Nulls::None => false,
                Nulls::All => true,
                Nulls::EveryThird => i % 3 == 0,
            };
            if null {
                Value::Null
            } else {
                sample(ty, i).unwrap()
            }
        })
        .collect();
    ValuesVector::from_values(ty.clone(), values)
        .unwrap()
        .into_ref()
}

fn roundtrip(vector: &dyn ValueVector) -> VectorRef {
    let bytes = write(vector).unwrap();
    read(Bytes::from(bytes)).unwrap()
}

fn assert_roundtrips(ty: &ResolvedType) {
    for size in SIZES {
        for nulls in [Nulls::None, Nulls::All, Nulls::EveryThird] {
            let original = build(ty, size, nulls);
            let decoded = roundtrip(original.as_ref());
            assert_eq!(decoded.size(), size, "{ty} {size} {nulls:?}");
            assert_eq!(decoded.resolved_type().tag(), ty.tag());
            for row in 0..size {
                assert_eq!(
                    decoded.is_null(row),
                    original.is_null(row),
                    "{ty} {size} {nulls:?} row {row}"
                );
                assert_eq!(
                    decoded.get_any(row).unwrap(),
                    original.get_any(row).unwrap(),
                    "{ty} {size} {nulls:?} row {row}"
                );
            }
        }
    }
}

#[test]
fn scalars_roundtrip() {
    for ty in [
        ResolvedType::Boolean,
        ResolvedType::Int32,
        ResolvedType::Int64,
        ResolvedType::Float32,
        ResolvedType::Float64,
        ResolvedType::String,
        ResolvedType::DateTime,
        ResolvedType::Decimal,
    ] {
        assert_roundtrips(&ty);
    }
}

#[test]
fn arrays_roundtrip() {
    assert_roundtrips(&ResolvedType::array(ResolvedType::Int32));
}

#[test]
fn tables_roundtrip() {
    assert_roundtrips(&ResolvedType::Table(inner_schema()));
}

#[test]
fn objects_roundtrip() {
    assert_roundtrips(&ResolvedType::Object(inner_schema()));
}

/// Every accessor answers a null row with its type's zero value.
fn assert_zero_values(vector: &dyn ValueVector, row: usize) {
    let ty = vector.resolved_type().clone();
    assert!(vector.is_null(row), "{ty} row {row}");
    assert_eq!(vector.get_any(row), Ok(Value::Null), "{ty} row {row}");
    assert_eq!(vector.get_boolean(row), Ok(false), "{ty} row {row}");
    assert_eq!(vector.get_int32(row), Ok(0), "{ty} row {row}");
    assert_eq!(vector.get_int64(row), Ok(0), "{ty} row {row}");
    assert_eq!(vector.get_float32(row), Ok(0.0), "{ty} row {row}");
    assert_eq!(vector.get_float64(row), Ok(0.0), "{ty} row {row}");
    assert_eq!(vector.get_decimal(row), Ok(Decimal::zero()), "{ty} row {row}");
    assert_eq!(vector.get_string(row).unwrap().as_str(), "", "{ty} row {row}");
    assert_eq!(
        vector.get_date_time(row),
        Ok(EpochDateTime::from_epoch_millis(0)),
        "{ty} row {row}"
    );
    assert_eq!(
        vector.get_date_time_offset(row),
        Ok(EpochDateTimeOffset::utc(0)),
        "{ty} row {row}"
    );
    assert_eq!(vector.get_array(row).unwrap().size(), 0, "{ty} row {row}");
    assert_eq!(vector.get_table(row).unwrap().row_count(), 0, "{ty} row {row}");
    let object = vector.get_object(row).unwrap();
    assert!(
        (0..object.schema().len()).all(|field| object.is_null(field)),
        "{ty} row {row}"
    );
}

#[test]
fn null_rows_read_as_zero_values() {
    for ty in [
        ResolvedType::Boolean,
        ResolvedType::Int32,
        ResolvedType::Int64,
        ResolvedType::Float32,
        ResolvedType::Float64,
        ResolvedType::String,
        ResolvedType::DateTime,
        ResolvedType::Decimal,
        ResolvedType::array(ResolvedType::Int32),
        ResolvedType::Table(inner_schema()),
        ResolvedType::Object(inner_schema()),
    ] {
        // rows 0 and 3 are null; 1 and 2 keep the section out of the literal and all-null forms
        let decoded = roundtrip(build(&ty, 4, Nulls::EveryThird).as_ref());
        assert_eq!(decoded.resolved_type().tag(), ty.tag());
        for row in [0, 3] {
            assert_zero_values(decoded.as_ref(), row);
        }
        assert!(!decoded.is_null(1), "{ty}");
    }
}

#[test]
fn nested_arrays_keep_element_nulls() {
    let inner = ValuesVector::string([Some("a"), None, Some("a")]).into_ref();
    let outer = ValuesVector::arrays(
        ResolvedType::array(ResolvedType::String),
        [
            Some(ValuesVector::arrays(ResolvedType::String, [Some(inner), None]).into_ref()),
            None,
        ],
    );
    let decoded = roundtrip(&outer);
    assert!(vectors_equal(decoded.as_ref(), &outer));
    let level1 = decoded.get_array(0).unwrap();
    let level2 = level1.get_array(0).unwrap();
    assert!(level2.is_null(1));
    assert_eq!(level2.get_string(2).unwrap().as_str(), "a");
}

#[test]
fn zoned_date_times_keep_their_epoch() {
    let tokyo = EpochDateTimeOffset::parse("2023-03-31T01:30:53.072+09:00").unwrap();
    let v = ValuesVector::date_time_offset([Some(tokyo), None]);
    let bytes = write(&v).unwrap();

    let plain = read(Bytes::from(bytes.clone())).unwrap();
    assert_eq!(plain.resolved_type(), &ResolvedType::DateTime);
    assert_eq!(plain.get_int64(0), Ok(1_680_193_853_072));

    let zoned = read_with_options(
        Bytes::from(bytes),
        &ReadOptions::validate(ResolvedType::DateTimeOffset),
    )
    .unwrap();
    assert_eq!(zoned.resolved_type(), &ResolvedType::DateTimeOffset);
    assert_eq!(zoned.get_any(0), Ok(Value::DateTimeOffset(tokyo)));
    assert!(zoned.is_null(1));
}

#[test]
fn special_floats_survive() {
    let v = ValuesVector::float64([Some(f64::NAN), Some(-0.0), Some(f64::INFINITY), Some(0.0)]);
    let decoded = roundtrip(&v);
    assert!(decoded.get_float64(0).unwrap().is_nan());
    assert!(decoded.get_float64(1).unwrap().is_sign_negative());
    assert_eq!(decoded.get_float64(2), Ok(f64::INFINITY));
    assert!(decoded.get_float64(3).unwrap().is_sign_positive());
}

#[test]
fn extreme_decimals_survive() {
    let v = ValuesVector::decimal([
        Some(Decimal::parse("79228162514264337593543950335").unwrap()),
        Some(Decimal::parse("-0.0000000000000000000000000001").unwrap()),
        Some(Decimal::parse("1.100").unwrap()),
    ]);
    let decoded = roundtrip(&v);
    assert!(vectors_equal(decoded.as_ref(), &v));
    assert_eq!(decoded.get_decimal(2).unwrap().scale(), 3);
}

#[test]
fn decimals_wider_than_96_bits_survive() {
    let wide = Decimal::parse("1267650600228229401496703205376.25").unwrap();
    let fraction = Decimal::parse("-0.12345678901234567890123456789012").unwrap();
    let v = ValuesVector::decimal([Some(wide.clone()), None, Some(fraction.clone())]);
    let decoded = roundtrip(&v);

    let back = decoded.get_decimal(0).unwrap();
    assert!(back.unscaled().bits() > 96);
    assert_eq!(back.canonical_key(), wide.canonical_key());
    let back = decoded.get_decimal(2).unwrap();
    assert_eq!(back.scale(), 32);
    assert_eq!(back.to_string(), "-0.12345678901234567890123456789012");
    assert_eq!(back.canonical_key(), fraction.canonical_key());
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn int64_columns_roundtrip(
        values in proptest::collection::vec(proptest::option::of(any::<i64>()), 0..64),
    ) {
        let v = ValuesVector::int64(values.clone());
        let decoded = roundtrip(&v);
        let back: Vec<Option<i64>> = (0..decoded.size())
            .map(|row| (!decoded.is_null(row)).then(|| decoded.get_int64(row).unwrap()))
            .collect();
        prop_assert_eq!(back, values);
    }

    #[test]
    fn string_columns_roundtrip(
        values in proptest::collection::vec(proptest::option::of("[a-c]{0,3}|\\PC{0,8}"), 0..64),
    ) {
        let v = ValuesVector::string(values.iter().map(|s| s.as_deref()));
        let decoded = roundtrip(&v);
        prop_assert!(vectors_equal(decoded.as_ref(), &v));
    }

    #[test]
    fn boolean_columns_roundtrip(
        values in proptest::collection::vec(proptest::option::of(any::<bool>()), 0..40),
    ) {
        let v = ValuesVector::boolean(values.clone());
        let decoded = roundtrip(&v);
        prop_assert!(vectors_equal(decoded.as_ref(), &v));
    }
}
