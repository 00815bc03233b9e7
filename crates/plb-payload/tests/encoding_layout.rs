use bytes::Bytes;
use plb_payload::{read, write, PayloadWriter, WriteOptions};
use plb_types::{Decimal, ResolvedType};
use plb_vector::{LiteralVector, Value, ValueVector, ValuesVector};
use pretty_assertions::assert_eq;

const ENCODING_AT: usize = 8;
const LITERAL: u8 = 1;
const REGULAR: u8 = 0;

fn u32_at(bytes: &[u8], pos: usize) -> u32 {
    u32::from_be_bytes(bytes[pos..pos + 4].try_into().unwrap())
}

#[test]
fn constant_columns_are_written_as_literals() {
    let cases: Vec<Box<dyn ValueVector>> = vec![
        Box::new(ValuesVector::boolean([Some(true); 20])),
        Box::new(ValuesVector::int32([Some(5); 9])),
        Box::new(ValuesVector::int64([Some(-1); 9])),
        Box::new(ValuesVector::float32([Some(0.5); 3])),
        Box::new(ValuesVector::float64([Some(2.25); 3])),
        Box::new(ValuesVector::string([Some("same"); 4])),
        Box::new(ValuesVector::decimal(vec![Some(Decimal::parse("1.10").unwrap()); 4])),
    ];
    for vector in cases {
        let bytes = write(vector.as_ref()).unwrap();
        assert_eq!(bytes[ENCODING_AT], LITERAL, "{}", vector.resolved_type());

        let decoded = read(Bytes::from(bytes)).unwrap();
        assert_eq!(decoded.size(), vector.size());
        let first = vector.get_any(0).unwrap();
        for row in 0..decoded.size() {
            assert_eq!(decoded.get_any(row).unwrap(), first);
        }
    }
}

#[test]
fn literal_needs_equal_values_without_nulls() {
    let differs = write(&ValuesVector::int32([Some(5), Some(6)])).unwrap();
    assert_eq!(differs[ENCODING_AT], REGULAR);

    // A null row moves the encoding byte past the bitmap byte.
    let with_null = write(&ValuesVector::int32([Some(5), None])).unwrap();
    assert_eq!(with_null[6], 1);
    assert_eq!(with_null[ENCODING_AT + 1], REGULAR);

    let empty = write(&ValuesVector::int32([])).unwrap();
    assert_eq!(empty[ENCODING_AT], REGULAR);

    // Equal numerically but not in scale.
    let scales = write(&ValuesVector::decimal([
        Some(Decimal::parse("1.0").unwrap()),
        Some(Decimal::parse("1.00").unwrap()),
    ]))
    .unwrap();
    assert_eq!(scales[ENCODING_AT], REGULAR);

    // Float literals compare bit patterns.
    let zeros = write(&ValuesVector::float64([Some(0.0), Some(-0.0)])).unwrap();
    assert_eq!(zeros[ENCODING_AT], REGULAR);
}

#[test]
fn composites_are_never_literal() {
    let inner = ValuesVector::int32([Some(1)]).into_ref();
    let v = LiteralVector::new(Value::Array(inner), 3);
    let bytes = write(&v).unwrap();
    // array descriptor takes two bytes
    assert_eq!(bytes[ENCODING_AT + 1], REGULAR);
}

#[test]
fn all_null_columns_stop_after_the_bitmap() {
    let bytes = write(&ValuesVector::string([None, None, None, None])).unwrap();
    // magic, version, tag, rows, bitmap length == rows, padding, checksum
    assert_eq!(bytes, vec![b'P', b'L', b'B', 2, 5, 4, 4, 0, 0]);

    let decoded = read(Bytes::from(bytes)).unwrap();
    assert_eq!(decoded.resolved_type(), &ResolvedType::String);
    assert!((0..4).all(|row| decoded.is_null(row)));
}

#[test]
fn null_free_columns_write_a_zero_bitmap_length() {
    let bytes = write(&ValuesVector::int32([Some(1), Some(2)])).unwrap();
    assert_eq!(bytes[5], 2);
    assert_eq!(bytes[6], 0);
    assert_eq!(&bytes[9..17], &[0, 0, 0, 1, 0, 0, 0, 2]);
}

#[test]
fn repeated_strings_share_pool_entries() {
    let bytes = write(&ValuesVector::string([Some("a"), Some("b"), Some("a"), Some("a")])).unwrap();
    assert_eq!(bytes[ENCODING_AT], REGULAR);
    let refs: Vec<u32> = (0..4).map(|row| u32_at(&bytes, 9 + row * 4)).collect();
    let mut distinct = refs.clone();
    distinct.sort_unstable();
    distinct.dedup();
    assert_eq!(distinct.len(), 2);
    assert_eq!(refs[0], refs[2]);
    assert_eq!(refs[0], refs[3]);
    assert_eq!(refs[0], 25);
    assert_eq!(&bytes[25..27], &[1, b'a']);
}

#[test]
fn pools_are_shared_across_columns_and_types() {
    let v = ValuesVector::arrays(
        ResolvedType::Int64,
        [
            Some(ValuesVector::int64([Some(42), Some(7)]).into_ref()),
            Some(ValuesVector::int64([Some(7), Some(42)]).into_ref()),
        ],
    );
    let bytes = write(&v).unwrap();
    let decoded = read(Bytes::from(bytes.clone())).unwrap();
    assert_eq!(decoded.get_array(1).unwrap().get_int64(1), Ok(42));

    // Two pool entries of 8 bytes each, regardless of how often they are referenced.
    let pooled_42 = bytes
        .windows(8)
        .filter(|w| *w == 42i64.to_be_bytes())
        .count();
    assert_eq!(pooled_42, 1);
}

#[test]
fn disabling_literals_writes_regular_layouts() {
    let mut writer = PayloadWriter::with_options(WriteOptions {
        literal_encoding: false,
    });
    let bytes = writer
        .write(&ValuesVector::string([Some("x"), Some("x")]))
        .unwrap();
    assert_eq!(bytes[ENCODING_AT], REGULAR);
    assert_eq!(u32_at(&bytes, 9), u32_at(&bytes, 13));
}
