#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use plb_payload::{read, read_type, read_with_options, ReadOptions};
use plb_types::ResolvedType;
use plb_vector::{ValueVector, VectorRef};

/// Inputs past this size only slow the fuzzer down; every format path fits well below it.
const MAX_INPUT_BYTES: usize = 64 * 1024;

/// Visiting every row of every nested vector is quadratic on adversarial inputs; stop after a
/// fixed budget of rows.
const MAX_VISITED_ROWS: usize = 50_000;

fn visit(vector: &VectorRef, budget: &mut usize) {
    for row in 0..vector.size() {
        if *budget == 0 {
            return;
        }
        *budget -= 1;
        if vector.is_null(row) {
            continue;
        }
        // Decode errors are expected; panics are not.
        let _ = vector.get_string(row);
        match vector.resolved_type() {
            ResolvedType::Array(_) => {
                if let Ok(inner) = vector.get_array(row) {
                    visit(&inner, budget);
                }
            }
            ResolvedType::Table(_) => {
                if let Ok(tuple) = vector.get_table(row) {
                    for column in tuple.columns() {
                        visit(column, budget);
                    }
                }
            }
            ResolvedType::Object(_) => {
                if let Ok(object) = vector.get_object(row) {
                    for column in object.tuple().columns() {
                        visit(column, budget);
                    }
                }
            }
            _ => {
                let _ = vector.get_any(row);
            }
        }
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() > MAX_INPUT_BYTES {
        return;
    }

    let stored = read_type(data);
    let bytes = Bytes::copy_from_slice(data);

    if let Ok(vector) = read(bytes.clone()) {
        let mut budget = MAX_VISITED_ROWS;
        visit(&vector, &mut budget);
    }

    if let Ok(ty) = stored {
        if let Ok(vector) = read_with_options(bytes.clone(), &ReadOptions::validate(ty.clone())) {
            let mut budget = MAX_VISITED_ROWS;
            visit(&vector, &mut budget);
        }
        let _ = read_with_options(bytes, &ReadOptions::expand(ty));
    }
});
