// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn sparse_table() -> (usize, Vec<i16>) {
    // two states; state 0 maps everything to 0 except 'a' -> 1;
    // state 1 maps everything to 0 except 'b' -> 1 (self-loop-ish)
    let mut table = vec![0i16; 2 * ALPHABET_SIZE];
    table[b'a' as usize] = 1;
    table[ALPHABET_SIZE + b'b' as usize] = 1;
    (2, table)
}

#[test]
fn matches_flat_semantics_for_every_byte() {
    let (state_count, table) = sparse_table();
    let compressed = CompressedTable::from_table(state_count, &table);
    for state in 0..state_count as i16 {
        for byte in 0..=255u8 {
            let expected = table[state as usize * ALPHABET_SIZE + byte as usize];
            assert_eq!(compressed.step(state, byte), expected, "state {state} byte {byte}");
        }
    }
}

#[test]
fn default_target_is_the_majority_value() {
    let (state_count, table) = sparse_table();
    let compressed = CompressedTable::from_table(state_count, &table);
    // every byte except 'a' maps to 0 in state 0, so 0 must be default
    assert_eq!(compressed.step(0, b'z'), 0);
    assert_eq!(compressed.step(0, b'a'), 1);
}

#[test]
fn row_reconstructs_full_256_entries() {
    let (state_count, table) = sparse_table();
    let compressed = CompressedTable::from_table(state_count, &table);
    let row = compressed.row(0);
    assert_eq!(row.len(), ALPHABET_SIZE);
    assert_eq!(row[b'a' as usize], 1);
    assert_eq!(row[b'z' as usize], 0);
}

#[test]
fn byte_size_is_smaller_than_flat_for_sparse_rows() {
    let (state_count, table) = sparse_table();
    let compressed = CompressedTable::from_table(state_count, &table);
    let flat_size = table.len() * std::mem::size_of::<i16>();
    assert!(compressed.byte_size() < flat_size);
}

#[test]
fn rank_counts_set_bits_before_byte() {
    let mut table = vec![0i16; ALPHABET_SIZE];
    table[2] = 9;
    table[5] = 9;
    table[200] = 9;
    let compressed = CompressedTable::from_table(1, &table);
    // byte 5 has one exception bit set before it (at index 2)
    assert_eq!(compressed.step(0, 5), 9);
    assert_eq!(compressed.step(0, 3), 0);
}
