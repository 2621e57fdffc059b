//! The UTF-8 automaton's tables.
//!
//! Code based on https://bjoern.hoehrmann.de/utf-8/decoder/dfa/
//!
//! The automaton uses two tables. The first maps every byte to one of 12
//! character classes, which both shrinks the transition table and yields the
//! bitmask for extracting a lead byte's payload. The second maps a state and a
//! class to the next state. Since all states are multiples of the number of
//! classes, the sum of state and class directly indexes the transition table.

/// The number of byte classes.
pub(crate) const CLASS_COUNT: u8 = 12;

/// The start state, which also signals a completed code point.
pub(crate) const UTF8_ACCEPT: u8 = 0;

/// The error state, which must not survive the step that reached it.
pub(crate) const UTF8_REJECT: u8 = 12;

#[rustfmt::skip]
static CLASSES: [u8; 256] = [
    // 1  2  3  4  5  6  7  8  9  A  B  C  D  E  F
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // 0
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // 1
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // 2
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // 3
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // 4
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // 5
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // 6
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // 7
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, // 8
    9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, // 9
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, // A
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, // B
    8, 8, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, // C
    2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, // D
   10, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 4, 3, 3, // E
   11, 6, 6, 6, 5, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, // F
];

#[rustfmt::skip]
static TRANSITIONS: [u8; 108] = [
    // Classes:
    //  0   1   2   3   4   5   6   7   8   9  10  11
     0, 12, 24, 36, 60, 96, 84, 12, 12, 12, 48, 72, //  0 accept
    12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, // 12 reject
    12,  0, 12, 12, 12, 12, 12,  0, 12,  0, 12, 12, // 24 one more byte
    12, 24, 12, 12, 12, 12, 12, 24, 12, 24, 12, 12, // 36 two more bytes
    12, 12, 12, 12, 12, 12, 12, 24, 12, 12, 12, 12, // 48 two more, after E0
    12, 24, 12, 12, 12, 12, 12, 12, 12, 24, 12, 12, // 60 two more, after ED
    12, 12, 12, 12, 12, 12, 12, 36, 12, 36, 12, 12, // 72 three more, after F0
    12, 36, 12, 12, 12, 12, 12, 36, 12, 36, 12, 12, // 84 three more
    12, 36, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, // 96 three more, after F4
];

/// Look up the byte's class.
#[inline]
pub(crate) fn class_of(byte: u8) -> u8 {
    CLASSES[byte as usize]
}

/// Look up the state following the given state for the given class.
///
/// The state must be one of the automaton's states and the class must have
/// been produced by [`class_of`].
#[inline]
pub(crate) fn transition(state: u8, class: u8) -> u8 {
    debug_assert!(class < CLASS_COUNT, "class {} is out of bounds", class);
    TRANSITIONS[(state + class) as usize]
}

/// Step the automaton with the given byte.
///
/// This function folds the byte into the code point being accumulated and
/// returns the next state. Starting from [`UTF8_ACCEPT`], the byte's class
/// determines how many of its low bits are payload. Otherwise, the byte is a
/// continuation contributing its low six bits.
#[inline]
pub(crate) fn step(state: u8, code_point: &mut u32, byte: u8) -> u8 {
    let class = class_of(byte);
    *code_point = if state == UTF8_ACCEPT {
        (0xff >> class) & (byte as u32)
    } else {
        (byte as u32 & 0b11_1111) | (*code_point << 6)
    };
    transition(state, class)
}

// ================================================================================================
