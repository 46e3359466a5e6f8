//! Unification of first-order terms

mod mgu;

#[cfg(test)]
mod proptest_tests;

pub use mgu::{mgu, occurs_check, unify, unify_seq};
