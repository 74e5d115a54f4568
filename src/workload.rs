//! Timed insert-then-search trials, used by the `treebench` binary to compare
//! the trees on the same keys.

use std::hint::black_box;
use std::time::Instant;

use clap::ValueEnum;
use rand::seq::{index, SliceRandom};
use rand::Rng;

use crate::dictionary::{AnyTree, Dictionary, Variant};
use crate::document::Document;
use crate::record::Key;

/// Order in which keys are inserted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Order {
    /// Distinct keys drawn from a range ten times larger than the count.
    Random,
    /// `1, 2, ..., n`.
    #[value(alias = "sorted")]
    Ascending,
    /// `n, n - 1, ..., 1`.
    #[value(alias = "reverse")]
    Descending,
}

/// Mean cost of one operation in a trial, in microseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Per insert.
    pub insert_micros: f64,
    /// Per search.
    pub search_micros: f64,
}

/// Produces `n` distinct keys in the given order.
pub fn generate_keys<Rn: Rng + ?Sized>(n: usize, order: Order, rng: &mut Rn) -> Vec<Key> {
    match order {
        Order::Random if n == 0 => Vec::new(),
        Order::Random => index::sample(rng, 10 * n - 1, n)
            .into_iter()
            .map(|i| i as Key + 1)
            .collect(),
        Order::Ascending => (1..=n as Key).collect(),
        Order::Descending => (1..=n as Key).rev().collect(),
    }
}

/// Inserts a document for each of `keys` into a fresh tree, then searches
/// `searches` keys picked uniformly from `keys`, timing both phases.
pub fn run_trial<Rn: Rng + ?Sized>(
    variant: Variant,
    keys: &[Key],
    searches: usize,
    rng: &mut Rn,
) -> Sample {
    let docs: Vec<Document> = keys
        .iter()
        .map(|&k| Document::new(k, format!("A{k}"), "pdf"))
        .collect();
    let targets: Vec<Key> = (0..searches)
        .filter_map(|_| keys.choose(rng).copied())
        .collect();

    let mut tree = AnyTree::new(variant);

    let start = Instant::now();
    for doc in docs {
        black_box(tree.insert(doc));
    }
    let insert = start.elapsed();

    let start = Instant::now();
    for &key in &targets {
        black_box(tree.search(key));
    }
    let search = start.elapsed();

    log::trace!(
        "{variant}: {} keys, height {}, root {:?}",
        tree.len(),
        tree.height(),
        tree.root().map(|d| d.doc_id)
    );

    Sample {
        insert_micros: per_op_micros(insert.as_secs_f64(), keys.len()),
        search_micros: per_op_micros(search.as_secs_f64(), targets.len()),
    }
}

/// Arithmetic mean, or zero for no values.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn per_op_micros(secs: f64, ops: usize) -> f64 {
    if ops == 0 {
        0.0
    } else {
        secs * 1e6 / ops as f64
    }
}
