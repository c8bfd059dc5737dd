//! Build a collection of variable-length sequences and write it to disk

use matvar::{DenseMatrix, MatVar, Result};
use std::time::Instant;

fn main() -> Result<()> {
    // Eight-dimensional feature vectors, sequences of 1 to 12 frames
    let rows = 8;
    let lengths = [3, 12, 1, 7, 5, 9, 2, 4];

    let start = Instant::now();
    let sequences = lengths
        .iter()
        .enumerate()
        .map(|(seq, &len)| {
            let values = (0..rows * len).map(|i| (seq * 100 + i) as f32).collect();
            DenseMatrix::from_column_major(rows, len, values)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut collection = MatVar::new();
    collection.transfer_from(sequences, None)?;
    println!("Built {} in {:?}", collection.shape(), start.elapsed());

    for (idx, range) in collection.ranges().enumerate() {
        println!("  sequence {idx}: columns {range:?}");
    }

    // Keep the longest half, longest first
    let mut order: Vec<usize> = (0..collection.data_num()).collect();
    order.sort_by_key(|&idx| std::cmp::Reverse(lengths[idx]));
    let longest = collection.select(&order[..order.len() / 2])?;
    println!("Selected {}", longest.shape());

    longest.write_file("example_collection.mv")?;
    let back = MatVar::<DenseMatrix<f32>>::from_file("example_collection.mv")?;
    assert_eq!(back, longest);
    println!("Round-tripped example_collection.mv");
    Ok(())
}
