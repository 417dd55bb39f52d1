use miniblast_core::report::{format_score_matrix, format_traceback_matrix};
use miniblast_core::{align, GlobalAligner};

#[test]
fn golden_pair_score_rows() {
    let matrix = GlobalAligner::default().fill(b"GCTGATTC", b"GATCTGATTA");
    let rows: Vec<Vec<i32>> = matrix.score_rows().map(|row| row.to_vec()).collect();
    assert_eq!(
        rows,
        vec![
            vec![0, -1, -2, -3, -4, -5, -6, -7, -8, -9, -10],
            vec![-1, 2, 1, 0, -1, -2, -3, -4, -5, -6, -7],
            vec![-2, 1, 1, 0, 2, 1, 0, -1, -2, -3, -4],
            vec![-3, 0, 0, 3, 2, 4, 3, 2, 1, 0, -1],
            vec![-4, -1, -1, 2, 2, 3, 6, 5, 4, 3, 2],
            vec![-5, -2, 1, 1, 1, 2, 5, 8, 7, 6, 5],
            vec![-6, -3, 0, 3, 2, 3, 4, 7, 10, 9, 8],
            vec![-7, -4, -1, 2, 2, 4, 3, 6, 9, 12, 11],
            vec![-8, -5, -2, 1, 4, 3, 3, 5, 8, 11, 11],
        ]
    );
}

#[test]
fn golden_pair_alignment() {
    let alignment = align(b"GCTGATTC", b"GATCTGATTA").unwrap();
    assert_eq!(alignment.score, 11);
    assert_eq!(alignment.aligned_seq1, "G--CTGATTC");
    assert_eq!(alignment.indicator, "|  |||||| ");
    assert_eq!(alignment.midline(), "|  ||||||x");
    assert_eq!(alignment.aligned_seq2, "GATCTGATTA");
}

#[test]
fn demo_pair_matrix_dumps() {
    let (alignment, matrix) = GlobalAligner::default()
        .align_with_matrix(
            b"AGCGTATCGCATGCATTCGCGCATAAGCTAG",
            b"TCTCTGGAGCGGGCTTCGTATATGCTAAAGC",
        )
        .unwrap();
    assert_eq!(alignment.score, 21);
    assert_eq!(alignment.indicator, "   | | | ||   || ||||   ||| ||||  | ");

    let scores = format_score_matrix(&matrix);
    assert_eq!(scores.lines().count(), 32 + 2);
    assert!(scores.starts_with("[\n  [0, -1, -2, -3,"));
    assert!(scores.ends_with(", 21]\n]\n"));

    let arrows = format_traceback_matrix(&matrix);
    assert!(arrows.starts_with("[\n  [-, ←, ←"));
    assert!(arrows.contains("[↑, "));
}
