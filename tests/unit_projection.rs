// Unit tests for category projections.
//
// Covers axis slicing, term coordinates, axis labels, nearest-term queries,
// alternate dimensions and axes, and embedding-order enforcement.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ndarray::{array, Array1, Array2};

use scatterscore::corpus::CategoryCorpus;
use scatterscore::error::{Result, ScatterError};
use scatterscore::projection::embedding::CategoryEmbedding;
use scatterscore::projection::projector::CategoryProjection;
use scatterscore::projection::traits::{CategoryEmbeddingSource, EmbeddingModel};

struct Vocab {
    terms: Vec<String>,
    categories: Vec<String>,
}

impl CategoryCorpus for Vocab {
    fn terms(&self) -> &[String] {
        &self.terms
    }

    fn metadata(&self) -> &[String] {
        &self.categories
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn vocab(terms: &[&str], categories: &[&str]) -> Arc<Vocab> {
    Arc::new(Vocab {
        terms: strings(terms),
        categories: strings(categories),
    })
}

/// Two terms, two categories, identity projection.
fn two_by_two() -> CategoryProjection {
    CategoryProjection::new(
        vocab(&["a", "b"], &["c1", "c2"]),
        array![[3.0, 1.0], [1.0, 3.0]],
        Array2::eye(2),
        0,
        1,
    )
    .unwrap()
}

/// Three categories in a 3-dimensional projection, four terms.
fn three_dim() -> CategoryProjection {
    CategoryProjection::new(
        vocab(&["w", "x", "y", "z"], &["c1", "c2", "c3"]),
        array![
            [1.0, 0.0, 2.0],
            [0.0, 4.0, 1.0],
            [2.0, 2.0, 2.0],
            [5.0, 0.0, 0.0]
        ],
        array![[0.5, -1.0, 2.0], [1.5, 0.0, -2.0], [-0.5, 3.0, 1.0]],
        0,
        1,
    )
    .unwrap()
}

/// Model whose output changes on every call, to catch late embedding capture.
struct DriftingModel {
    calls: AtomicUsize,
    categories: Vec<String>,
}

impl EmbeddingModel for DriftingModel {
    fn project(&self) -> Result<CategoryEmbedding> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) as f64;
        let values = Array2::from_elem((self.categories.len(), 2), n);
        CategoryEmbedding::new(self.categories.clone(), values)
    }
}

// ============================================================
// Axis slicing and term coordinates
// ============================================================

#[test]
fn two_by_two_term_projection_matches_counts() {
    let table = two_by_two().term_projection();
    assert_eq!(table.len(), 2);
    let a = table.get("a").unwrap();
    let b = table.get("b").unwrap();
    assert_eq!((a.x, a.y), (3.0, 1.0));
    assert_eq!((b.x, b.y), (1.0, 3.0));
}

#[test]
fn two_by_two_axes_labels() {
    let labels = two_by_two().axes_labels(1);
    assert_eq!(labels.right, strings(&["a"]));
    assert_eq!(labels.left, strings(&["b"]));
    assert_eq!(labels.top, strings(&["b"]));
    assert_eq!(labels.bottom, strings(&["a"]));
}

#[test]
fn category_projection_is_projection_column() {
    let projection = three_dim();
    for (x_dim, y_dim) in [(0, 1), (2, 0), (1, 1)] {
        let p = projection
            .project_with_alternative_dimensions(x_dim, y_dim)
            .unwrap();
        let table = p.category_projection();
        let full = array![[0.5, -1.0, 2.0], [1.5, 0.0, -2.0], [-0.5, 3.0, 1.0]];
        assert_eq!(table.x(), full.column(x_dim).to_owned());
        assert_eq!(table.y(), full.column(y_dim).to_owned());
        assert_eq!(table.rows[0].term, "c1");
    }
}

#[test]
fn term_projection_is_counts_times_axes() {
    let p = three_dim().project_with_alternative_dimensions(2, 1).unwrap();
    let counts = array![
        [1.0, 0.0, 2.0],
        [0.0, 4.0, 1.0],
        [2.0, 2.0, 2.0],
        [5.0, 0.0, 0.0]
    ];
    let x_axis = array![2.0, -2.0, 1.0];
    let y_axis = array![-1.0, 0.0, 3.0];
    let table = p.term_projection();
    assert_eq!(table.x(), counts.dot(&x_axis));
    assert_eq!(table.y(), counts.dot(&y_axis));
    assert_eq!(table.rows[3].term, "z");
}

// ============================================================
// Axis labels and nearest terms
// ============================================================

#[test]
fn axes_labels_truncate_to_vocabulary() {
    let labels = three_dim().axes_labels(10);
    assert_eq!(labels.right.len(), 4);
    assert_eq!(labels.bottom.len(), 4);
}

#[test]
fn axes_labels_are_independent_sorts() {
    let p = three_dim();
    let table = p.term_projection();
    let labels = p.axes_labels(2);

    let mut by_x: Vec<_> = table.rows.iter().collect();
    by_x.sort_by(|a, b| b.x.total_cmp(&a.x));
    let expected: Vec<String> = by_x.iter().take(2).map(|p| p.term.clone()).collect();
    assert_eq!(labels.right, expected);

    let mut by_y: Vec<_> = table.rows.iter().collect();
    by_y.sort_by(|a, b| a.y.total_cmp(&b.y));
    let expected: Vec<String> = by_y.iter().take(2).map(|p| p.term.clone()).collect();
    assert_eq!(labels.bottom, expected);
}

#[test]
fn axes_labels_ties_keep_vocabulary_order() {
    let p = CategoryProjection::new(
        vocab(&["first", "second", "third"], &["c1", "c2"]),
        array![[1.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
        Array2::eye(2),
        0,
        1,
    )
    .unwrap();
    let labels = p.axes_labels(2);
    assert_eq!(labels.right, strings(&["first", "second"]));
    assert_eq!(labels.left, strings(&["third", "first"]));
}

#[test]
fn nearest_terms_corners() {
    let p = CategoryProjection::new(
        vocab(&["tr", "bl", "br", "tl", "mid"], &["c1", "c2"]),
        array![
            [10.0, 10.0],
            [0.0, 0.0],
            [10.0, 0.0],
            [0.0, 10.0],
            [5.0, 5.0]
        ],
        Array2::eye(2),
        0,
        1,
    )
    .unwrap();
    let nearest = p.nearest_terms(3);

    assert_eq!(nearest.top_right[0], "tr");
    assert_eq!(nearest.bottom_left[0], "bl");
    assert_eq!(nearest.bottom_right[0], "br");
    assert_eq!(nearest.top_left[0], "tl");
    assert_eq!(nearest.top_right.len(), 3);
    assert_eq!(nearest.bottom.len(), 3);
    // "mid" sits at the stretched origin: distance 1 from every edge midpoint
    assert!(nearest.right.contains(&"mid".to_string()));
}

#[test]
fn nearest_terms_use_stretched_axes() {
    // y spans a much smaller range than x; after stretching both span [-1, 1]
    let p = CategoryProjection::new(
        vocab(&["far_x", "top_y", "origin"], &["c1", "c2"]),
        array![[1000.0, 0.0], [0.0, 1.0], [0.0, 0.0]],
        Array2::eye(2),
        0,
        1,
    )
    .unwrap();
    let nearest = p.nearest_terms(1);
    assert_eq!(nearest.top_left, strings(&["top_y"]));
    assert_eq!(nearest.bottom_right, strings(&["far_x"]));
}

// ============================================================
// Alternative dimensions and alternate axes
// ============================================================

#[test]
fn alternative_dimensions_out_of_range() {
    let result = two_by_two().project_with_alternative_dimensions(0, 2);
    assert!(matches!(
        result,
        Err(ScatterError::DimensionOutOfRange { dim: 2, dims: 2 })
    ));
}

#[test]
fn constructor_rejects_out_of_range_dims() {
    let result = CategoryProjection::new(
        vocab(&["a"], &["c1", "c2"]),
        array![[1.0, 1.0]],
        Array2::eye(2),
        5,
        1,
    );
    assert!(matches!(
        result,
        Err(ScatterError::DimensionOutOfRange { dim: 5, dims: 2 })
    ));
}

#[test]
fn constructor_rejects_projection_row_mismatch() {
    let result = CategoryProjection::new(
        vocab(&["a"], &["c1", "c2"]),
        array![[1.0, 1.0]],
        Array2::eye(3),
        0,
        1,
    );
    assert!(matches!(result, Err(ScatterError::ShapeMismatch { .. })));
}

#[test]
fn labeled_projection_must_follow_corpus_order() {
    let counts = array![[3.0, 1.0], [1.0, 3.0]];
    let swapped = CategoryEmbedding::new(strings(&["c2", "c1"]), Array2::eye(2)).unwrap();
    let result = CategoryProjection::from_labeled(
        vocab(&["a", "b"], &["c1", "c2"]),
        counts.clone(),
        swapped,
        0,
        1,
    );
    assert!(matches!(
        result,
        Err(ScatterError::CategoryOrderMismatch { .. })
    ));

    let ordered = CategoryEmbedding::new(strings(&["c1", "c2"]), Array2::eye(2)).unwrap();
    let p = CategoryProjection::from_labeled(vocab(&["a", "b"], &["c1", "c2"]), counts, ordered, 0, 1)
        .unwrap();
    assert_eq!(p.term_projection(), two_by_two().term_projection());
}

#[test]
fn alternative_dimensions_keep_external_model() {
    let model = Arc::new(DriftingModel {
        calls: AtomicUsize::new(0),
        categories: strings(&["c1", "c2", "c3"]),
    });
    let p = CategoryProjection::with_model(
        vocab(&["w", "x", "y", "z"], &["c1", "c2", "c3"]),
        Array2::ones((4, 3)),
        Array2::eye(3),
        0,
        1,
        model.clone(),
    )
    .unwrap();
    let moved = p.project_with_alternative_dimensions(1, 2).unwrap();
    assert_eq!(moved.source_name(), "external-model");
    assert_eq!((moved.x_dim(), moved.y_dim()), (1, 2));
    moved.category_embeddings().unwrap();
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn alternate_axes_default_to_current_axes() {
    let p = three_dim();
    let new_x = array![1.0, 0.0, -1.0];
    let alt = p.project_with_alternate_axes(Some(new_x.clone()), None).unwrap();

    assert_eq!(alt.source_name(), "explicit-axes");
    assert_eq!(alt.x_axis(), new_x);
    assert_eq!(alt.y_axis(), p.y_axis());

    let counts = array![
        [1.0, 0.0, 2.0],
        [0.0, 4.0, 1.0],
        [2.0, 2.0, 2.0],
        [5.0, 0.0, 0.0]
    ];
    assert_eq!(alt.term_projection().x(), counts.dot(&new_x));
}

#[test]
fn alternate_axes_win_over_dimensions() {
    let alt = three_dim()
        .project_with_alternate_axes(Some(array![1.0, 1.0, 1.0]), Some(array![0.0, 0.0, 1.0]))
        .unwrap();
    let moved = alt.project_with_alternative_dimensions(2, 0).unwrap();
    assert_eq!(moved.x_axis(), array![1.0, 1.0, 1.0]);
    assert_eq!(moved.y_axis(), array![0.0, 0.0, 1.0]);
}

#[test]
fn alternate_axes_reject_wrong_length() {
    let result = three_dim().project_with_alternate_axes(Some(array![1.0, 2.0]), None);
    assert!(matches!(result, Err(ScatterError::ShapeMismatch { .. })));
}

#[test]
fn alternate_axes_snapshot_embeddings_eagerly() {
    let model = Arc::new(DriftingModel {
        calls: AtomicUsize::new(0),
        categories: strings(&["c1", "c2"]),
    });
    let p = CategoryProjection::with_model(
        vocab(&["a", "b"], &["c1", "c2"]),
        array![[3.0, 1.0], [1.0, 3.0]],
        Array2::eye(2),
        0,
        1,
        model.clone(),
    )
    .unwrap();

    let alt = p.project_with_alternate_axes(None, None).unwrap();
    // The model has moved on, but the snapshot has not
    assert_eq!(p.category_embeddings().unwrap().values()[[0, 0]], 1.0);
    assert_eq!(alt.category_embeddings().unwrap().values()[[0, 0]], 0.0);
    assert_eq!(alt.category_embeddings().unwrap().values()[[0, 0]], 0.0);
    assert_eq!(model.calls.load(Ordering::SeqCst), 2);
}

// ============================================================
// Category embeddings
// ============================================================

#[test]
fn raw_counts_embeddings_are_category_rows() {
    let emb = two_by_two().category_embeddings().unwrap();
    assert_eq!(emb.categories(), &strings(&["c1", "c2"])[..]);
    // terms x categories [[3, 1], [1, 3]] transposed
    assert_eq!(emb.values(), &array![[3.0, 1.0], [1.0, 3.0]]);

    let p = CategoryProjection::new(
        vocab(&["a", "b", "c"], &["c1", "c2"]),
        array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]],
        Array2::eye(2),
        0,
        1,
    )
    .unwrap();
    let emb = p.category_embeddings().unwrap();
    assert_eq!(emb.values(), &array![[1.0, 3.0, 5.0], [2.0, 4.0, 6.0]]);
}

#[test]
fn misordered_model_embeddings_are_rejected() {
    let model = Arc::new(DriftingModel {
        calls: AtomicUsize::new(0),
        categories: strings(&["c2", "c1"]),
    });
    let p = CategoryProjection::with_model(
        vocab(&["a", "b"], &["c1", "c2"]),
        array![[3.0, 1.0], [1.0, 3.0]],
        Array2::eye(2),
        0,
        1,
        model,
    )
    .unwrap();
    assert!(matches!(
        p.category_embeddings(),
        Err(ScatterError::CategoryOrderMismatch { .. })
    ));
    assert!(matches!(
        p.project_with_alternate_axes(None, None),
        Err(ScatterError::CategoryOrderMismatch { .. })
    ));
}

#[test]
fn source_without_embeddings_is_unimplemented() {
    struct Bare;
    impl CategoryEmbeddingSource for Bare {
        fn name(&self) -> &'static str {
            "bare"
        }
    }

    let p = CategoryProjection::with_source(
        vocab(&["a", "b"], &["c1", "c2"]),
        Arc::new(array![[3.0, 1.0], [1.0, 3.0]]),
        Arc::new(Array2::eye(2)),
        0,
        1,
        Arc::new(Bare),
    )
    .unwrap();
    assert!(matches!(
        p.category_embeddings(),
        Err(ScatterError::Unimplemented { .. })
    ));
    // Term coordinates do not depend on the embeddings
    assert_eq!(p.term_projection().x(), Array1::from(vec![3.0, 1.0]));
}
