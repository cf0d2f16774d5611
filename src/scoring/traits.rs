// Term scorer trait.
//
// A term scorer assigns one number per vocabulary term; larger means more
// associated with the positive group. Output and pipeline code only see
// this interface, so another supervised weighting can sit behind it.

use ndarray::Array1;

pub trait TermScorer {
    /// Fixed, human-readable name of the scoring method.
    fn name(&self) -> &'static str;

    /// Vocabulary the scores are aligned with.
    fn terms(&self) -> &[String];

    /// One score per term, in `terms()` order.
    fn scores(&self) -> Array1<f64>;
}
