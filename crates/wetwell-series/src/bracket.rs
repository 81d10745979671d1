//! Gap bracketing: nearest known positions around each missing position.

use crate::error::SeriesError;

/// Nearest known positions strictly before and strictly after one gap.
///
/// `None` replaces the conventional `-1` sentinel: a gap before every known
/// position has no prior, a gap after every known position has no posterior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bracket {
    /// Nearest known position strictly before the gap.
    pub prior: Option<usize>,
    /// Nearest known position strictly after the gap.
    pub posterior: Option<usize>,
}

/// Locate, for every query position, the nearest reference positions strictly
/// before and after it.
///
/// Both sequences index one shared ordering and must be strictly ascending.
/// Runs as a single two-pointer merge over both sequences, O(n + m); this is
/// the property that keeps imputation linear on large series.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`SeriesError::UnsortedInput`] | Either sequence is not strictly ascending |
pub fn locate_brackets(
    queries: &[usize],
    references: &[usize],
) -> Result<Vec<Bracket>, SeriesError> {
    if let Some(index) = first_disorder(queries) {
        return Err(SeriesError::UnsortedInput { index });
    }
    if let Some(index) = first_disorder(references) {
        return Err(SeriesError::UnsortedInput { index });
    }

    let mut out = Vec::with_capacity(queries.len());
    let mut ri = 0;
    let mut prior = None;
    for &q in queries {
        while ri < references.len() && references[ri] < q {
            prior = Some(references[ri]);
            ri += 1;
        }
        // references[ri] >= q here (or the references are exhausted); skip an
        // exact hit so the posterior stays strictly after the query.
        let mut pi = ri;
        if pi < references.len() && references[pi] == q {
            pi += 1;
        }
        out.push(Bracket {
            prior,
            posterior: references.get(pi).copied(),
        });
    }
    Ok(out)
}

fn first_disorder(positions: &[usize]) -> Option<usize> {
    (1..positions.len()).find(|&i| positions[i] <= positions[i - 1])
}
