//! Candidate intersector (§4.E): across a single operation's size-group
//! buckets, intersect the per-bucket candidate sets into one defended list.

use crate::matcher::MatchCell;

/// Intersect the per-group candidate lists for one operation, in
/// [`crate::model::SizeGroup::ALL`] order.
///
/// A group whose candidate list is empty (cell value absent, or no
/// catalogue row survived) does not constrain the intersection. The seed
/// is the first group with a non-empty list; its order is preserved in
/// the output. Returns an empty `Vec` (serialised as `NA` by the report
/// writer) if no group has a non-empty list, or if every seed candidate is
/// eliminated by another group.
pub fn intersect(cells: &[MatchCell; 6]) -> Vec<String> {
    let lists: Vec<Option<&[String]>> = cells
        .iter()
        .map(|c| {
            if c.candidates.is_empty() {
                None
            } else {
                Some(c.candidates.as_slice())
            }
        })
        .collect();

    let Some(seed_idx) = lists.iter().position(Option::is_some) else {
        return Vec::new();
    };
    let seed = lists[seed_idx].expect("seed index points at Some by construction");

    seed.iter()
        .filter(|jedec| {
            lists
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != seed_idx)
                .all(|(_, list)| list.map_or(true, |l| l.contains(jedec)))
        })
        .cloned()
        .collect()
}
