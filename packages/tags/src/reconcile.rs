// ABOUTME: Association reconciliation between current and desired product sets
// ABOUTME: Pure diff logic; all database effects live in storage.rs

use crate::types::ProductTag;

/// The work needed to make a tag's join rows match a desired product-id
/// set: product ids to insert rows for, and join-row ids to delete.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AssociationDiff {
    pub additions: Vec<i64>,
    pub removals: Vec<i64>,
}

impl AssociationDiff {
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }
}

/// Compute the additions and removals that turn `current` into `desired`.
///
/// `desired` is the complete new association set, not a delta. Duplicate
/// ids in `desired` produce a single addition.
pub fn diff_associations(current: &[ProductTag], desired: &[i64]) -> AssociationDiff {
    let current_ids: Vec<i64> = current.iter().map(|pt| pt.product_id).collect();

    let mut additions: Vec<i64> = Vec::new();
    for &product_id in desired {
        if !current_ids.contains(&product_id) && !additions.contains(&product_id) {
            additions.push(product_id);
        }
    }

    let removals = current
        .iter()
        .filter(|pt| !desired.contains(&pt.product_id))
        .map(|pt| pt.id)
        .collect();

    AssociationDiff {
        additions,
        removals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join_rows(pairs: &[(i64, i64)]) -> Vec<ProductTag> {
        pairs
            .iter()
            .map(|&(id, product_id)| ProductTag {
                id,
                tag_id: 1,
                product_id,
            })
            .collect()
    }

    #[test]
    fn empty_current_adds_everything() {
        let diff = diff_associations(&[], &[2, 5]);
        assert_eq!(diff.additions, vec![2, 5]);
        assert!(diff.removals.is_empty());
    }

    #[test]
    fn empty_desired_removes_everything() {
        let current = join_rows(&[(10, 1), (11, 2)]);
        let diff = diff_associations(&current, &[]);
        assert!(diff.additions.is_empty());
        assert_eq!(diff.removals, vec![10, 11]);
    }

    #[test]
    fn overlapping_sets_diff_minimally() {
        let current = join_rows(&[(10, 1), (11, 2), (12, 3)]);
        let diff = diff_associations(&current, &[2, 3, 4]);
        assert_eq!(diff.additions, vec![4]);
        assert_eq!(diff.removals, vec![10]);
    }

    #[test]
    fn identical_sets_produce_empty_diff() {
        let current = join_rows(&[(10, 1), (11, 2)]);
        let diff = diff_associations(&current, &[1, 2]);
        assert!(diff.is_empty());
    }

    #[test]
    fn duplicate_desired_ids_add_once() {
        let diff = diff_associations(&[], &[7, 7, 7]);
        assert_eq!(diff.additions, vec![7]);
    }

    #[test]
    fn desired_order_is_preserved_for_additions() {
        let current = join_rows(&[(10, 3)]);
        let diff = diff_associations(&current, &[9, 3, 1]);
        assert_eq!(diff.additions, vec![9, 1]);
        assert!(diff.removals.is_empty());
    }
}
