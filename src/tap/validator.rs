//! Number resolution and document validation
//!
//! Testcase numbers in a document are partial: some lines declare their
//! number, some leave it out. [`enumerate`] resolves the full sequence
//! in a single left-to-right pass without mutating the document, and
//! [`validate`] answers whether a document represents a successful test
//! run.

use crate::tap::ast::{Document, Numbering};
use crate::tap::error::TapError;
use crate::tap::parser::Mode;
use std::collections::{HashMap, HashSet};

/// Resolve a partial number sequence to a total one.
///
/// A single left-to-right pass over the declared numbers, with a "next
/// free" cursor that starts at `first` and never moves backward. An
/// absent number takes the smallest unused number at or past the cursor.
/// An explicitly declared number is always preserved, with two collision
/// cases:
///
/// - against an earlier *declared* number: error in strict mode; in
///   lenient mode the later occurrence is reassigned like an absent one.
/// - against an earlier *auto-assigned* number: error in strict mode; in
///   lenient mode the auto-assigned occurrence is displaced to the next
///   free number and the declared number keeps its claim.
///
/// ```text
/// [1, 3, None, 8]  ->  [1, 3, 4, 8]
/// [1, 3, None, 2]  ->  [1, 3, 4, 2]
/// [None, 1, None]  ->  [2, 1, 3]      (lenient)
/// ```
pub fn enumerate(
    numbers: &[Option<u64>],
    first: u64,
    mode: Mode,
) -> Result<Vec<u64>, TapError> {
    // numbers declared on a line, and numbers picked for absent ones
    // (keyed to the position that may still be displaced)
    let mut fixed: HashSet<u64> = HashSet::new();
    let mut auto: HashMap<u64, usize> = HashMap::new();
    let mut cursor = first;
    let mut resolved: Vec<u64> = Vec::with_capacity(numbers.len());

    // saturates at the numeric ceiling instead of overflowing; numbers
    // can repeat there, which no conforming document ever reaches
    fn next_free(
        fixed: &HashSet<u64>,
        auto: &HashMap<u64, usize>,
        cursor: &mut u64,
    ) -> u64 {
        while (fixed.contains(cursor) || auto.contains_key(cursor)) && *cursor < u64::MAX {
            *cursor += 1;
        }
        let n = *cursor;
        *cursor = cursor.saturating_add(1);
        n
    }

    for (index, number) in numbers.iter().enumerate() {
        match *number {
            None => {
                let n = next_free(&fixed, &auto, &mut cursor);
                auto.insert(n, index);
                resolved.push(n);
            }
            Some(n) => {
                let reused = fixed.contains(&n) || auto.contains_key(&n);
                if reused && mode == Mode::Strict {
                    return Err(TapError::InvalidNumbering(format!(
                        "testcase number {} was already used, reused at index {}",
                        n, index
                    )));
                }
                if let Some(position) = auto.remove(&n) {
                    // the auto-assigned earlier occurrence yields
                    let replacement = next_free(&fixed, &auto, &mut cursor);
                    resolved[position] = replacement;
                    auto.insert(replacement, position);
                    fixed.insert(n);
                    resolved.push(n);
                } else if fixed.contains(&n) {
                    let replacement = next_free(&fixed, &auto, &mut cursor);
                    fixed.insert(replacement);
                    resolved.push(replacement);
                } else {
                    fixed.insert(n);
                    resolved.push(n);
                    if n >= cursor {
                        cursor = n.saturating_add(1);
                    }
                }
            }
        }
    }
    Ok(resolved)
}

/// Reject number sequences the plan cannot hold: more testcases than the
/// declared range has slots. Out-of-range declared numbers are not an
/// error here, they merely make the document invalid.
pub(crate) fn check_range(
    numbers: &[Option<u64>],
    numbering: &Numbering,
) -> Result<(), TapError> {
    if numbers.len() as u64 > numbering.len() {
        return Err(TapError::InvalidNumbering(format!(
            "more testcases provided ({}) than allowed by plan {}",
            numbers.len(),
            numbering
        )));
    }
    Ok(())
}

/// Does `doc` represent a successful test run?
///
/// A document without a plan cannot be judged at all, not even when it
/// is skipped. A skipped document is successful. A bailed-out one is
/// not. Otherwise the resolved numbers must cover the declared range
/// exactly and every testcase must pass or carry a SKIP flag. The
/// document is never mutated and repeated calls agree.
pub fn validate(doc: &Document) -> Result<bool, TapError> {
    let numbering = doc.numbering().ok_or_else(|| {
        TapError::MissingPlan("document requires a plan before it can be validated".to_string())
    })?;

    if doc.skip() {
        return Ok(true);
    }
    if doc.bailed() {
        return Ok(false);
    }

    let enumeration = match doc.enumeration() {
        Ok(enumeration) => enumeration,
        Err(TapError::InvalidNumbering(_)) => return Ok(false),
        Err(err) => return Err(err),
    };

    let resolved: HashSet<u64> = enumeration.iter().copied().collect();
    if !numbering.iter().all(|n| resolved.contains(&n)) {
        return Ok(false);
    }
    if enumeration.iter().any(|n| !numbering.contains(*n)) {
        return Ok(false);
    }

    Ok(doc.testcases().all(|tc| tc.outcome.is_pass() || tc.is_skipped()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tap::ast::{Bailout, Outcome, TestResult};

    fn resolve(numbers: &[Option<u64>], mode: Mode) -> Result<Vec<u64>, TapError> {
        enumerate(numbers, 1, mode)
    }

    #[test]
    fn test_enumerate_fills_holes() {
        let numbers = [Some(1), Some(3), None, Some(8)];
        assert_eq!(
            resolve(&numbers, Mode::Strict).unwrap(),
            vec![1, 3, 4, 8]
        );
    }

    #[test]
    fn test_enumerate_all_absent() {
        let numbers = [None, None, None];
        assert_eq!(resolve(&numbers, Mode::Strict).unwrap(), vec![1, 2, 3]);
        assert_eq!(
            enumerate(&numbers, 4, Mode::Strict).unwrap(),
            vec![4, 5, 6]
        );
    }

    #[test]
    fn test_enumerate_duplicate_strict_errors() {
        let numbers = [Some(1), Some(3), None, Some(4)];
        let err = resolve(&numbers, Mode::Strict).unwrap_err();
        assert!(matches!(err, TapError::InvalidNumbering(_)));
    }

    #[test]
    fn test_enumerate_auto_yields_to_later_explicit() {
        // the declared 4 keeps its claim, the auto-assigned 4 moves on
        let numbers = [Some(1), Some(3), None, Some(4)];
        assert_eq!(
            resolve(&numbers, Mode::Lenient).unwrap(),
            vec![1, 3, 5, 4]
        );
    }

    #[test]
    fn test_enumerate_explicit_duplicate_lenient_reassigns_later() {
        let numbers = [Some(1), Some(1), None];
        assert_eq!(
            resolve(&numbers, Mode::Lenient).unwrap(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_enumerate_keeps_backward_jump() {
        // 2 was never used, so it is not a duplicate in either mode
        let numbers = [Some(1), Some(3), None, Some(2)];
        assert_eq!(
            resolve(&numbers, Mode::Strict).unwrap(),
            vec![1, 3, 4, 2]
        );
        assert_eq!(
            resolve(&numbers, Mode::Lenient).unwrap(),
            vec![1, 3, 4, 2]
        );
    }

    #[test]
    fn test_enumerate_hole_skips_used_numbers() {
        let numbers = [Some(2), None, None];
        assert_eq!(resolve(&numbers, Mode::Strict).unwrap(), vec![2, 3, 4]);
    }

    #[test]
    fn test_enumerate_saturates_at_numeric_ceiling() {
        let numbers = [Some(u64::MAX), None];
        let resolved = resolve(&numbers, Mode::Lenient).unwrap();
        assert_eq!(resolved[0], u64::MAX);
        assert_eq!(resolved.len(), 2);
    }

    #[test]
    fn test_enumerate_explicit_claims_auto_assigned_number() {
        let numbers = [None, Some(1), None];
        assert_eq!(resolve(&numbers, Mode::Lenient).unwrap(), vec![2, 1, 3]);
        assert!(resolve(&numbers, Mode::Strict).is_err());
    }

    fn doc(first: u64, last: u64, cases: &[(Outcome, Option<u64>)]) -> Document {
        let mut doc = Document::new();
        doc.add_plan(first, last, "", true);
        for (outcome, number) in cases {
            doc.add_testcase(TestResult::new(*outcome, *number, "case"));
        }
        doc
    }

    #[test]
    fn test_validate_requires_plan() {
        let doc = Document::new();
        assert!(matches!(doc.valid(), Err(TapError::MissingPlan(_))));
    }

    #[test]
    fn test_validate_requires_plan_even_when_skipped() {
        let mut doc = Document::new();
        doc.set_skip("no plan anyway");
        assert!(matches!(validate(&doc), Err(TapError::MissingPlan(_))));
    }

    #[test]
    fn test_validate_skip_wins() {
        let mut doc = doc(1, 3, &[(Outcome::Fail, None)]);
        doc.set_skip("not supported here");
        assert!(validate(&doc).unwrap());
    }

    #[test]
    fn test_validate_bailout_fails() {
        let mut doc = doc(
            1,
            2,
            &[(Outcome::Pass, Some(1)), (Outcome::Pass, Some(2))],
        );
        doc.add_bailout(Bailout::new("fatal"));
        assert!(!validate(&doc).unwrap());
    }

    #[test]
    fn test_validate_all_pass() {
        let doc = doc(1, 2, &[(Outcome::Pass, None), (Outcome::Pass, None)]);
        assert!(validate(&doc).unwrap());
    }

    #[test]
    fn test_validate_failure_fails() {
        let doc = doc(1, 2, &[(Outcome::Pass, None), (Outcome::Fail, None)]);
        assert!(!validate(&doc).unwrap());
    }

    #[test]
    fn test_validate_skipped_failure_passes() {
        let mut doc = doc(1, 2, &[(Outcome::Pass, None)]);
        let mut tc = TestResult::fail("known broken");
        tc.skip("platform");
        doc.add_testcase(tc);
        assert!(validate(&doc).unwrap());
    }

    #[test]
    fn test_validate_incomplete_coverage_fails() {
        // plan promises 3 tests, only 2 ran
        let doc = doc(1, 3, &[(Outcome::Pass, None), (Outcome::Pass, None)]);
        assert!(!validate(&doc).unwrap());
    }

    #[test]
    fn test_validate_too_many_testcases_fails() {
        let doc = doc(
            1,
            1,
            &[(Outcome::Pass, None), (Outcome::Pass, None)],
        );
        assert!(!validate(&doc).unwrap());
    }

    #[test]
    fn test_validate_out_of_range_number_fails() {
        let doc = doc(1, 2, &[(Outcome::Pass, Some(1)), (Outcome::Pass, Some(7))]);
        assert!(!validate(&doc).unwrap());
    }

    #[test]
    fn test_validate_empty_plan() {
        let empty = doc(1, 0, &[]);
        assert!(validate(&empty).unwrap());

        // 1..0 with entries is invalid unless the document is skipped
        let mut nonempty = doc(1, 0, &[(Outcome::Pass, None)]);
        assert!(!validate(&nonempty).unwrap());
        nonempty.set_skip("whole file skipped");
        assert!(validate(&nonempty).unwrap());
    }

    #[test]
    fn test_validate_is_idempotent() {
        let doc = doc(1, 2, &[(Outcome::Pass, None), (Outcome::Fail, Some(2))]);
        assert_eq!(validate(&doc).unwrap(), validate(&doc).unwrap());
        assert_eq!(doc.testcase_numbers(), vec![None, Some(2)]);
    }
}
