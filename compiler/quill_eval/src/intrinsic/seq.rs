//! Index arithmetic shared by the tuple and string intrinsics.

use super::IntrinsicError;

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Positions selected by `[start:end:step]` over a sequence of `len`
/// elements. Omitted bounds default to the whole sequence in the step's
/// direction; bounds are clamped, never wrapped.
pub(super) fn slice_indices(
    len: usize,
    start: Option<i64>,
    end: Option<i64>,
    step: Option<i64>,
) -> Result<Vec<usize>, IntrinsicError> {
    let step = step.unwrap_or(1);
    if step == 0 {
        return Err(IntrinsicError::ZeroStep);
    }
    let len = to_i64(len);
    let forward = step > 0;
    let start = start.unwrap_or(if forward { 0 } else { len - 1 });
    let end = end.unwrap_or(if forward { len } else { -1 });

    let mut indices = Vec::new();
    let mut i = if forward {
        start.max(0)
    } else {
        start.min(len - 1)
    };
    while (forward && i < len && i < end) || (!forward && i >= 0 && i > end) {
        if let Ok(index) = usize::try_from(i) {
            indices.push(index);
        }
        match i.checked_add(step) {
            Some(next) => i = next,
            None => break,
        }
    }
    Ok(indices)
}

/// Replace `items[start..end]` with `replacement`.
pub(super) fn splice<T>(
    items: &mut Vec<T>,
    start: i64,
    end: i64,
    replacement: Vec<T>,
) -> Result<(), IntrinsicError> {
    let len = items.len();
    let range = usize::try_from(start)
        .ok()
        .zip(usize::try_from(end).ok())
        .filter(|&(l, r)| l <= r && r <= len);
    let Some((l, r)) = range else {
        return Err(IntrinsicError::InvalidRange { start, end, len });
    };
    items.splice(l..r, replacement).for_each(drop);
    Ok(())
}

/// First position `p` with `start <= p <= end - len(needle)` where
/// `needle` occurs in `haystack`, counted in characters; `-1` if none.
pub(super) fn find(haystack: &str, needle: &str, start: i64, end: i64) -> i64 {
    let hay: Vec<char> = haystack.chars().collect();
    let pat: Vec<char> = needle.chars().collect();
    if hay.len() < pat.len() {
        return -1;
    }
    let last = end.min(to_i64(hay.len() - pat.len()));
    let mut p = start.max(0);
    while p <= last {
        if let Ok(at) = usize::try_from(p) {
            if hay[at..at + pat.len()] == pat[..] {
                return p;
            }
        }
        p += 1;
    }
    -1
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;

    #[test]
    fn slices_follow_step_direction() {
        assert_eq!(slice_indices(5, None, None, None).unwrap(), [0, 1, 2, 3, 4]);
        assert_eq!(slice_indices(5, Some(1), Some(4), Some(2)).unwrap(), [1, 3]);
        assert_eq!(slice_indices(4, None, None, Some(-1)).unwrap(), [3, 2, 1, 0]);
        assert_eq!(slice_indices(4, Some(-3), Some(10), None).unwrap(), [0, 1, 2, 3]);
        assert!(slice_indices(3, Some(2), Some(1), None).unwrap().is_empty());
        assert_eq!(slice_indices(3, None, None, Some(0)), Err(IntrinsicError::ZeroStep));
    }

    #[test]
    fn splice_grows_and_shrinks() {
        let mut v = vec![1, 2, 3];
        splice(&mut v, 1, 1, vec![9, 9]).unwrap();
        assert_eq!(v, [1, 9, 9, 2, 3]);
        splice(&mut v, 0, 4, Vec::new()).unwrap();
        assert_eq!(v, [3]);
        assert!(splice(&mut v, 1, 0, Vec::new()).is_err());
        assert!(splice(&mut v, -1, 1, Vec::new()).is_err());
    }

    #[test]
    fn find_respects_window() {
        assert_eq!(find("hello", "l", 0, 5), 2);
        assert_eq!(find("hello", "l", 3, 5), 3);
        assert_eq!(find("hello", "lo", 0, 2), -1);
        assert_eq!(find("hi", "hello", 0, 2), -1);
        assert_eq!(find("abc", "", 1, 3), 1);
    }
}
