//! Integer arithmetic shared by the constant folder and the `int_*`
//! intrinsics, so that folding never changes what a program computes.
//!
//! Division and remainder round toward negative infinity. Every helper
//! returns `None` on overflow or a zero divisor.

pub fn add(a: i64, b: i64) -> Option<i64> {
    a.checked_add(b)
}

pub fn sub(a: i64, b: i64) -> Option<i64> {
    a.checked_sub(b)
}

pub fn mul(a: i64, b: i64) -> Option<i64> {
    a.checked_mul(b)
}

pub fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    let r = a.checked_rem(b)?;
    if r != 0 && ((r < 0) != (b < 0)) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}

pub fn floor_mod(a: i64, b: i64) -> Option<i64> {
    let r = a.checked_rem(b)?;
    if r != 0 && ((r < 0) != (b < 0)) {
        r.checked_add(b)
    } else {
        Some(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn division_rounds_down() {
        assert_eq!(floor_div(7, 2), Some(3));
        assert_eq!(floor_div(-7, 2), Some(-4));
        assert_eq!(floor_div(7, -2), Some(-4));
        assert_eq!(floor_div(-7, -2), Some(3));
    }

    #[test]
    fn remainder_follows_divisor_sign() {
        assert_eq!(floor_mod(7, 3), Some(1));
        assert_eq!(floor_mod(-7, 3), Some(2));
        assert_eq!(floor_mod(7, -3), Some(-2));
        assert_eq!(floor_mod(-6, 3), Some(0));
    }

    #[test]
    fn rejects_zero_and_overflow() {
        assert_eq!(floor_div(1, 0), None);
        assert_eq!(floor_mod(1, 0), None);
        assert_eq!(floor_div(i64::MIN, -1), None);
        assert_eq!(add(i64::MAX, 1), None);
        assert_eq!(mul(i64::MIN, 2), None);
    }
}
