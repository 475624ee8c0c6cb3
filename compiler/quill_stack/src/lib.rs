//! Stack growth for the recursive front-end passes.
//!
//! The parser, the constant folder and the HIR generator all walk the
//! syntax tree recursively. Source such as `((((((...))))))` or a long
//! `elif` ladder nests arbitrarily deep, so each recursive entry point
//! goes through [`with_stack_headroom`], which moves onto a fresh stack
//! segment once the current one runs low.
//!
//! On `wasm32` there is no segment to switch to and the guard is a plain
//! call.

/// Remaining stack below which a new segment is allocated.
const MIN_HEADROOM: usize = 128 * 1024;

/// Size of each freshly allocated segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first switching to a new stack segment if fewer than
/// [`MIN_HEADROOM`] bytes remain on the current one.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn with_stack_headroom<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(MIN_HEADROOM, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn with_stack_headroom<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nesting_depth(n: u32) -> u32 {
        with_stack_headroom(|| if n == 0 { 0 } else { nesting_depth(n - 1) + 1 })
    }

    #[test]
    fn survives_deep_nesting() {
        assert_eq!(nesting_depth(200_000), 200_000);
    }

    #[test]
    fn passes_results_through() {
        let parsed: Result<u8, String> = with_stack_headroom(|| "7".parse::<u8>().map_err(|e| e.to_string()));
        assert_eq!(parsed, Ok(7));
    }
}
