//! Convenience methods for constructing query axes.
use num_traits::Float;

/// Generates evenly spaced values from start to stop,
/// including the endpoint.
///
/// `n == 1` gives `[start]` and `n == 0` gives an empty Vec.
pub fn linspace<T>(start: T, stop: T, n: usize) -> Vec<T>
where
    T: Float,
{
    if n < 2 {
        return (0..n).map(|_| start).collect();
    }
    let Some(intervals) = T::from(n - 1) else {
        return Vec::new();
    };
    let dx: T = (stop - start) / intervals;
    (0..n)
        .map_while(|i| T::from(i).map(|fi| start + fi * dx))
        .collect()
}

#[cfg(test)]
mod test {
    use super::linspace;

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2.0, 2.0, 1), vec![2.0]);
        assert!(linspace(0.0_f32, 1.0, 0).is_empty());
    }
}
