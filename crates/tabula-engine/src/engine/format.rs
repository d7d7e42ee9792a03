/// Format a number for display.
///
/// Uses the shortest decimal that round-trips, so integral values print
/// without a fractional part (`10`, not `10.0`). Magnitudes of 1e21 and up,
/// or below 1e-7, switch to exponent form (`1e300`, `2.5e-9`).
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        // Normalise -0 so it never shows up as "-0".
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-7 {
        format!("{:e}", n)
    } else {
        format!("{}", n)
    }
}
