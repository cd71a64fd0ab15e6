//! Numeric tokenizing for path data and attribute values.
//!
//! Path data is NOT interpreted as a command grammar. Every plain decimal
//! literal is pulled out in order and consecutive values are paired into
//! points, regardless of which command letter they belong to. `H`/`V` take a
//! single argument and `A` carries radii and flags, so those commands shift
//! the pairing; the audit thresholds are tuned for this approximation and it
//! must stay positional.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::types::Point;

/// Optional sign, digits, optional point, digits. No exponents.
static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?[0-9]*\.?[0-9]+").expect("decimal pattern"));

/// Leading number of an attribute value, exponent allowed (`"12px"` is 12).
static LEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][-+]?[0-9]+)?")
        .expect("leading number pattern")
});

/// Every decimal literal in `data`, left to right.
///
/// Never fails: anything that does not look like a number is skipped, so an
/// empty or garbage string yields an empty vector. Literals too long to fit
/// an `f64` are skipped as well.
pub fn tokenize(data: &str) -> Vec<f64> {
    DECIMAL
        .find_iter(data)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .collect()
}

/// Pair `(t0, t1), (t2, t3), ...`; a trailing odd token is dropped.
pub fn pair_points(tokens: &[f64]) -> Vec<Point> {
    tokens
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect()
}

/// Positional point samples of a path `d` attribute
pub fn path_points(data: &str) -> Vec<Point> {
    pair_points(&tokenize(data))
}

/// Lenient numeric attribute parse: leading number or `None`
pub fn leading_number(value: &str) -> Option<f64> {
    LEADING
        .find(value.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Points of a `polygon`/`polyline` `points` attribute.
///
/// Items are separated by whitespace and commas. Pairing is by position, so
/// an unparsable item spoils only its own pair.
pub fn point_list(points: &str) -> Vec<Point> {
    let values: Vec<Option<f64>> = points
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|item| !item.is_empty())
        .map(leading_number)
        .collect();

    values
        .chunks_exact(2)
        .filter_map(|pair| match (pair[0], pair[1]) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        })
        .collect()
}
