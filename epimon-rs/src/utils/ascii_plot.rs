use crate::prelude::{Real, INF};
use std::iter;

/// ASCII plot of a sequence of non-negative values as vertical bars.
///
/// Values are resampled to at most `width` columns (taking the maximum of each
/// bucket) and each column is filled with '*'s up to its height. Returns an
/// empty string for empty input or a zero-sized canvas.
pub fn render_vbars(values: &[Real], height: usize, width: usize) -> String {
    if values.is_empty() || height == 0 || width == 0 {
        return String::new();
    }
    let columns = downsample(values, width);
    let max = columns.iter().cloned().fold(-INF, Real::max);
    let step = if max > 0.0 { max / height as Real } else { 1.0 };

    let mut out = String::with_capacity((columns.len() + 1) * height);
    for i in 0..height {
        let h = (height - i) as Real * step;
        let line: String = columns
            .iter()
            .map(|&x| if x > 0.0 && x >= h - 0.5 * step { '*' } else { ' ' })
            .collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.extend(iter::repeat('-').take(columns.len()));
    out.push('\n');
    return out;
}

/// ASCII plot of a sequence of labeled values as horizontal bars scaled to the
/// given width.
pub fn render_hbars<L: AsRef<str>>(rows: &[(L, Real)], width: usize) -> String {
    if rows.is_empty() {
        return String::new();
    }
    let max = rows.iter().map(|r| r.1).fold(-INF, Real::max);
    let step = if max > 0.0 { max / width as Real } else { 1.0 };
    let pad = rows.iter().map(|r| r.0.as_ref().len()).max().unwrap_or(0);

    let mut out = String::new();
    for (label, x) in rows {
        let n = (x / step).round() as usize;
        out.push_str(&format!("{:>pad$} |", label.as_ref(), pad = pad));
        out.extend(iter::repeat('=').take(n));
        out.push_str(&format!(" {}\n", x));
    }
    return out;
}

/// Bucket values into at most n columns keeping the maximum of each bucket.
fn downsample(values: &[Real], n: usize) -> Vec<Real> {
    if values.len() <= n {
        return values.to_vec();
    }
    let size = (values.len() + n - 1) / n;
    values
        .chunks(size)
        .map(|chunk| chunk.iter().cloned().fold(-INF, Real::max))
        .collect()
}
