//! Plain CSV export of preference data for offline inspection.
//!
//! No header row and no quoting: every cell is a number.
use std::io::Write;

use ndarray::{Array1, Array2};

use crate::gp::data::Preference;

/// One row per design column: its coordinates, then `y[j]` when latent
/// values are supplied.
///
/// # Errors
/// Returns an I/O error if writing fails.
pub fn write_design_csv(
    mut writer: impl Write, x: &Array2<f64>, y: Option<&Array1<f64>>,
) -> std::io::Result<()> {
    for (j, col) in x.columns().into_iter().enumerate() {
        let mut cells: Vec<String> = col.iter().map(|v| v.to_string()).collect();
        if let Some(yj) = y.and_then(|y| y.get(j)) {
            cells.push(yj.to_string());
        }
        writeln!(writer, "{}", cells.join(","))?;
    }
    writer.flush()
}

/// One row per preference set, most preferred index first.
///
/// # Errors
/// Returns an I/O error if writing fails.
pub fn write_preferences_csv(mut writer: impl Write, prefs: &[Preference]) -> std::io::Result<()> {
    for p in prefs {
        let cells: Vec<String> = p.indices().iter().map(|i| i.to_string()).collect();
        writeln!(writer, "{}", cells.join(","))?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Rows follow design column order; latent values are appended when
    // present and omitted otherwise.
    fn design_rows_follow_column_order() {
        let x = array![[0.1, 0.7], [0.2, 0.9]];
        let mut with_y = Vec::new();
        write_design_csv(&mut with_y, &x, Some(&array![1.5, -2.0])).unwrap();
        assert_eq!(String::from_utf8(with_y).unwrap(), "0.1,0.2,1.5\n0.7,0.9,-2\n");

        let mut without_y = Vec::new();
        write_design_csv(&mut without_y, &x, None).unwrap();
        assert_eq!(String::from_utf8(without_y).unwrap(), "0.1,0.2\n0.7,0.9\n");
    }

    #[test]
    fn preference_rows_list_winner_first() {
        let prefs = vec![Preference::new(vec![2, 0, 1]).unwrap()];
        let mut buf = Vec::new();
        write_preferences_csv(&mut buf, &prefs).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "2,0,1\n");
    }
}
