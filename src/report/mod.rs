//! Year-distribution reporting: text printout and SVG bar chart.
//!
//! The chart is written as plain SVG markup: one bar per distinct year in
//! ascending order, rotated x-axis labels, and the `"Unknown"` bucket
//! excluded (it appears only in the textual report).

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::YearCounts;

// Chart geometry
const BAR_WIDTH: usize = 18;
const BAR_GAP: usize = 8;
const PLOT_HEIGHT: usize = 300;
const MARGIN_LEFT: usize = 60;
const MARGIN_RIGHT: usize = 20;
const MARGIN_TOP: usize = 20;
const MARGIN_BOTTOM: usize = 70;

/// Render the textual year-distribution report.
pub fn render_text(counts: &YearCounts) -> String {
    let mut out = String::from("Number of publications per year:\n");

    for (year, count) in counts.iter() {
        let _ = writeln!(out, "{}: {}", year, count);
    }
    if counts.unknown() > 0 {
        let _ = writeln!(out, "Unknown: {}", counts.unknown());
    }
    let _ = writeln!(out, "Total number of publications found: {}", counts.total());

    out
}

/// Render the year-distribution bar chart as SVG markup.
pub fn render_svg(counts: &YearCounts) -> String {
    let bars: Vec<(&str, usize)> = counts.iter().collect();
    let max_count = counts.max_count().max(1);

    let width = MARGIN_LEFT + bars.len() * (BAR_WIDTH + BAR_GAP) + MARGIN_RIGHT;
    let height = MARGIN_TOP + PLOT_HEIGHT + MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + PLOT_HEIGHT;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" font-family="sans-serif" font-size="11">"#,
        width, height
    );
    let _ = writeln!(
        svg,
        r#"  <rect width="{}" height="{}" fill="white"/>"#,
        width, height
    );

    // Axes
    let _ = writeln!(
        svg,
        r#"  <line x1="{0}" y1="{1}" x2="{0}" y2="{2}" stroke="black"/>"#,
        MARGIN_LEFT, MARGIN_TOP, baseline
    );
    let _ = writeln!(
        svg,
        r#"  <line x1="{0}" y1="{1}" x2="{2}" y2="{1}" stroke="black"/>"#,
        MARGIN_LEFT,
        baseline,
        width - MARGIN_RIGHT
    );

    // Y-axis tick labels: zero and the maximum
    let _ = writeln!(
        svg,
        r#"  <text x="{}" y="{}" text-anchor="end">0</text>"#,
        MARGIN_LEFT - 6,
        baseline + 4
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{}" y="{}" text-anchor="end">{}</text>"#,
        MARGIN_LEFT - 6,
        MARGIN_TOP + 4,
        max_count
    );

    for (i, (year, count)) in bars.iter().enumerate() {
        let bar_height = count * PLOT_HEIGHT / max_count;
        let x = MARGIN_LEFT + BAR_GAP / 2 + i * (BAR_WIDTH + BAR_GAP);
        let y = baseline - bar_height;

        let _ = writeln!(
            svg,
            r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="blue"/>"#,
            x, y, BAR_WIDTH, bar_height
        );

        // Rotated year label under the bar
        let label_x = x + BAR_WIDTH / 2 + 4;
        let label_y = baseline + 8;
        let _ = writeln!(
            svg,
            r#"  <text x="{0}" y="{1}" text-anchor="start" transform="rotate(90 {0} {1})">{2}</text>"#,
            label_x, label_y, year
        );
    }

    // Axis titles
    let _ = writeln!(
        svg,
        r#"  <text x="{}" y="{}" text-anchor="middle">Year</text>"#,
        MARGIN_LEFT + (width - MARGIN_LEFT - MARGIN_RIGHT) / 2,
        height - 8
    );
    let title_y = MARGIN_TOP + PLOT_HEIGHT / 2;
    let _ = writeln!(
        svg,
        r#"  <text x="14" y="{0}" text-anchor="middle" transform="rotate(-90 14 {0})">Count of Papers Published Per Year</text>"#,
        title_y
    );

    svg.push_str("</svg>\n");
    svg
}

/// Write the chart to `dir/file_name`, creating the directory on demand.
pub fn save_chart(
    dir: &Path,
    file_name: &str,
    counts: &YearCounts,
) -> Result<PathBuf, std::io::Error> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, render_svg(counts))?;

    tracing::info!(path = %path.display(), "saved chart");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::count_by_year;
    use crate::models::Record;

    fn sample_counts() -> YearCounts {
        count_by_year(&[
            Record::new("A", "2019"),
            Record::new("B", "2019"),
            Record::new("C", "Unknown"),
            Record::new("D", "2021"),
        ])
    }

    #[test]
    fn test_text_report_format() {
        let report = render_text(&sample_counts());

        assert_eq!(
            report,
            "Number of publications per year:\n\
             2019: 2\n\
             2021: 1\n\
             Unknown: 1\n\
             Total number of publications found: 4\n"
        );
    }

    #[test]
    fn test_text_report_omits_empty_unknown() {
        let counts = count_by_year(&[Record::new("A", "2019")]);
        let report = render_text(&counts);

        assert!(!report.contains("Unknown"));
        assert!(report.contains("Total number of publications found: 1"));
    }

    #[test]
    fn test_svg_excludes_unknown_bucket() {
        let svg = render_svg(&sample_counts());

        // One bar per known year, none for Unknown
        assert_eq!(svg.matches("<rect").count(), 3); // background + 2 bars
        assert!(svg.contains(">2019<"));
        assert!(svg.contains(">2021<"));
        assert!(!svg.contains("Unknown"));
    }

    #[test]
    fn test_svg_labels_and_titles() {
        let svg = render_svg(&sample_counts());

        assert!(svg.contains("rotate(90"));
        assert!(svg.contains(">Year<"));
        assert!(svg.contains("Count of Papers Published Per Year"));
    }

    #[test]
    fn test_svg_handles_empty_counts() {
        let svg = render_svg(&YearCounts::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn test_save_chart() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("results").join("plots");

        let path = save_chart(&nested, "plot.svg", &sample_counts()).unwrap();
        assert!(path.exists());
    }
}
