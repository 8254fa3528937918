use super::model::{Sample, SampleId};
use super::select::TopUnits;

// ---------------------------------------------------------------------------
// Declarative chart descriptions handed to the plot layer
// ---------------------------------------------------------------------------

/// Titles of one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
}

/// One horizontal bar.
#[derive(Debug, Clone, PartialEq)]
pub struct BarEntry {
    /// Category label on the y axis, e.g. `OTU 1167`.
    pub label: String,
    pub value: f64,
    /// Full taxonomic label shown on hover.
    pub hover: String,
}

/// Horizontal bar chart, bars in drawing order from the bottom up.
#[derive(Debug, Clone, PartialEq)]
pub struct BarTrace {
    pub layout: ChartLayout,
    pub bars: Vec<BarEntry>,
}

/// Build the top-OTU bar chart for `id`. `top_n` is the configured chart
/// size and only shows up in the title.
pub fn bar_trace(id: &SampleId, top: &TopUnits, top_n: usize) -> BarTrace {
    let bars = top
        .ids
        .iter()
        .zip(&top.values)
        .zip(&top.labels)
        .map(|((otu, value), label)| BarEntry {
            label: format!("OTU {otu}"),
            value: *value,
            hover: label.clone(),
        })
        .collect();

    BarTrace {
        layout: ChartLayout {
            title: format!("Top {top_n} Bacteria Cultures found for Subject {id}"),
            x_title: "Number of Bacteria".into(),
            y_title: "Operational Taxonomic Units (OTU) ID".into(),
        },
        bars,
    }
}

/// One bubble: position, marker size and the scalar fed to the colourscale.
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color_value: f64,
    pub text: String,
}

/// Bubble chart of every OTU of one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleTrace {
    pub layout: ChartLayout,
    pub bubbles: Vec<Bubble>,
    /// `(min, max)` of `color_value`, the colourscale domain.
    pub color_range: (f64, f64),
}

/// Build the bubble chart for `sample`: x = OTU id, y = value, size =
/// value, colour = OTU id.
pub fn bubble_trace(sample: &Sample) -> BubbleTrace {
    let bubbles: Vec<Bubble> = sample
        .otu_ids
        .iter()
        .zip(&sample.sample_values)
        .zip(&sample.otu_labels)
        .map(|((otu, value), label)| Bubble {
            x: *otu as f64,
            y: *value,
            size: *value,
            color_value: *otu as f64,
            text: label.clone(),
        })
        .collect();

    let color_range = bubbles
        .iter()
        .map(|b| b.color_value)
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            None => Some((v, v)),
        })
        .unwrap_or((0.0, 0.0));

    BubbleTrace {
        layout: ChartLayout {
            title: format!("Bacteria Cultures per Sample for Subject {}", sample.id),
            x_title: "OTU ID".into(),
            y_title: "Number of Bacteria".into(),
        },
        bubbles,
        color_range,
    }
}
