use crate::layout::{Cabinet, LayoutParams, Shelf};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Preset {
    /// 800x600 with shelves of two, three and one partitions.
    Classic,
    /// `shelves` shelves, each split evenly into `partitions`.
    Even { shelves: usize, partitions: usize },
    /// One shelf with one partition.
    Single,
}

impl Preset {
    pub const NAMES: [&'static str; 3] = ["classic", "even", "single"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "classic" | "default" => Some(Self::Classic),
            "even" => Some(Self::Even {
                shelves: 4,
                partitions: 3,
            }),
            "single" => Some(Self::Single),
            _ => name
                .strip_prefix("even-")
                .and_then(|dims| dims.split_once('x'))
                .and_then(|(s, p)| Some((s.parse::<usize>().ok()?, p.parse::<usize>().ok()?)))
                .map(|(shelves, partitions)| Self::Even {
                    shelves,
                    partitions,
                }),
        }
    }

    pub fn build(&self, params: &LayoutParams) -> Cabinet {
        match self {
            Preset::Classic => Cabinet::with_shelves(
                800.0,
                600.0,
                vec![
                    Shelf::with_partitions(120.0, &[400.0, 400.0]),
                    Shelf::with_partitions(120.0, &[266.0, 266.0, 268.0]),
                    Shelf::with_partitions(120.0, &[800.0]),
                ],
            ),
            Preset::Even {
                shelves,
                partitions,
            } => build_even(*shelves, *partitions, 800.0, 600.0, params),
            Preset::Single => Cabinet::with_shelves(
                800.0,
                600.0,
                vec![Shelf::new(params.default_shelf_height, 800.0)],
            ),
        }
    }
}

/// Evenly split shelves. Widths are whole units; the last partition takes the
/// rounding remainder so every shelf sums to `width`. The partition count is
/// capped so every partition stays above the floor.
fn build_even(
    shelves: usize,
    partitions: usize,
    width: f64,
    height: f64,
    params: &LayoutParams,
) -> Cabinet {
    let max_partitions = (width / params.min_partition_width).floor().max(1.0) as usize;
    let count = partitions.clamp(1, max_partitions);
    let each = (width / count as f64).floor();
    let mut widths = vec![each; count];
    widths[count - 1] = width - each * (count - 1) as f64;

    let shelves = (0..shelves.max(1))
        .map(|_| Shelf::with_partitions(params.default_shelf_height, &widths))
        .collect();
    Cabinet::with_shelves(width, height, shelves)
}
