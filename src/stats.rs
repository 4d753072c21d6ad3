//! Occupancy statistics for inspecting table behavior.
//!
//! Only compiled for tests or with the `stats` feature.

use alloc::vec;
use alloc::vec::Vec;

/// Debug statistics for hash table analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugStats {
    /// Number of live entries
    pub populated: usize,
    /// Length of the backing array
    pub capacity: usize,
    /// Buckets holding at least one entry (chaining) or `Active` slots (open
    /// addressing)
    pub occupied_slots: usize,
    /// `Deleted` slots awaiting reclamation; always zero for chaining
    pub tombstones: usize,
    /// Largest probe distance or chain position of any live entry
    pub longest_probe: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Slot utilization (occupied_slots / capacity)
    pub slot_utilization: f64,
    /// Bytes held by the backing array, excluding chain nodes
    pub total_bytes: usize,
}

impl DebugStats {
    pub(crate) fn new(
        populated: usize,
        capacity: usize,
        occupied_slots: usize,
        tombstones: usize,
        longest_probe: usize,
        total_bytes: usize,
    ) -> Self {
        Self {
            populated,
            capacity,
            occupied_slots,
            tombstones,
            longest_probe,
            load_factor: ratio(populated, capacity),
            slot_utilization: ratio(occupied_slots, capacity),
            total_bytes,
        }
    }

    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Slot Usage: {}/{} ({:.2}% utilization)",
            self.occupied_slots,
            self.capacity,
            self.slot_utilization * 100.0
        );
        println!("Tombstones: {}", self.tombstones);
        println!("Longest probe: {}", self.longest_probe);
        println!("Total Allocated: {} bytes", self.total_bytes);
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Count of live entries per probe distance.
///
/// Index `i` holds the number of entries found `i` steps away from their
/// home bucket: the slot offset for open addressing, or the position in the
/// chain for chaining.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeHistogram {
    bins: Vec<usize>,
}

impl ProbeHistogram {
    pub(crate) fn record(&mut self, distance: usize) {
        if self.bins.len() <= distance {
            self.bins.resize(distance + 1, 0);
        }
        self.bins[distance] += 1;
    }

    /// Per-distance counts.
    pub fn bins(&self) -> &[usize] {
        &self.bins
    }

    /// Total number of recorded entries.
    pub fn total(&self) -> usize {
        self.bins.iter().sum()
    }

    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.bins.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!("probe histogram ({} entries):", self.total());

        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let full = units / 8;
            let rem = units % 8;
            let mut bar = "█".repeat(full);
            if rem > 0 {
                let ch = match rem {
                    1 => '▏',
                    2 => '▎',
                    3 => '▍',
                    4 => '▌',
                    5 => '▋',
                    6 => '▊',
                    _ => '▉',
                };
                bar.push(ch);
            }
            bar
        };

        for (i, &count) in self.bins.iter().enumerate() {
            println!("{:>3} | {} ({})", i, make_bar(count), count);
        }
    }
}

impl From<ProbeHistogram> for Vec<usize> {
    fn from(histogram: ProbeHistogram) -> Self {
        histogram.bins
    }
}

impl FromIterator<usize> for ProbeHistogram {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut histogram = ProbeHistogram { bins: vec![] };
        for distance in iter {
            histogram.record(distance);
        }
        histogram
    }
}
