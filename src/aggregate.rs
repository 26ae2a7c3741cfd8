use crate::core::ProbeSet;

/// Summary statistics over one probe run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    /// Games probed, resolved or not
    pub total: usize,
    pub compatible: usize,
    pub incompatible: usize,
    pub unresolved: usize,
    /// Sorted ascending, case-sensitive
    pub compatible_names: Vec<String>,
    /// Sorted ascending, case-sensitive
    pub incompatible_names: Vec<String>,
}

impl Aggregate {
    /// Share of compatible games in `[0, 1]`, `None` when nothing was probed
    pub fn compatible_ratio(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.compatible as f64 / self.total as f64)
        }
    }
}

/// Partition the probe results and count them.
pub fn aggregate(probes: &ProbeSet) -> Aggregate {
    let (compatible, incompatible): (Vec<_>, Vec<_>) =
        probes.resolved.iter().partition(|game| game.compatible);

    let mut compatible_names: Vec<String> = compatible.iter().map(|g| g.name.clone()).collect();
    let mut incompatible_names: Vec<String> = incompatible.iter().map(|g| g.name.clone()).collect();
    compatible_names.sort();
    incompatible_names.sort();

    Aggregate {
        total: probes.len(),
        compatible: compatible_names.len(),
        incompatible: incompatible_names.len(),
        unresolved: probes.unresolved.len(),
        compatible_names,
        incompatible_names,
    }
}
