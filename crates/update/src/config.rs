/// Settings for one update pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpdateConfig {
    /// Coalesce sibling text nodes that become adjacent.
    pub merge_adjacent_text: bool,
    /// Run `table::invariants::check_with` after the pass. Adjacent text
    /// siblings only count as a violation when `merge_adjacent_text` is set.
    pub verify_invariants: bool,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            merge_adjacent_text: true,
            verify_invariants: cfg!(debug_assertions),
        }
    }
}
