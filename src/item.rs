//! The wave item triple (spec.md §3 Data Model).

/// One admitted increment: the position it was admitted at, its value, and
/// the running total immediately after it (both `pos` and `z` taken modulo
/// the wave's modulus `M`; see spec.md §4.5).
///
/// Carries its own level-queue index (`level`) so expiration never has to
/// re-derive which `l[j]` it occupies (spec.md §9 Design Notes item 1) —
/// the level formula is not well-defined on `(z, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveItem {
    pub pos: i64,
    pub v: i64,
    pub z: i64,
    pub level: usize,
}
