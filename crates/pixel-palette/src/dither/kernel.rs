//! Error diffusion kernel definitions.

/// An error diffusion kernel.
///
/// The kernel defines how quantization error is distributed to neighboring
/// pixels that haven't been processed yet. Each entry specifies an offset
/// (dx, dy) and a weight for that neighbor.
///
/// The `max_dy` field indicates how many rows ahead the kernel reaches,
/// which determines the error buffer depth needed: `max_dy + 1` rows.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// (dx, dy, weight) entries; `dx` is flipped on reversed serpentine rows.
    pub entries: &'static [(i32, i32, u8)],

    /// Each neighbor receives `error * weight / divisor`.
    pub divisor: u8,

    pub max_dy: usize,
}

/// Floyd-Steinberg dithering kernel.
///
/// Distributes error to 4 neighbors with 100% total propagation (16/16).
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
    max_dy: 1,
};
