// Fixed 3x3 integer kernels.

/// Discrete Laplacian, approximates the second derivative of intensity.
pub const LAPLACIAN: Kernel3X3 = Kernel3X3::new([
    [-1, -1, -1], //
    [-1, 8, -1],  //
    [-1, -1, -1], //
]);

/// Weights indexed `[dy + 1][dx + 1]` for offsets in `-1..=1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Kernel3X3 {
    m: [[i32; 3]; 3],
}

impl Kernel3X3 {
    pub const fn new(m: [[i32; 3]; 3]) -> Self {
        Self { m }
    }

    pub fn weight(&self, dx: isize, dy: isize) -> i32 {
        self.m[(dy + 1) as usize][(dx + 1) as usize]
    }

    #[cfg(test)]
    pub(crate) fn sum(&self) -> i32 {
        self.m.iter().flatten().sum()
    }
}
