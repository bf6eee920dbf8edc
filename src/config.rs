#[cfg(feature = "1d")]
pub const NUM_DIMENSIONS: usize = 1;
#[cfg(all(feature = "2d", not(feature = "1d")))]
pub const NUM_DIMENSIONS: usize = 2;
#[cfg(not(any(feature = "1d", feature = "2d")))]
pub const NUM_DIMENSIONS: usize = 3;

pub const TWO_TO_NUM_DIMENSIONS: usize = 2usize.pow(NUM_DIMENSIONS as u32);
