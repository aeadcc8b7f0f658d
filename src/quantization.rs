
//! Quantization tables, and the lossy quantize and dequantize steps.
//!
//! Quantization divides each transform coefficient by the table entry at its position
//! and rounds the quotient to an integer level. Dequantization multiplies the level
//! by the same entry. The fractional part discarded by rounding is
//! the dominant source of reconstruction error.

use crate::block::{Block, BLOCK_SAMPLE_COUNT, BLOCK_SIZE};
use crate::error::{Error, Result, f32_to_i32, f32_to_finite};


/// The standard luminance table at quality 50.
pub const STANDARD_LUMA: [u16; BLOCK_SAMPLE_COUNT] = [
    16, 11, 10, 16, 24, 40, 51, 61,
    12, 12, 14, 19, 26, 58, 60, 55,
    14, 13, 16, 24, 40, 57, 69, 56,
    14, 17, 22, 29, 51, 87, 80, 62,
    18, 22, 37, 56, 68, 109, 103, 77,
    24, 35, 55, 64, 81, 104, 113, 92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103, 99,
];

/// The standard chrominance table at quality 50.
pub const STANDARD_CHROMA: [u16; BLOCK_SAMPLE_COUNT] = [
    17, 18, 24, 47, 99, 99, 99, 99,
    18, 21, 26, 66, 99, 99, 99, 99,
    24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
];


/// How the quotient of coefficient and table entry is rounded to a quantization level.
/// The choice affects bit-exact reproducibility, so it is part of the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rounding {

    /// Round to the nearest integer, and ties to the nearest even integer.
    /// `2.5` becomes `2.0`, `3.5` becomes `4.0`.
    #[default]
    TiesToEven,

    /// Round to the nearest integer, and ties away from zero.
    /// `2.5` becomes `3.0`, `-2.5` becomes `-3.0`.
    TiesAwayFromZero,

    /// Do not round at all. Dequantization then restores the exact coefficients,
    /// which makes the whole round trip lossless apart from floating point error.
    Disabled,
}

impl Rounding {

    /// Round the quotient according to this policy.
    #[inline]
    pub fn apply(self, quotient: f32) -> f32 {
        match self {
            Rounding::TiesToEven => quotient.round_ties_even(),
            Rounding::TiesAwayFromZero => quotient.round(),
            Rounding::Disabled => quotient,
        }
    }
}


/// An 8×8 table of positive divisors, one per coefficient position, stored row-major.
/// Every entry is guaranteed to be at least one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuantizationTable {
    entries: [u16; BLOCK_SAMPLE_COUNT],
}

/// The class of a channel, which selects its quantization table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelClass {

    /// The brightness channel.
    Luma,

    /// A color difference channel.
    Chroma,
}

/// One table per channel class.
/// Created once and then shared by reference between all channel computations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuantizationTables {

    /// Used for luma channels.
    pub luma: QuantizationTable,

    /// Used for chroma channels.
    pub chroma: QuantizationTable,
}


impl QuantizationTable {

    /// Validate and store 64 row-major entries.
    /// Returns a configuration error if any entry is not positive,
    /// does not fit into 16 bits, or if there are not exactly 64 entries.
    pub fn new(entries: &[i32]) -> Result<Self> {
        if entries.len() != BLOCK_SAMPLE_COUNT {
            return Err(Error::configuration(format!(
                "quantization table must have {} entries, but has {}",
                BLOCK_SAMPLE_COUNT, entries.len()
            )));
        }

        let mut validated = [0_u16; BLOCK_SAMPLE_COUNT];
        for (index, (target, &entry)) in validated.iter_mut().zip(entries).enumerate() {
            if entry <= 0 {
                return Err(Error::configuration(format!(
                    "quantization table entry {} at row {}, column {} is not positive",
                    entry, index / BLOCK_SIZE, index % BLOCK_SIZE
                )));
            }

            *target = u16::try_from(entry).map_err(|_| Error::configuration(
                "quantization table entry does not fit into 16 bits"
            ))?;
        }

        Ok(QuantizationTable { entries: validated })
    }

    /// The standard luminance table.
    pub fn standard_luma() -> Self {
        QuantizationTable { entries: STANDARD_LUMA }
    }

    /// The standard chrominance table.
    pub fn standard_chroma() -> Self {
        QuantizationTable { entries: STANDARD_CHROMA }
    }

    /// A table where every entry is one.
    /// With rounding disabled, the round trip reproduces its input.
    pub fn ones() -> Self {
        QuantizationTable { entries: [1; BLOCK_SAMPLE_COUNT] }
    }

    /// Scale the base table by a quality factor in `1 ..= 100`.
    /// Quality 50 leaves the base table unchanged (if no entry exceeds 255),
    /// quality 100 produces a table of ones, lower quality produces larger divisors.
    /// Entries are clamped to `1 ..= 255`.
    pub fn with_quality(base: &QuantizationTable, quality: u8) -> Result<Self> {
        let scale = quality_to_scale_factor(quality)?;

        let mut entries = [0_u16; BLOCK_SAMPLE_COUNT];
        for (target, &base) in entries.iter_mut().zip(base.entries.iter()) {
            let scaled = (u32::from(base) * scale + 50) / 100;
            *target = scaled.clamp(1, 255) as u16;
        }

        Ok(QuantizationTable { entries })
    }

    /// All 64 entries, row after row.
    pub fn entries(&self) -> &[u16; BLOCK_SAMPLE_COUNT] {
        &self.entries
    }

    /// The divisor for the coefficient in the specified row and column.
    pub fn get(&self, row: usize, column: usize) -> u16 {
        self.entries[row * BLOCK_SIZE + column]
    }

    /// Divide each coefficient by its table entry and round the quotient.
    /// Returns a numeric range error instead of producing a level that is not finite,
    /// or, when rounding, a level that an `i32` cannot hold.
    pub fn quantize(&self, coefficients: &Block, rounding: Rounding) -> Result<Block> {
        let mut levels = [0.0_f32; BLOCK_SAMPLE_COUNT];

        for ((level, &coefficient), &divisor) in levels.iter_mut().zip(coefficients).zip(&self.entries) {
            let quotient = rounding.apply(coefficient / f32::from(divisor));

            *level = match rounding {
                Rounding::Disabled => f32_to_finite(quotient, "quantized coefficient is not finite")?,
                _ => f32_to_i32(quotient, "quantized coefficient does not fit into 32 bits")? as f32,
            };
        }

        Ok(levels)
    }

    /// Multiply each quantization level by its table entry.
    pub fn dequantize(&self, levels: &Block) -> Block {
        let mut coefficients = [0.0_f32; BLOCK_SAMPLE_COUNT];

        for ((coefficient, &level), &divisor) in coefficients.iter_mut().zip(levels).zip(&self.entries) {
            *coefficient = level * f32::from(divisor);
        }

        coefficients
    }
}

impl Default for QuantizationTable {
    fn default() -> Self { Self::standard_luma() }
}


impl QuantizationTables {

    /// The standard luminance and chrominance tables.
    pub fn standard() -> Self {
        QuantizationTables {
            luma: QuantizationTable::standard_luma(),
            chroma: QuantizationTable::standard_chroma(),
        }
    }

    /// Both standard tables, scaled by the same quality factor in `1 ..= 100`.
    pub fn with_quality(quality: u8) -> Result<Self> {
        Ok(QuantizationTables {
            luma: QuantizationTable::with_quality(&QuantizationTable::standard_luma(), quality)?,
            chroma: QuantizationTable::with_quality(&QuantizationTable::standard_chroma(), quality)?,
        })
    }

    /// The table used for channels of the specified class.
    pub fn get(&self, class: ChannelClass) -> &QuantizationTable {
        match class {
            ChannelClass::Luma => &self.luma,
            ChannelClass::Chroma => &self.chroma,
        }
    }
}

impl Default for QuantizationTables {
    fn default() -> Self { Self::standard() }
}


/// Convert a quality in `1 ..= 100` to a percentage that the base table is multiplied with.
/// Quality 50 is 100 percent.
fn quality_to_scale_factor(quality: u8) -> Result<u32> {
    match quality {
        1 ..= 49 => Ok(5000 / u32::from(quality)),
        50 ..= 100 => Ok(200 - 2 * u32::from(quality)),
        _ => Err(Error::configuration(format!("quality must be in 1 ..= 100, but is {}", quality))),
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rounding_policies() {
        assert_eq!(Rounding::TiesToEven.apply(2.5), 2.0);
        assert_eq!(Rounding::TiesToEven.apply(3.5), 4.0);
        assert_eq!(Rounding::TiesToEven.apply(-2.5), -2.0);
        assert_eq!(Rounding::TiesAwayFromZero.apply(2.5), 3.0);
        assert_eq!(Rounding::TiesAwayFromZero.apply(-2.5), -3.0);
        assert_eq!(Rounding::Disabled.apply(2.5), 2.5);
        assert_eq!(Rounding::default(), Rounding::TiesToEven);
    }

    #[test]
    fn zero_entry_is_rejected() {
        let mut entries = [1_i32; BLOCK_SAMPLE_COUNT];
        entries[37] = 0;

        assert!(matches!(QuantizationTable::new(&entries), Err(Error::Configuration(_))));
    }

    #[test]
    fn negative_and_too_large_entries_are_rejected() {
        let mut entries = [1_i32; BLOCK_SAMPLE_COUNT];
        entries[0] = -16;
        assert!(matches!(QuantizationTable::new(&entries), Err(Error::Configuration(_))));

        entries[0] = 70_000;
        assert!(matches!(QuantizationTable::new(&entries), Err(Error::Configuration(_))));
    }

    #[test]
    fn wrong_entry_count_is_rejected() {
        assert!(matches!(QuantizationTable::new(&[1; 63]), Err(Error::Configuration(_))));
        assert!(matches!(QuantizationTable::new(&[]), Err(Error::Configuration(_))));
    }

    #[test]
    fn valid_entries_are_kept() {
        let entries: Vec<i32> = STANDARD_LUMA.iter().map(|&entry| i32::from(entry)).collect();
        let table = QuantizationTable::new(&entries).unwrap();

        assert_eq!(table, QuantizationTable::standard_luma());
        assert_eq!(table.get(0, 0), 16);
        assert_eq!(table.get(7, 7), 99);
        assert_eq!(table.get(4, 5), 109);
    }

    #[test]
    fn standard_tables_are_positive() {
        assert!(STANDARD_LUMA.iter().all(|&entry| entry > 0));
        assert!(STANDARD_CHROMA.iter().all(|&entry| entry > 0));
    }

    #[test]
    fn quality_scaling() {
        let luma = QuantizationTable::standard_luma();

        assert_eq!(QuantizationTable::with_quality(&luma, 50).unwrap(), luma);
        assert_eq!(QuantizationTable::with_quality(&luma, 100).unwrap(), QuantizationTable::ones());

        // quality 25 doubles every entry
        let low = QuantizationTable::with_quality(&luma, 25).unwrap();
        assert_eq!(low.get(0, 0), 32);

        // quality 1 clamps everything to baseline range
        let lowest = QuantizationTable::with_quality(&luma, 1).unwrap();
        assert!(lowest.entries().iter().all(|&entry| entry == 255));

        // quality 75 halves every entry
        let high = QuantizationTable::with_quality(&luma, 75).unwrap();
        assert_eq!(high.get(0, 0), 8);
        assert_eq!(high.get(0, 1), 6); // 5.5 rounds up
    }

    #[test]
    fn invalid_quality_is_rejected() {
        assert!(matches!(QuantizationTables::with_quality(0), Err(Error::Configuration(_))));
        assert!(matches!(QuantizationTables::with_quality(101), Err(Error::Configuration(_))));
        assert_eq!(QuantizationTables::with_quality(50).unwrap(), QuantizationTables::standard());
    }

    #[test]
    fn tables_by_class() {
        let tables = QuantizationTables::standard();
        assert_eq!(tables.get(ChannelClass::Luma).get(0, 0), 16);
        assert_eq!(tables.get(ChannelClass::Chroma).get(0, 0), 17);
    }

    #[test]
    fn quantize_divides_and_rounds() {
        let table = QuantizationTable::standard_luma();

        let mut coefficients = [0.0_f32; BLOCK_SAMPLE_COUNT];
        coefficients[0] = 40.0; // 40 / 16 = 2.5
        coefficients[1] = -33.0; // -33 / 11 = -3
        coefficients[2] = 14.0; // 14 / 10 = 1.4

        let levels = table.quantize(&coefficients, Rounding::TiesToEven).unwrap();
        assert_eq!(&levels[..3], &[2.0, -3.0, 1.0]);
        assert!(levels[3..].iter().all(|&level| level == 0.0));

        let levels = table.quantize(&coefficients, Rounding::TiesAwayFromZero).unwrap();
        assert_eq!(levels[0], 3.0);

        let dequantized = table.dequantize(&levels);
        assert_eq!(&dequantized[..3], &[48.0, -33.0, 10.0]);
    }

    #[test]
    fn requantizing_is_idempotent() {
        let table = QuantizationTable::standard_chroma();

        let mut coefficients = [0.0_f32; BLOCK_SAMPLE_COUNT];
        for (index, coefficient) in coefficients.iter_mut().enumerate() {
            *coefficient = (index as f32 * 37.3).sin() * 900.0;
        }

        let once = table.dequantize(&table.quantize(&coefficients, Rounding::TiesToEven).unwrap());
        let twice = table.dequantize(&table.quantize(&once, Rounding::TiesToEven).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn huge_coefficients_are_rejected() {
        let table = QuantizationTable::ones();

        let mut coefficients = [0.0_f32; BLOCK_SAMPLE_COUNT];
        coefficients[5] = 1.0e12;
        assert!(matches!(table.quantize(&coefficients, Rounding::TiesToEven), Err(Error::NumericRange(_))));

        coefficients[5] = f32::NAN;
        assert!(matches!(table.quantize(&coefficients, Rounding::Disabled), Err(Error::NumericRange(_))));
    }
}
