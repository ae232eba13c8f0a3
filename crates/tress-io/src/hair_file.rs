//! The `HAIR` binary strand format.
//!
//! ```text
//! offset  size  field
//!      0     4  signature "HAIR"
//!      4     4  u32 strand count
//!      8     4  u32 point count
//!     12     4  u32 arrays bitmask
//!     16     4  u32 default segments per strand
//!     20     4  f32 default thickness
//!     24     4  f32 default transparency
//!     28    12  f32[3] default color
//!     40    88  info (free text, NUL padded)
//!    128        arrays, in bit order, each present only if its bit is set
//! ```
//!
//! | bit | array | element | count |
//! |---|---|---|---|
//! | 1 | segments | u16 | strand count |
//! | 2 | points | f32 × 3 | point count |
//! | 4 | thickness | f32 | point count |
//! | 8 | transparency | f32 | point count |
//! | 16 | colors | f32 × 3 | point count |
//!
//! All values are little-endian. Strand `i` has `segments[i]` segments
//! (or the default when the segments array is absent) and therefore
//! `segments[i] + 1` points. Unknown bits and any bytes following the
//! known arrays are kept and written back unchanged.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tress_math::DVec3;
use tress_types::{TressError, TressResult};

/// File signature.
pub const SIGNATURE: [u8; 4] = *b"HAIR";

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 128;

/// Size of the free-text info field.
pub const INFO_SIZE: usize = 88;

pub const SEGMENTS_BIT: u32 = 1;
pub const POINTS_BIT: u32 = 2;
pub const THICKNESS_BIT: u32 = 4;
pub const TRANSPARENCY_BIT: u32 = 8;
pub const COLORS_BIT: u32 = 16;

/// Bits this implementation reads and writes.
pub const KNOWN_BITS: u32 = SEGMENTS_BIT | POINTS_BIT | THICKNESS_BIT | TRANSPARENCY_BIT | COLORS_BIT;

/// The fixed 128-byte header.
#[derive(Debug, Clone, PartialEq)]
pub struct HairHeader {
    pub strand_count: u32,
    pub point_count: u32,
    /// Bitmask of the arrays present in the file.
    pub arrays: u32,
    pub default_segments: u32,
    pub default_thickness: f32,
    pub default_transparency: f32,
    pub default_color: [f32; 3],
    pub info: [u8; INFO_SIZE],
}

impl Default for HairHeader {
    fn default() -> Self {
        Self {
            strand_count: 0,
            point_count: 0,
            arrays: 0,
            default_segments: 0,
            default_thickness: 1.0,
            default_transparency: 0.0,
            default_color: [1.0, 1.0, 1.0],
            info: [0; INFO_SIZE],
        }
    }
}

impl HairHeader {
    /// True when the array for `bit` is present.
    #[inline]
    pub fn has(&self, bit: u32) -> bool {
        self.arrays & bit != 0
    }

    /// The info field up to the first NUL, lossily decoded.
    pub fn info_text(&self) -> String {
        let end = self.info.iter().position(|&b| b == 0).unwrap_or(INFO_SIZE);
        String::from_utf8_lossy(&self.info[..end]).into_owned()
    }

    /// Replaces the info field, truncating to 88 bytes.
    pub fn set_info_text(&mut self, text: &str) {
        self.info = [0; INFO_SIZE];
        let bytes = text.as_bytes();
        let n = bytes.len().min(INFO_SIZE);
        self.info[..n].copy_from_slice(&bytes[..n]);
    }
}

/// A loaded `HAIR` file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HairFile {
    header: HairHeader,
    segments: Vec<u16>,
    points: Vec<f32>,
    thickness: Vec<f32>,
    transparency: Vec<f32>,
    colors: Vec<f32>,
    trailing: Vec<u8>,
}

impl HairFile {
    /// Builds a file holding the given strands (segments and points arrays).
    pub fn from_strands(strands: &[Vec<DVec3>]) -> TressResult<Self> {
        let mut file = Self::default();
        file.set_positions(strands)?;
        Ok(file)
    }

    // ─── Accessors ───────────────────────────────────────────

    #[inline]
    pub fn header(&self) -> &HairHeader {
        &self.header
    }

    #[inline]
    pub fn header_mut(&mut self) -> &mut HairHeader {
        &mut self.header
    }

    #[inline]
    pub fn strand_count(&self) -> usize {
        self.header.strand_count as usize
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.header.point_count as usize
    }

    /// Per-strand segment counts from the file (empty if absent).
    #[inline]
    pub fn segments(&self) -> &[u16] {
        &self.segments
    }

    /// Flat point coordinates `[x0, y0, z0, ...]`.
    #[inline]
    pub fn points(&self) -> &[f32] {
        &self.points
    }

    #[inline]
    pub fn thickness(&self) -> &[f32] {
        &self.thickness
    }

    #[inline]
    pub fn transparency(&self) -> &[f32] {
        &self.transparency
    }

    #[inline]
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Segment count of every strand, falling back to the header default.
    pub fn segment_counts(&self) -> Vec<usize> {
        if self.header.has(SEGMENTS_BIT) {
            self.segments.iter().map(|&s| s as usize).collect()
        } else {
            vec![self.header.default_segments as usize; self.strand_count()]
        }
    }

    /// Splits the point array into strands.
    pub fn strands(&self) -> TressResult<Vec<Vec<DVec3>>> {
        if !self.header.has(POINTS_BIT) {
            return Err(TressError::InvalidHairFile("File has no points array".into()));
        }
        let counts = self.segment_counts();
        let needed: usize = counts.iter().map(|s| s + 1).sum();
        if needed != self.point_count() {
            return Err(TressError::InvalidHairFile(format!(
                "Segments describe {needed} points, header has {}",
                self.point_count()
            )));
        }
        if self.points.len() < 3 * needed {
            return Err(TressError::InvalidHairFile(format!(
                "Points array holds {} values, {} needed",
                self.points.len(),
                3 * needed
            )));
        }

        let mut strands = Vec::with_capacity(counts.len());
        let mut offset = 0;
        for segments in counts {
            let end = offset + segments + 1;
            let strand = self.points[3 * offset..3 * end]
                .chunks_exact(3)
                .map(|p| DVec3::new(p[0] as f64, p[1] as f64, p[2] as f64))
                .collect();
            strands.push(strand);
            offset = end;
        }
        Ok(strands)
    }

    /// Writes simulated positions back into the file (f64 → f32).
    ///
    /// When the strand layout changes (e.g. after resampling) the segments
    /// array is rewritten and per-point attribute arrays are dropped.
    pub fn set_positions(&mut self, strands: &[Vec<DVec3>]) -> TressResult<()> {
        let mut segments = Vec::with_capacity(strands.len());
        for (i, strand) in strands.iter().enumerate() {
            let count = strand.len().checked_sub(1).filter(|&s| s > 0).ok_or_else(|| {
                TressError::InvalidStrand(format!("Strand {i} needs at least 2 points"))
            })?;
            let count = u16::try_from(count).map_err(|_| {
                TressError::InvalidStrand(format!("Strand {i} has {count} segments, format limit is {}", u16::MAX))
            })?;
            segments.push(count);
        }
        let point_count: usize = strands.iter().map(Vec::len).sum();
        let point_count = u32::try_from(point_count)
            .map_err(|_| TressError::InvalidStrand(format!("{point_count} points exceed the format limit")))?;

        let same_layout = self.header.has(POINTS_BIT) && self.segment_counts() == segments.iter().map(|&s| s as usize).collect::<Vec<_>>();
        if !same_layout {
            if self.header.arrays & (THICKNESS_BIT | TRANSPARENCY_BIT | COLORS_BIT) != 0 {
                tracing::debug!("Strand layout changed; dropping per-point attributes");
            }
            self.header.arrays &= !(THICKNESS_BIT | TRANSPARENCY_BIT | COLORS_BIT);
            self.thickness.clear();
            self.transparency.clear();
            self.colors.clear();
            self.header.arrays |= SEGMENTS_BIT;
            self.header.strand_count = strands.len() as u32;
            self.header.point_count = point_count;
            self.segments = segments;
        }

        self.header.arrays |= POINTS_BIT;
        self.points = strands
            .iter()
            .flatten()
            .flat_map(|p| [p.x as f32, p.y as f32, p.z as f32])
            .collect();
        Ok(())
    }

    /// Sets the per-point thickness array (one value per point).
    pub fn set_thickness(&mut self, values: Vec<f32>) -> TressResult<()> {
        self.check_len("thickness", values.len(), self.point_count())?;
        self.thickness = values;
        self.header.arrays |= THICKNESS_BIT;
        Ok(())
    }

    /// Sets the per-point transparency array (one value per point).
    pub fn set_transparency(&mut self, values: Vec<f32>) -> TressResult<()> {
        self.check_len("transparency", values.len(), self.point_count())?;
        self.transparency = values;
        self.header.arrays |= TRANSPARENCY_BIT;
        Ok(())
    }

    /// Sets the per-point color array (flat RGB, three values per point).
    pub fn set_colors(&mut self, values: Vec<f32>) -> TressResult<()> {
        self.check_len("colors", values.len(), 3 * self.point_count())?;
        self.colors = values;
        self.header.arrays |= COLORS_BIT;
        Ok(())
    }

    /// Checks every flagged array against the header counts.
    pub fn check_arrays(&self) -> TressResult<()> {
        let h = &self.header;
        let strands = self.strand_count();
        let points = self.point_count();
        if h.has(SEGMENTS_BIT) {
            self.check_len("segments", self.segments.len(), strands)?;
        }
        for (bit, name, len, expected) in [
            (POINTS_BIT, "points", self.points.len(), 3 * points),
            (THICKNESS_BIT, "thickness", self.thickness.len(), points),
            (TRANSPARENCY_BIT, "transparency", self.transparency.len(), points),
            (COLORS_BIT, "colors", self.colors.len(), 3 * points),
        ] {
            if h.has(bit) {
                self.check_len(name, len, expected)?;
            }
        }
        Ok(())
    }

    fn check_len(&self, name: &str, len: usize, expected: usize) -> TressResult<()> {
        if len != expected {
            return Err(TressError::InvalidHairFile(format!(
                "The {name} array holds {len} values, header counts need {expected}"
            )));
        }
        Ok(())
    }

    /// Printable description of the header.
    pub fn summary(&self) -> String {
        let h = &self.header;
        let mut out = String::new();
        let _ = writeln!(out, "Signature: HAIR");
        let _ = writeln!(out, "Strand count: {}", h.strand_count);
        let _ = writeln!(out, "Point count: {}", h.point_count);
        let _ = writeln!(out, "Arrays: {:#07b}{}", h.arrays, array_names(h.arrays));
        let _ = writeln!(out, "Default segments: {}", h.default_segments);
        let _ = writeln!(out, "Default thickness: {}", h.default_thickness);
        let _ = writeln!(out, "Default transparency: {}", h.default_transparency);
        let [r, g, b] = h.default_color;
        let _ = writeln!(out, "Default color: ({r}, {g}, {b})");
        let _ = write!(out, "Info: {}", h.info_text());
        out
    }

    // ─── Binary I/O ──────────────────────────────────────────

    /// Parses a file from memory.
    pub fn read_from(data: &[u8]) -> TressResult<Self> {
        let mut reader = ByteReader::new(data);
        let signature = reader.take("header", 4)?;
        if signature != SIGNATURE {
            return Err(TressError::InvalidHairFile(format!(
                "Invalid signature {:?}, expected \"HAIR\"",
                String::from_utf8_lossy(signature)
            )));
        }
        if data.len() < HEADER_SIZE {
            return Err(TressError::TruncatedHairFile {
                section: "header",
                expected: HEADER_SIZE,
                available: data.len(),
            });
        }

        let mut header = HairHeader {
            strand_count: reader.read_u32("header")?,
            point_count: reader.read_u32("header")?,
            arrays: reader.read_u32("header")?,
            default_segments: reader.read_u32("header")?,
            default_thickness: reader.read_f32("header")?,
            default_transparency: reader.read_f32("header")?,
            ..HairHeader::default()
        };
        for c in header.default_color.iter_mut() {
            *c = reader.read_f32("header")?;
        }
        header.info.copy_from_slice(reader.take("header", INFO_SIZE)?);

        let strands = header.strand_count as usize;
        let points = header.point_count as usize;
        let mut file = Self {
            header,
            ..Self::default()
        };
        if file.header.has(SEGMENTS_BIT) {
            file.segments = reader.read_u16_array("segments", strands)?;
        }
        if file.header.has(POINTS_BIT) {
            file.points = reader.read_f32_array("points", points * 3)?;
        }
        if file.header.has(THICKNESS_BIT) {
            file.thickness = reader.read_f32_array("thickness", points)?;
        }
        if file.header.has(TRANSPARENCY_BIT) {
            file.transparency = reader.read_f32_array("transparency", points)?;
        }
        if file.header.has(COLORS_BIT) {
            file.colors = reader.read_f32_array("colors", points * 3)?;
        }
        file.trailing = reader.rest().to_vec();
        if !file.trailing.is_empty() {
            tracing::debug!(bytes = file.trailing.len(), "Keeping trailing bytes after known arrays");
        }
        Ok(file)
    }

    /// Reads a file from disk.
    pub fn load(path: impl AsRef<Path>) -> TressResult<Self> {
        Self::read_from(&fs::read(path)?)
    }

    /// Serializes the header and every flagged array.
    ///
    /// Fails when a flagged array does not match the header counts, so a
    /// written file always parses back.
    pub fn to_bytes(&self) -> TressResult<Vec<u8>> {
        self.check_arrays()?;
        let h = &self.header;
        let mut out = Vec::with_capacity(HEADER_SIZE + 4 * self.points.len() + self.trailing.len());
        out.extend_from_slice(&SIGNATURE);
        for v in [h.strand_count, h.point_count, h.arrays, h.default_segments] {
            out.extend_from_slice(&v.to_le_bytes());
        }
        for v in [h.default_thickness, h.default_transparency] {
            out.extend_from_slice(&v.to_le_bytes());
        }
        for v in h.default_color {
            out.extend_from_slice(&v.to_le_bytes());
        }
        out.extend_from_slice(&h.info);

        if h.has(SEGMENTS_BIT) {
            for s in &self.segments {
                out.extend_from_slice(&s.to_le_bytes());
            }
        }
        for (bit, array) in [
            (POINTS_BIT, &self.points),
            (THICKNESS_BIT, &self.thickness),
            (TRANSPARENCY_BIT, &self.transparency),
            (COLORS_BIT, &self.colors),
        ] {
            if h.has(bit) {
                for v in array {
                    out.extend_from_slice(&v.to_le_bytes());
                }
            }
        }
        out.extend_from_slice(&self.trailing);
        Ok(out)
    }

    /// Writes the file to disk.
    pub fn save(&self, path: impl AsRef<Path>) -> TressResult<()> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

fn array_names(arrays: u32) -> String {
    let names: Vec<&str> = [
        (SEGMENTS_BIT, "segments"),
        (POINTS_BIT, "points"),
        (THICKNESS_BIT, "thickness"),
        (TRANSPARENCY_BIT, "transparency"),
        (COLORS_BIT, "colors"),
    ]
    .into_iter()
    .filter(|(bit, _)| arrays & bit != 0)
    .map(|(_, name)| name)
    .collect();
    let unknown = arrays & !KNOWN_BITS;
    match (names.is_empty(), unknown) {
        (true, 0) => String::new(),
        (_, 0) => format!(" ({})", names.join(", ")),
        _ => format!(" ({}; unknown {unknown:#x})", names.join(", ")),
    }
}

/// Cursor over a byte slice with section-tagged bounds checks.
struct ByteReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    fn take(&mut self, section: &'static str, len: usize) -> TressResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(TressError::TruncatedHairFile {
                section,
                expected: len,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(bytes)
    }

    fn read_u32(&mut self, section: &'static str) -> TressResult<u32> {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(self.take(section, 4)?);
        Ok(u32::from_le_bytes(bytes))
    }

    fn read_f32(&mut self, section: &'static str) -> TressResult<f32> {
        Ok(f32::from_bits(self.read_u32(section)?))
    }

    fn read_u16_array(&mut self, section: &'static str, count: usize) -> TressResult<Vec<u16>> {
        let bytes = self.take(section, count.saturating_mul(2))?;
        Ok(bytes
            .chunks_exact(2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]))
            .collect())
    }

    fn read_f32_array(&mut self, section: &'static str, count: usize) -> TressResult<Vec<f32>> {
        let bytes = self.take(section, count.saturating_mul(4))?;
        Ok(bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect())
    }

    fn rest(&mut self) -> &'a [u8] {
        let rest = &self.data[self.position..];
        self.position = self.data.len();
        rest
    }
}
