// .piv record reader/writer: named 2D f64 arrays in one little-endian file.

use std::fs;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::info;

use crate::error::{AnalysisError, Result};
use crate::field::Field2;
use crate::grid::Grid;
use crate::phase::InterfaceCurve;

const PIV_MAGIC: &[u8; 4] = b"PIV\0";
const PIV_VERSION: u32 = 1;
const FIELD_NAME_ENTRY_SIZE: usize = 16;
/// Upper bound on values reserved up front; larger fields grow as they are read.
const PREALLOC_VALUES: usize = 1 << 20;

/// Names every record must carry.
pub const REQUIRED_FIELDS: [&str; 6] = ["x", "y", "u", "v", "xit", "yit"];

/// Decoded measurement record: named arrays in file order.
#[derive(Debug, Clone, Default)]
pub struct PivRecord {
    pub fields: Vec<(String, Field2)>,
}

impl PivRecord {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut file = BufReader::new(fs::File::open(path)?);
        let record = read_record(&mut file)?;
        info!("loaded {} ({} fields)", path.display(), record.fields.len());
        Ok(record)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = BufWriter::new(fs::File::create(path)?);
        write_record(&mut file, self)?;
        file.flush()?;
        Ok(())
    }

    pub fn insert(&mut self, name: &str, field: Field2) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = field,
            None => self.fields.push((name.to_string(), field)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Field2> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    fn take(&mut self, name: &'static str) -> Result<Field2> {
        let pos = self
            .fields
            .iter()
            .position(|(n, _)| n == name)
            .ok_or(AnalysisError::MissingField(name))?;
        Ok(self.fields.swap_remove(pos).1)
    }

    /// Split into the grid (unvalidated) and the interface curve.
    pub fn into_parts(mut self) -> Result<(Grid, InterfaceCurve)> {
        for name in REQUIRED_FIELDS {
            if self.get(name).is_none() {
                return Err(AnalysisError::MissingField(name));
            }
        }
        let x = self.take("x")?;
        let y = self.take("y")?;
        let u = self.take("u")?;
        let v = self.take("v")?;
        let curve = InterfaceCurve::new(&self.take("xit")?, &self.take("yit")?)?;
        Ok((Grid::new(x, y, u, v)?, curve))
    }
}

fn read_u32<R: Read>(r: &mut R) -> io::Result<u32> {
    let mut buf4 = [0u8; 4];
    r.read_exact(&mut buf4)?;
    Ok(u32::from_le_bytes(buf4))
}

pub fn read_record<R: Read>(r: &mut R) -> Result<PivRecord> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if &magic != PIV_MAGIC {
        return Err(AnalysisError::Format(format!("invalid PIV magic: {:?}", magic)));
    }

    let version = read_u32(r)?;
    if version != PIV_VERSION {
        return Err(AnalysisError::Format(format!("unsupported PIV version: {}", version)));
    }

    let field_count = read_u32(r)? as usize;
    let mut fields = Vec::new();
    let mut buf8 = [0u8; 8];
    for _ in 0..field_count {
        let mut entry = [0u8; FIELD_NAME_ENTRY_SIZE];
        r.read_exact(&mut entry)?;
        let len = entry[0] as usize;
        if len >= FIELD_NAME_ENTRY_SIZE {
            return Err(AnalysisError::Format(format!("field name length {} too long", len)));
        }
        let name = std::str::from_utf8(&entry[1..1 + len])
            .map_err(|e| AnalysisError::Format(e.to_string()))?
            .to_string();

        let rows = read_u32(r)? as usize;
        let cols = read_u32(r)? as usize;
        let count = rows
            .checked_mul(cols)
            .filter(|&n| n <= isize::MAX as usize / 8)
            .ok_or_else(|| {
                AnalysisError::Format(format!("field `{}` size {}x{} too large", name, rows, cols))
            })?;
        let mut data = Vec::with_capacity(count.min(PREALLOC_VALUES));
        for _ in 0..count {
            r.read_exact(&mut buf8)?;
            data.push(f64::from_le_bytes(buf8));
        }
        fields.push((name, Field2::new(rows, cols, data)?));
    }

    Ok(PivRecord { fields })
}

pub fn write_record<W: Write>(w: &mut W, record: &PivRecord) -> Result<()> {
    w.write_all(PIV_MAGIC)?;
    w.write_all(&PIV_VERSION.to_le_bytes())?;
    w.write_all(&(record.fields.len() as u32).to_le_bytes())?;
    for (name, field) in &record.fields {
        let bytes = name.as_bytes();
        if bytes.len() >= FIELD_NAME_ENTRY_SIZE {
            return Err(AnalysisError::Format(format!("field name `{}` too long", name)));
        }
        let mut entry = [0u8; FIELD_NAME_ENTRY_SIZE];
        entry[0] = bytes.len() as u8;
        entry[1..1 + bytes.len()].copy_from_slice(bytes);
        w.write_all(&entry)?;
        w.write_all(&(field.ny() as u32).to_le_bytes())?;
        w.write_all(&(field.nx() as u32).to_le_bytes())?;
        for val in field.data() {
            w.write_all(&val.to_le_bytes())?;
        }
    }
    Ok(())
}
