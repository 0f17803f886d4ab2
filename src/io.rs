use std::io::{self, Read, Write};

use crate::db::Database;
use crate::error::Error;
use crate::matrix::Matrix;

/// Write a matrix to a binary stream: `i32` rows, `i32` cols
/// (little-endian), then the elements as `f64` in column-major order.
/// The shape header always precedes the element data.
pub fn write_matrix<W : Write>(w : &mut W, m : &Matrix) -> Result<(), Error> {
    w.write_all(&(m.rows() as i32).to_le_bytes())?;
    w.write_all(&(m.cols() as i32).to_le_bytes())?;
    for v in m.as_slice() {
        w.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

/// Read a matrix written by [`write_matrix`].
pub fn read_matrix<R : Read>(r : &mut R) -> Result<Matrix, Error> {
    let mut header = [0u8; 4];
    r.read_exact(&mut header)?;
    let rows = i32::from_le_bytes(header);
    r.read_exact(&mut header)?;
    let cols = i32::from_le_bytes(header);
    if rows < 0 || cols < 0 {
        return Err(Error::Io(io::Error::new(io::ErrorKind::InvalidData, "negative matrix shape")));
    }
    let (rows, cols) = (rows as usize, cols as usize);

    let mut data = Vec::with_capacity(rows * cols);
    let mut elem = [0u8; 8];
    for _ in 0..rows * cols {
        r.read_exact(&mut elem)?;
        data.push(f64::from_le_bytes(elem));
    }
    Ok(Matrix::from_vec(rows, cols, data))
}

impl Database {

    /// Persist the full database (entries, mean, bases, projections) as
    /// JSON. Matrix shape fields precede element data by field order.
    pub fn save<W : Write>(&self, writer : W) -> Result<(), Error> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn load<R : Read>(reader : R) -> Result<Database, Error> {
        Ok(serde_json::from_reader(reader)?)
    }

}
