//! Supports reading and writing DH tables as CSV.
//!
//! The table has a header row followed by one row per active joint:
//!
//! ```text
//! Joint,theta in rad,d in m,a in m,alpha in rad,Min,Max,Type
//! 1,0,0.089459,0,pi/2,-pi,+pi,Rotation
//! 2,0,0,-0.425,0,-pi,+pi,Rotation
//! ```
//!
//! Numeric fields may be expressions (see [parse_input](crate::expression::parse_input)).
//! Reading stops at the first row whose type is neither `Rotation` nor `Translation`,
//! the remaining joints of the chain are then disabled.

use tracing::warn;
use crate::chain::{build_chain, Chain};
use crate::parameter_error::ParameterError;
use crate::parameters::dh_kinematics::{JointKind, RawJoint, MAX_JOINTS};

/// Column titles written by [encode].
pub const HEADER: [&str; 8] = [
    "Joint",
    "theta in rad",
    "d in m",
    "a in m",
    "alpha in rad",
    "Min",
    "Max",
    "Type",
];

/// Builds the chain from table rows (header included). The header only needs to have
/// eight columns, its titles are not checked.
pub fn decode<S: AsRef<str>>(rows: &[Vec<S>]) -> Result<Chain, ParameterError> {
    if rows.len() < 2 || rows[0].len() != HEADER.len() {
        return Err(ParameterError::parse(
            &summary(rows),
            "DH table needs an 8 column header and at least one joint row",
        ));
    }

    let mut raw = Vec::with_capacity(MAX_JOINTS);
    for (line, row) in rows.iter().enumerate().skip(1).take(MAX_JOINTS) {
        let field = |i: usize| row.get(i).map(|s| s.as_ref().trim());
        let kind = match field(7) {
            Some(token) => JointKind::from_token(token),
            None => {
                return Err(ParameterError::parse(
                    &row.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(","),
                    format!("row {} has {} columns, 8 expected", line + 1, row.len()),
                ));
            }
        };
        if !kind.is_active() {
            warn!("Row {} has joint type '{}', the chain ends with {} joints",
                line + 1, field(7).unwrap_or(""), raw.len());
            break;
        }
        let mut values = [""; 6];
        for (i, value) in values.iter_mut().enumerate() {
            // Column 0 is the joint number, ignored
            *value = field(i + 1).unwrap_or("");
        }
        raw.push(RawJoint::new(kind, values));
    }
    build_chain(&raw)
}

/// Table rows for the active joints of the chain, header first.
pub fn encode(chain: &Chain) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(chain.effective_length() + 1);
    rows.push(HEADER.iter().map(|s| s.to_string()).collect());
    for (i, joint) in chain.to_raw().iter().enumerate() {
        if !joint.kind.is_active() {
            break;
        }
        let mut row = Vec::with_capacity(HEADER.len());
        row.push((i + 1).to_string());
        row.extend(joint.fields().iter().map(|(_, value)| value.to_string()));
        row.push(joint.kind.token().to_string());
        rows.push(row);
    }
    rows
}

fn summary<S: AsRef<str>>(rows: &[Vec<S>]) -> String {
    match rows.first() {
        Some(header) => header.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(","),
        None => String::new(),
    }
}

#[cfg(feature = "allow_filesystem")]
mod file {
    use std::path::Path;
    use csv::{ReaderBuilder, WriterBuilder};
    use tracing::info;
    use super::{decode, encode};
    use crate::chain::Chain;
    use crate::parameter_error::ParameterError;

    impl Chain {
        /// Read the chain from the CSV file, see [decode] for the format.
        pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self, ParameterError> {
            let path = path.as_ref();
            let mut reader = ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_path(path)?;
            let mut rows = Vec::new();
            for record in reader.records() {
                let record = record?;
                rows.push(record.iter().map(|s| s.to_string()).collect::<Vec<_>>());
            }
            let chain = decode(&rows)?;
            info!("Read {} joints from {}", chain.effective_length(), path.display());
            Ok(chain)
        }

        /// Write the active joints of the chain into the CSV file, see [encode].
        pub fn to_csv_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ParameterError> {
            let path = path.as_ref();
            let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
            for row in encode(self) {
                writer.write_record(&row)?;
            }
            writer.flush()?;
            info!("Written {} joints to {}", self.effective_length(), path.display());
            Ok(())
        }
    }
}
