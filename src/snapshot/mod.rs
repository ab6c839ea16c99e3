//! YAML persistence of a finished profile.
//!
//! The dump carries all raw counters, including the retained sample
//! lists, so a restored collection reports identical derived values.

use std::io::{Read, Write};

use crate::core::error::Result;
use crate::stats::EndpointStat;

/// Serializes the collection to `writer` as YAML.
pub fn dump<W: Write>(stats: &[EndpointStat], writer: W) -> Result<()> {
    serde_yaml::to_writer(writer, stats)?;
    Ok(())
}

/// Restores a collection previously written by [`dump`].
pub fn load<R: Read>(reader: R) -> Result<Vec<EndpointStat>> {
    let stats = serde_yaml::from_reader(reader)?;
    Ok(stats)
}
