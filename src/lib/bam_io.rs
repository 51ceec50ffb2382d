//! BAM file I/O utilities.
//!
//! Thin wrappers over the noodles BAM reader and writer with consistent
//! error handling and header management. The classification pipeline is
//! single-threaded, so no multithreaded BGZF plumbing is carried here.

use anyhow::{Context, Result};
use noodles::bgzf;
use noodles::sam::Header;
use std::fs::File;
use std::path::Path;

/// Type alias for the single-threaded BAM reader.
pub type BamReader = noodles::bam::io::Reader<bgzf::Reader<File>>;

/// Type alias for the single-threaded BAM writer.
pub type BamWriter = noodles::bam::io::Writer<bgzf::Writer<File>>;

/// Create a BAM reader and read its header.
///
/// # Errors
/// Returns an error if the file cannot be opened or the header cannot be read.
pub fn create_bam_reader<P: AsRef<Path>>(path: P) -> Result<(BamReader, Header)> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref)
        .with_context(|| format!("Failed to open input BAM: {}", path_ref.display()))?;

    let mut reader = noodles::bam::io::Reader::new(file);
    let header = reader
        .read_header()
        .with_context(|| format!("Failed to read header from: {}", path_ref.display()))?;

    Ok((reader, header))
}

/// Create a BAM writer and write the header in one operation.
///
/// # Errors
/// Returns an error if the file cannot be created or the header cannot be written.
pub fn create_bam_writer<P: AsRef<Path>>(path: P, header: &Header) -> Result<BamWriter> {
    let path_ref = path.as_ref();
    let output_file = File::create(path_ref)
        .with_context(|| format!("Failed to create output BAM: {}", path_ref.display()))?;

    let mut writer = noodles::bam::io::Writer::new(output_file);
    writer
        .write_header(header)
        .with_context(|| format!("Failed to write header to: {}", path_ref.display()))?;
    Ok(writer)
}
