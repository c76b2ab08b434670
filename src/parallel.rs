//! Writing all partitions of a mesh: one `.vtu` piece per partition and, for collective
//! writes, a `.pvtu` summary written by the leader.
//!
//! A collective write goes through the same steps on every partition:
//!
//! 1. barrier
//! 2. the leader writes the summary
//! 3. number the overlap nodes and serialize the piece in memory
//! 4. barrier, agreeing on whether steps 2 and 3 succeeded everywhere
//! 5. write the piece to disk
//! 6. barrier, agreeing on whether step 5 succeeded everywhere
//!
//! Every partition must call the same entry point with the same prefix. When any partition
//! fails, all of them stop at the next agreement: the failing ones return their own error
//! and the others return [`Error::PartitionFailed`].

use crate::comm::Comm;
use crate::numbering::NodeNumbering;
use crate::piece::serialize_piece;
use crate::summary::{piece_file_name, serialize_summary, summary_file_name};
use crate::traits::Mesh;
use crate::write_vtk::Encoding;
use crate::Error;

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

/// which partitions take part in a write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// every partition writes its piece, the leader also writes the summary
    #[default]
    Collective,
    /// only the calling partition writes its piece, without synchronization or summary
    Single,
}

/// How to write a mesh.
///
/// ```
/// use mesh_vtk::{Encoding, WriteMode, WriteOptions};
///
/// let options = WriteOptions::new().encoding(Encoding::Base64);
/// assert_eq!(options.mode, WriteMode::Collective);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
    pub encoding: Encoding,
    pub mode: WriteMode,
}

impl WriteOptions {
    /// ascii, collective
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Collective write with ascii payloads.
///
/// Every partition of `comm` must call this. If one of them fails, the others return
/// [`Error::PartitionFailed`] instead of waiting for it.
pub fn write_vtk_files<M, C>(prefix: &str, mesh: &M, comm: &C) -> Result<(), Error>
where
    M: Mesh + ?Sized,
    C: Comm + ?Sized,
{
    write_with_options(prefix, mesh, comm, &WriteOptions::new())
}

/// collective write with base64 binary payloads, failing like [`write_vtk_files`]
pub fn write_binary_vtk_files<M, C>(prefix: &str, mesh: &M, comm: &C) -> Result<(), Error>
where
    M: Mesh + ?Sized,
    C: Comm + ?Sized,
{
    let options = WriteOptions::new().encoding(Encoding::Base64);
    write_with_options(prefix, mesh, comm, &options)
}

/// write only the piece of the calling partition, with ascii payloads
pub fn write_one_vtk_file<M, C>(prefix: &str, mesh: &M, comm: &C) -> Result<(), Error>
where
    M: Mesh + ?Sized,
    C: Comm + ?Sized,
{
    let options = WriteOptions::new().mode(WriteMode::Single);
    write_with_options(prefix, mesh, comm, &options)
}

/// Write a mesh with `prefix` as the path of every file minus rank and extension.
pub fn write_with_options<M, C>(
    prefix: &str,
    mesh: &M,
    comm: &C,
    options: &WriteOptions,
) -> Result<(), Error>
where
    M: Mesh + ?Sized,
    C: Comm + ?Sized,
{
    match options.mode {
        WriteMode::Collective => write_collective(prefix, mesh, comm, options.encoding),
        WriteMode::Single => {
            let numbering = NodeNumbering::overlap(mesh);
            let bytes = serialize_piece(mesh, &numbering, comm.rank(), options.encoding)?;
            write_file(piece_file_name(prefix, comm.rank()), &bytes)
        }
    }
}

fn write_collective<M, C>(prefix: &str, mesh: &M, comm: &C, encoding: Encoding) -> Result<(), Error>
where
    M: Mesh + ?Sized,
    C: Comm + ?Sized,
{
    let t0 = comm.time();

    comm.barrier();
    let summary = if comm.is_leader() {
        serialize_summary(prefix, mesh, comm.size(), encoding)
            .and_then(|summary| write_file(summary_file_name(prefix), &summary))
    } else {
        Ok(())
    };

    let piece = summary.and_then(|_| {
        let numbering = NodeNumbering::overlap(mesh);
        serialize_piece(mesh, &numbering, comm.rank(), encoding)
    });

    let bytes = agree(comm, piece)?;
    let t1 = comm.time();
    if comm.is_leader() {
        log::info!("{prefix}: pieces serialized in {:.6} seconds", t1 - t0);
    }

    let written = write_file(piece_file_name(prefix, comm.rank()), &bytes);

    agree(comm, written)?;
    let t2 = comm.time();
    if comm.is_leader() {
        log::info!("{prefix}: pieces written to disk in {:.6} seconds", t2 - t1);
        log::info!("vtk files {prefix} written in {:.6} seconds", t2 - t0);
    }

    Ok(())
}

/// the local result, once every partition knows whether all of them succeeded
fn agree<C, T>(comm: &C, result: Result<T, Error>) -> Result<T, Error>
where
    C: Comm + ?Sized,
{
    let everyone = comm.all_succeeded(result.is_ok());
    match result {
        Ok(_) if !everyone => {
            log::debug!("partition {} stops after a failure elsewhere", comm.rank());
            Err(Error::PartitionFailed)
        }
        result => result,
    }
}

fn write_file(path: PathBuf, bytes: &[u8]) -> Result<(), Error> {
    let mut file = match File::create(&path) {
        Ok(file) => file,
        Err(source) => return Err(Error::Create { path, source }),
    };
    file.write_all(bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::SerialComm;
    use crate::mesh::{EntityType, MeshBuilder};

    #[test]
    fn options_builder() {
        let options = WriteOptions::new()
            .mode(WriteMode::Single)
            .encoding(Encoding::Base64);
        assert_eq!(options.mode, WriteMode::Single);
        assert_eq!(options.encoding, Encoding::Base64);
        assert_eq!(WriteOptions::default().encoding, Encoding::Ascii);
    }

    #[test]
    fn missing_directory_is_a_create_error() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("missing").join("run");
        let mesh = MeshBuilder::new(1)
            .add_points([[0., 0., 0.], [1., 0., 0.]])
            .add_element(EntityType::Edge, &[0, 1])
            .build()
            .unwrap();

        let result = write_vtk_files(prefix.to_str().unwrap(), &mesh, &SerialComm::new());
        match result {
            Err(Error::Create { path, .. }) => assert!(path.ends_with("run.pvtu")),
            other => panic!("expected a create error, got {other:?}"),
        }
    }
}
