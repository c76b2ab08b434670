//! Handles to the group of cooperating partitions.
//!
//! A writer only needs to know who it is, how many partitions take part, a way to wait
//! for all of them while agreeing on success, and a clock. [`SerialComm`] covers the
//! single process case, [`ThreadComm`] runs one partition per thread in a single process
//! and `MpiComm` (feature `mpi`) runs one partition per MPI rank.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::time::Instant;

/// Rank, size, barrier and clock of a group of partitions.
pub trait Comm {
    /// id of this partition, `0..size()`
    fn rank(&self) -> usize;

    /// number of partitions in the group
    fn size(&self) -> usize;

    /// block until every partition of the group has called `barrier`
    fn barrier(&self);

    /// Barrier that also combines a status: true on every partition when every partition
    /// passed `true`.
    fn all_succeeded(&self, ok: bool) -> bool;

    /// wall clock time in seconds since an arbitrary fixed point
    fn time(&self) -> f64;

    /// the leader writes everything that exists once per group
    fn is_leader(&self) -> bool {
        self.rank() == 0
    }
}

/// A group with a single partition.
#[derive(Debug, Clone)]
pub struct SerialComm {
    epoch: Instant,
}

impl SerialComm {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SerialComm {
    fn default() -> Self {
        Self::new()
    }
}

impl Comm for SerialComm {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn barrier(&self) {}

    fn all_succeeded(&self, ok: bool) -> bool {
        ok
    }

    fn time(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

/// One member of a group of partitions running on threads of the same process.
///
/// ```
/// use mesh_vtk::{Comm, ThreadComm};
///
/// let handles: Vec<_> = ThreadComm::group(3)
///     .into_iter()
///     .map(|comm| std::thread::spawn(move || {
///         comm.barrier();
///         comm.rank()
///     }))
///     .collect();
///
/// let ranks: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
/// assert_eq!(ranks, vec![0, 1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct ThreadComm {
    rank: usize,
    size: usize,
    barrier: Arc<Barrier>,
    failures: Arc<AtomicUsize>,
    epoch: Instant,
}

impl ThreadComm {
    /// handles for a group of `size` partitions, in rank order
    pub fn group(size: usize) -> Vec<Self> {
        let barrier = Arc::new(Barrier::new(size));
        let failures = Arc::new(AtomicUsize::new(0));
        let epoch = Instant::now();

        (0..size)
            .map(|rank| Self {
                rank,
                size,
                barrier: barrier.clone(),
                failures: failures.clone(),
                epoch,
            })
            .collect()
    }
}

impl Comm for ThreadComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn barrier(&self) {
        self.barrier.wait();
    }

    fn all_succeeded(&self, ok: bool) -> bool {
        if !ok {
            self.failures.fetch_add(1, Ordering::SeqCst);
        }
        self.barrier.wait();
        let failures = self.failures.load(Ordering::SeqCst);

        // everyone has read the count before the leader clears it for the next round
        self.barrier.wait();
        if self.is_leader() {
            self.failures.store(0, Ordering::SeqCst);
        }
        self.barrier.wait();

        failures == 0
    }

    fn time(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

#[cfg(feature = "mpi")]
mod mpi_backend {
    use super::Comm;
    use mpi::collective::SystemOperation;
    use mpi::traits::*;

    /// A group of MPI processes, one partition per rank.
    ///
    /// The MPI environment must be initialized by the caller and outlive the handle.
    ///
    /// ```ignore
    /// let universe = mpi::initialize().unwrap();
    /// let comm = mesh_vtk::MpiComm::new(universe.world());
    /// ```
    #[derive(Debug)]
    pub struct MpiComm<C> {
        comm: C,
    }

    impl<C: Communicator> MpiComm<C> {
        pub fn new(comm: C) -> Self {
            Self { comm }
        }
    }

    impl<C: Communicator> Comm for MpiComm<C> {
        fn rank(&self) -> usize {
            self.comm.rank() as usize
        }

        fn size(&self) -> usize {
            self.comm.size() as usize
        }

        fn barrier(&self) {
            self.comm.barrier();
        }

        fn all_succeeded(&self, ok: bool) -> bool {
            let failed = i32::from(!ok);
            let mut failures = 0i32;
            self.comm
                .all_reduce_into(&failed, &mut failures, SystemOperation::sum());
            failures == 0
        }

        fn time(&self) -> f64 {
            mpi::environment::time()
        }
    }
}

#[cfg(feature = "mpi")]
pub use mpi_backend::MpiComm;
