//! Scripted I²C bus for host tests.
//!
//! Logs every transaction (one inner `Vec` per start..stop) and answers
//! reads from a queue. An empty queue reads as `0xFF`, which is what an
//! idle, pulled-up bus returns.

extern crate std;

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use std::collections::VecDeque;
use std::vec::Vec;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transfer {
    Write(u8, Vec<u8>),
    Read(u8, usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StubError(pub ErrorKind);

impl embedded_hal::i2c::Error for StubError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

#[derive(Default)]
pub struct BusStub {
    pub log: Vec<Vec<Transfer>>,
    reads: VecDeque<Result<u8, ErrorKind>>,
    nack_writes: bool,
    nack_next_writes: usize,
}

impl BusStub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes for upcoming reads.
    pub fn with_reads(mut self, bytes: &[u8]) -> Self {
        self.reads.extend(bytes.iter().map(|&b| Ok(b)));
        self
    }

    pub fn push_read_error(&mut self, kind: ErrorKind) {
        self.reads.push_back(Err(kind));
    }

    /// Make every write fail as if nothing answered the address.
    pub fn set_absent(&mut self, absent: bool) {
        self.nack_writes = absent;
    }

    /// Fail only the next `count` write operations.
    pub fn nack_next_writes(&mut self, count: usize) {
        self.nack_next_writes = count;
    }
}

impl ErrorType for BusStub {
    type Error = StubError;
}

impl I2c for BusStub {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut transfers = Vec::new();
        let mut result = Ok(());

        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    transfers.push(Transfer::Write(address, bytes.to_vec()));
                    let nack_once = self.nack_next_writes > 0;
                    if nack_once {
                        self.nack_next_writes -= 1;
                    }
                    if self.nack_writes || nack_once {
                        result = Err(StubError(ErrorKind::NoAcknowledge(
                            NoAcknowledgeSource::Address,
                        )));
                        break;
                    }
                }
                Operation::Read(buf) => {
                    transfers.push(Transfer::Read(address, buf.len()));
                    for slot in buf.iter_mut() {
                        match self.reads.pop_front().unwrap_or(Ok(0xFF)) {
                            Ok(byte) => *slot = byte,
                            Err(kind) => {
                                result = Err(StubError(kind));
                                break;
                            }
                        }
                    }
                }
            }
        }

        self.log.push(transfers);
        result
    }
}
