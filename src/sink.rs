// RAW FILE DESCRIPTOR SINK
// BORROWS A DESCRIPTOR OWNED ELSEWHERE (STDOUT, OR ONE HANDED OVER BY A
// BINDING LAYER). WRITES GO STRAIGHT TO write(2). NEVER CLOSES THE FD.

use std::io;
use std::os::fd::RawFd;

use crate::error::{HeartbeatError, Result};

#[derive(Debug, Clone, Copy)]
pub struct FdSink {
    fd: RawFd,
}

impl FdSink {
    pub fn new(fd: RawFd) -> Result<Self> {
        if fd < 0 {
            return Err(HeartbeatError::InvalidDescriptor(fd));
        }
        Ok(Self { fd })
    }
}

impl io::Write for FdSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = unsafe { libc::write(self.fd, buf.as_ptr() as *const libc::c_void, buf.len()) };
        if n < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(n as usize)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
