//! POSIX/VT console backend.
//!
//! Raw mode through termios, key reads through `poll(2)` + `read(2)` fed
//! into the shared `KeyParser`, output through direct writes of ANSI
//! sequences to stdout.

use std::collections::VecDeque;
use std::io;
use std::os::unix::io::AsRawFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use askline_core::{ConsoleError, ConsoleOutput, ConsoleResult, KeyEvent, KeyInput, KeyParser,
                   LineSource, RawModeGuard};

const SHOW_CURSOR: &[u8] = b"\x1b[?25h";
const HIDE_CURSOR: &[u8] = b"\x1b[?25l";

pub struct UnixConsole {
    stdin_fd: i32,
    stdout_fd: i32,
    parser: Mutex<KeyParser>,
    /// Events decoded but not yet handed out; one read(2) can produce several
    pending: Mutex<VecDeque<KeyEvent>>,
    input_closed: AtomicBool,
}

impl UnixConsole {
    /// Create a console over the process's standard streams.
    ///
    /// Fails with `NotATty` when stdout is not a terminal; input may still
    /// be redirected, in which case reads report end-of-stream once the
    /// source is exhausted.
    pub fn new() -> ConsoleResult<Self> {
        if unsafe { libc::isatty(libc::STDOUT_FILENO) } == 0 {
            return Err(ConsoleError::NotATty);
        }

        Ok(Self {
            stdin_fd: io::stdin().as_raw_fd(),
            stdout_fd: libc::STDOUT_FILENO,
            parser: Mutex::new(KeyParser::new()),
            pending: Mutex::new(VecDeque::new()),
            input_closed: AtomicBool::new(false),
        })
    }

    fn enter_raw_mode(fd: i32) -> io::Result<(libc::termios, i32)> {
        let mut original_termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &mut original_termios) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let mut raw = original_termios;
        raw.c_lflag &= !(libc::ICANON | libc::ECHO | libc::ECHOE | libc::ECHOK | libc::ECHONL | libc::ISIG | libc::IEXTEN);
        raw.c_iflag &= !(libc::IXON | libc::IXOFF | libc::ICRNL | libc::INLCR | libc::IGNCR | libc::BRKINT | libc::PARMRK | libc::ISTRIP);
        raw.c_oflag &= !libc::OPOST;
        raw.c_cflag &= !libc::CSIZE;
        raw.c_cflag |= libc::CS8;
        raw.c_cc[libc::VMIN] = 0; // readiness comes from poll, not the driver
        raw.c_cc[libc::VTIME] = 0;
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &raw) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
        if flags == -1 {
            return Err(io::Error::last_os_error());
        }
        if unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) } == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok((original_termios, flags))
    }

    fn wait_readable(&self) -> ConsoleResult<()> {
        loop {
            let mut poll_fd = libc::pollfd {
                fd: self.stdin_fd,
                events: libc::POLLIN,
                revents: 0,
            };
            let rc = unsafe { libc::poll(&mut poll_fd as *mut libc::pollfd, 1, -1) };
            if rc < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err.into());
            }
            return Ok(());
        }
    }

    fn write_bytes(&self, mut bytes: &[u8]) -> ConsoleResult<()> {
        while !bytes.is_empty() {
            let n = unsafe {
                libc::write(self.stdout_fd, bytes.as_ptr() as *const libc::c_void, bytes.len())
            };
            if n < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err.into());
            }
            bytes = &bytes[n as usize..];
        }
        Ok(())
    }
}

impl KeyInput for UnixConsole {
    fn enable_raw_mode(&self) -> ConsoleResult<RawModeGuard> {
        let (original_termios, original_flags) =
            Self::enter_raw_mode(self.stdin_fd).map_err(ConsoleError::Io)?;
        log::trace!("entered raw mode");

        let stdin_fd = self.stdin_fd;
        let restore_fn = move || {
            unsafe {
                let _ = libc::tcsetattr(stdin_fd, libc::TCSANOW, &original_termios);
                let _ = libc::fcntl(stdin_fd, libc::F_SETFL, original_flags);
            }
            log::trace!("restored terminal mode");
        };

        Ok(RawModeGuard::new(restore_fn))
    }

    fn read_key(&self) -> ConsoleResult<Option<KeyEvent>> {
        loop {
            if let Some(event) = self.pending.lock().unwrap().pop_front() {
                return Ok(Some(event));
            }
            if self.input_closed.load(Ordering::Relaxed) {
                return Ok(None);
            }

            self.wait_readable()?;

            let mut buf = [0u8; 64];
            let n = unsafe {
                libc::read(self.stdin_fd, buf.as_mut_ptr() as *mut libc::c_void, buf.len())
            };
            if n < 0 {
                let err = io::Error::last_os_error();
                match err.kind() {
                    // Raced with another consumer of the fd; poll again
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => continue,
                    _ => return Err(err.into()),
                }
            }

            let mut parser = self.parser.lock().unwrap();
            let events = if n == 0 {
                self.input_closed.store(true, Ordering::Relaxed);
                parser.flush()
            } else {
                parser.feed(&buf[..n as usize])
            };
            drop(parser);

            if !events.is_empty() {
                self.pending.lock().unwrap().extend(events);
            }
            // A partial escape sequence produces no events yet; keep reading.
        }
    }
}

impl LineSource for UnixConsole {
    fn read_line(&self) -> ConsoleResult<Option<String>> {
        // Canonical mode: the driver hands over at most one line per read.
        let mut line: Vec<u8> = Vec::new();
        loop {
            let mut buf = [0u8; 1024];
            let n = unsafe {
                libc::read(self.stdin_fd, buf.as_mut_ptr() as *mut libc::c_void, buf.len())
            };
            if n < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err.into());
            }
            if n == 0 {
                if line.is_empty() {
                    return Ok(None);
                }
                break;
            }
            line.extend_from_slice(&buf[..n as usize]);
            if line.ends_with(b"\n") {
                break;
            }
        }

        if line.ends_with(b"\n") {
            line.pop();
        }
        if line.ends_with(b"\r") {
            line.pop();
        }
        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }
}

impl ConsoleOutput for UnixConsole {
    fn write_text(&self, text: &str) -> ConsoleResult<()> {
        self.write_bytes(text.as_bytes())
    }

    fn move_to_line_start(&self) -> ConsoleResult<()> {
        self.write_bytes(b"\r")
    }

    fn set_cursor_visible(&self, visible: bool) -> ConsoleResult<()> {
        if visible {
            self.write_bytes(SHOW_CURSOR)
        } else {
            self.write_bytes(HIDE_CURSOR)
        }
    }

    fn flush(&self) -> ConsoleResult<()> {
        // Writes go straight to the fd; nothing is held back.
        Ok(())
    }
}
