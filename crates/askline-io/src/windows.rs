//! Win32 console backend.
//!
//! Talks to the legacy console API directly: key events through
//! `ReadConsoleInputW`, line reads through `ReadConsoleW`, output through
//! `WriteConsoleW`, cursor state through the console-info calls.

#[cfg(windows)]
mod imp {
    use std::collections::VecDeque;
    use std::io;
    use std::mem::zeroed;
    use std::sync::Mutex;

    use askline_core::{ConsoleError, ConsoleOutput, ConsoleResult, Key, KeyEvent, KeyInput,
                       LineSource, RawModeGuard};

    type BOOL = i32;
    type HANDLE = isize;
    type DWORD = u32;
    type WORD = u16;
    type WCHAR = u16;
    type SHORT = i16;

    const STD_INPUT_HANDLE: DWORD = 0xFFFF_FFF6; // (DWORD)-10
    const STD_OUTPUT_HANDLE: DWORD = 0xFFFF_FFF5; // (DWORD)-11
    const INVALID_HANDLE_VALUE: HANDLE = -1;

    const KEY_EVENT: WORD = 0x0001;

    // Console mode flags
    const ENABLE_PROCESSED_INPUT: DWORD = 0x0001;
    const ENABLE_LINE_INPUT: DWORD = 0x0002;
    const ENABLE_ECHO_INPUT: DWORD = 0x0004;
    const ENABLE_EXTENDED_FLAGS: DWORD = 0x0080;
    const ENABLE_QUICK_EDIT_MODE: DWORD = 0x0040;

    #[repr(C)]
    #[derive(Copy, Clone)]
    struct COORD {
        X: SHORT,
        Y: SHORT,
    }

    #[repr(C)]
    #[derive(Copy, Clone)]
    struct SMALL_RECT {
        Left: SHORT,
        Top: SHORT,
        Right: SHORT,
        Bottom: SHORT,
    }

    #[repr(C)]
    #[derive(Copy, Clone)]
    struct CONSOLE_SCREEN_BUFFER_INFO {
        dwSize: COORD,
        dwCursorPosition: COORD,
        wAttributes: WORD,
        srWindow: SMALL_RECT,
        dwMaximumWindowSize: COORD,
    }

    #[repr(C)]
    #[derive(Copy, Clone)]
    struct CONSOLE_CURSOR_INFO {
        dwSize: DWORD,
        bVisible: BOOL,
    }

    #[repr(C)]
    #[derive(Copy, Clone)]
    struct KEY_EVENT_RECORD {
        bKeyDown: BOOL,
        wRepeatCount: WORD,
        wVirtualKeyCode: WORD,
        wVirtualScanCode: WORD,
        UnicodeChar: WCHAR, // simplifying union
        dwControlKeyState: DWORD,
    }

    #[repr(C)]
    #[derive(Copy, Clone)]
    struct INPUT_RECORD {
        EventType: WORD,
        _padding: WORD,
        Event: KEY_EVENT_RECORD, // largest member we care about
    }

    extern "system" {
        fn GetStdHandle(nStdHandle: DWORD) -> HANDLE;
        fn GetConsoleMode(hConsoleHandle: HANDLE, lpMode: *mut DWORD) -> BOOL;
        fn SetConsoleMode(hConsoleHandle: HANDLE, dwMode: DWORD) -> BOOL;
        fn ReadConsoleInputW(
            hConsoleInput: HANDLE,
            lpBuffer: *mut INPUT_RECORD,
            nLength: DWORD,
            lpNumberOfEventsRead: *mut DWORD,
        ) -> BOOL;
        fn ReadConsoleW(
            hConsoleInput: HANDLE,
            lpBuffer: *mut WCHAR,
            nNumberOfCharsToRead: DWORD,
            lpNumberOfCharsRead: *mut DWORD,
            pInputControl: *mut std::ffi::c_void,
        ) -> BOOL;
        fn WriteConsoleW(
            hConsoleOutput: HANDLE,
            lpBuffer: *const WCHAR,
            nNumberOfCharsToWrite: DWORD,
            lpNumberOfCharsWritten: *mut DWORD,
            lpReserved: *mut std::ffi::c_void,
        ) -> BOOL;
        fn GetConsoleScreenBufferInfo(
            hConsoleOutput: HANDLE,
            lpConsoleScreenBufferInfo: *mut CONSOLE_SCREEN_BUFFER_INFO,
        ) -> BOOL;
        fn SetConsoleCursorPosition(hConsoleOutput: HANDLE, dwCursorPosition: COORD) -> BOOL;
        fn GetConsoleCursorInfo(
            hConsoleOutput: HANDLE,
            lpConsoleCursorInfo: *mut CONSOLE_CURSOR_INFO,
        ) -> BOOL;
        fn SetConsoleCursorInfo(
            hConsoleOutput: HANDLE,
            lpConsoleCursorInfo: *const CONSOLE_CURSOR_INFO,
        ) -> BOOL;
    }

    fn win_error(context: &str) -> ConsoleError {
        ConsoleError::Io(io::Error::new(io::ErrorKind::Other, context.to_string()))
    }

    pub struct WindowsConsole {
        h_input: HANDLE,
        h_output: HANDLE,
        pending: Mutex<VecDeque<KeyEvent>>,
    }

    impl WindowsConsole {
        pub fn new() -> ConsoleResult<Self> {
            unsafe {
                let h_input = GetStdHandle(STD_INPUT_HANDLE);
                let h_output = GetStdHandle(STD_OUTPUT_HANDLE);
                if h_input == 0 || h_input == INVALID_HANDLE_VALUE {
                    return Err(win_error("GetStdHandle(input) failed"));
                }
                if h_output == 0 || h_output == INVALID_HANDLE_VALUE {
                    return Err(win_error("GetStdHandle(output) failed"));
                }

                // Probing the mode doubles as a console check
                let mut mode: DWORD = 0;
                if GetConsoleMode(h_output, &mut mode as *mut DWORD) == 0 {
                    return Err(ConsoleError::NotATty);
                }

                Ok(Self {
                    h_input,
                    h_output,
                    pending: Mutex::new(VecDeque::new()),
                })
            }
        }

        fn translate_key(ev: &KEY_EVENT_RECORD) -> Option<KeyEvent> {
            if ev.bKeyDown == 0 {
                return None;
            }

            let ch = ev.UnicodeChar;
            if ch != 0 {
                let key = match ch {
                    0x0d | 0x0a => Key::Enter,
                    0x09 => Key::Tab,
                    0x1b => Key::Escape,
                    0x08 => Key::Backspace,
                    0x00 => Key::ControlSpace,
                    0x01 => Key::ControlA,
                    0x02 => Key::ControlB,
                    0x03 => Key::ControlC,
                    0x04 => Key::ControlD,
                    0x05 => Key::ControlE,
                    0x06 => Key::ControlF,
                    0x07 => Key::ControlG,
                    0x0b => Key::ControlK,
                    0x0c => Key::ControlL,
                    0x0e => Key::ControlN,
                    0x0f => Key::ControlO,
                    0x10 => Key::ControlP,
                    0x11 => Key::ControlQ,
                    0x12 => Key::ControlR,
                    0x13 => Key::ControlS,
                    0x14 => Key::ControlT,
                    0x15 => Key::ControlU,
                    0x16 => Key::ControlV,
                    0x17 => Key::ControlW,
                    0x18 => Key::ControlX,
                    0x19 => Key::ControlY,
                    0x1a => Key::ControlZ,
                    0x1c => Key::ControlBackslash,
                    0x1d => Key::ControlSquareClose,
                    0x1e => Key::ControlCircumflex,
                    0x1f => Key::ControlUnderscore,
                    _ => {
                        return char::from_u32(ch as u32).map(KeyEvent::from_char);
                    }
                };
                return Some(KeyEvent::simple(key, vec![]));
            }

            // No character: map the virtual key code
            let key = match ev.wVirtualKeyCode {
                0x21 => Key::PageUp,   // VK_PRIOR
                0x22 => Key::PageDown, // VK_NEXT
                0x23 => Key::End,      // VK_END
                0x24 => Key::Home,     // VK_HOME
                0x25 => Key::Left,     // VK_LEFT
                0x26 => Key::Up,       // VK_UP
                0x27 => Key::Right,    // VK_RIGHT
                0x28 => Key::Down,     // VK_DOWN
                0x2d => Key::Insert,   // VK_INSERT
                0x2e => Key::Delete,   // VK_DELETE
                0x70 => Key::F1,
                0x71 => Key::F2,
                0x72 => Key::F3,
                0x73 => Key::F4,
                0x74 => Key::F5,
                0x75 => Key::F6,
                0x76 => Key::F7,
                0x77 => Key::F8,
                0x78 => Key::F9,
                0x79 => Key::F10,
                0x7a => Key::F11,
                0x7b => Key::F12,
                // Modifier keys pressed on their own
                _ => return None,
            };
            Some(KeyEvent::simple(key, vec![]))
        }

        fn write_utf16(&self, text: &str) -> ConsoleResult<()> {
            let wide: Vec<WCHAR> = text.encode_utf16().collect();
            let mut offset = 0usize;
            while offset < wide.len() {
                let mut written: DWORD = 0;
                let ok = unsafe {
                    WriteConsoleW(
                        self.h_output,
                        wide[offset..].as_ptr(),
                        (wide.len() - offset) as DWORD,
                        &mut written as *mut DWORD,
                        std::ptr::null_mut(),
                    )
                };
                if ok == 0 {
                    return Err(win_error("WriteConsoleW failed"));
                }
                offset += written as usize;
            }
            Ok(())
        }
    }

    impl KeyInput for WindowsConsole {
        fn enable_raw_mode(&self) -> ConsoleResult<RawModeGuard> {
            unsafe {
                let mut mode: DWORD = 0;
                if GetConsoleMode(self.h_input, &mut mode as *mut DWORD) == 0 {
                    return Err(win_error("GetConsoleMode failed"));
                }
                let mut new_mode = mode | ENABLE_EXTENDED_FLAGS;
                new_mode &= !ENABLE_QUICK_EDIT_MODE;
                new_mode &= !(ENABLE_LINE_INPUT | ENABLE_ECHO_INPUT | ENABLE_PROCESSED_INPUT);
                if SetConsoleMode(self.h_input, new_mode) == 0 {
                    return Err(win_error("SetConsoleMode failed"));
                }
                log::trace!("entered raw console mode");

                let h_input = self.h_input;
                Ok(RawModeGuard::new(move || {
                    unsafe {
                        SetConsoleMode(h_input, mode);
                    }
                    log::trace!("restored console mode");
                }))
            }
        }

        fn read_key(&self) -> ConsoleResult<Option<KeyEvent>> {
            loop {
                if let Some(event) = self.pending.lock().unwrap().pop_front() {
                    return Ok(Some(event));
                }

                let mut record: INPUT_RECORD = unsafe { zeroed() };
                let mut read: DWORD = 0;
                let ok = unsafe {
                    ReadConsoleInputW(self.h_input, &mut record as *mut INPUT_RECORD, 1, &mut read)
                };
                if ok == 0 {
                    // Input handle no longer delivers console events
                    return Ok(None);
                }
                if read == 0 {
                    continue;
                }
                if record.EventType != KEY_EVENT {
                    continue;
                }
                if let Some(event) = Self::translate_key(&record.Event) {
                    self.pending.lock().unwrap().push_back(event);
                }
            }
        }
    }

    impl LineSource for WindowsConsole {
        fn read_line(&self) -> ConsoleResult<Option<String>> {
            let mut buf: Vec<WCHAR> = vec![0; 1024];
            let mut read: DWORD = 0;
            let ok = unsafe {
                ReadConsoleW(
                    self.h_input,
                    buf.as_mut_ptr(),
                    buf.len() as DWORD,
                    &mut read as *mut DWORD,
                    std::ptr::null_mut(),
                )
            };
            if ok == 0 || read == 0 {
                return Ok(None);
            }
            let mut line = String::from_utf16_lossy(&buf[..read as usize]);
            if line.ends_with('\n') {
                line.pop();
            }
            if line.ends_with('\r') {
                line.pop();
            }
            Ok(Some(line))
        }
    }

    impl ConsoleOutput for WindowsConsole {
        fn write_text(&self, text: &str) -> ConsoleResult<()> {
            self.write_utf16(text)
        }

        fn move_to_line_start(&self) -> ConsoleResult<()> {
            unsafe {
                let mut info: CONSOLE_SCREEN_BUFFER_INFO = zeroed();
                if GetConsoleScreenBufferInfo(self.h_output, &mut info as *mut _) == 0 {
                    return Err(win_error("GetConsoleScreenBufferInfo failed"));
                }
                let position = COORD {
                    X: 0,
                    Y: info.dwCursorPosition.Y,
                };
                if SetConsoleCursorPosition(self.h_output, position) == 0 {
                    return Err(win_error("SetConsoleCursorPosition failed"));
                }
            }
            Ok(())
        }

        fn set_cursor_visible(&self, visible: bool) -> ConsoleResult<()> {
            unsafe {
                let mut info: CONSOLE_CURSOR_INFO = zeroed();
                if GetConsoleCursorInfo(self.h_output, &mut info as *mut _) == 0 {
                    return Err(win_error("GetConsoleCursorInfo failed"));
                }
                info.bVisible = if visible { 1 } else { 0 };
                if SetConsoleCursorInfo(self.h_output, &info as *const _) == 0 {
                    return Err(win_error("SetConsoleCursorInfo failed"));
                }
            }
            Ok(())
        }

        fn flush(&self) -> ConsoleResult<()> {
            // WriteConsoleW is unbuffered
            Ok(())
        }
    }
}

#[cfg(windows)]
pub use imp::WindowsConsole;
