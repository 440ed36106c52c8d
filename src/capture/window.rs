//! Window discovery: finds the game's top-level window by process name.

use anyhow::{anyhow, Result};
use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;

use windows::Win32::Foundation::{BOOL, HWND, LPARAM, RECT, TRUE};
use windows::Win32::System::Threading::{
    OpenProcess, QueryFullProcessImageNameW, PROCESS_NAME_WIN32, PROCESS_QUERY_LIMITED_INFORMATION,
};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetWindowRect, GetWindowTextLengthW, GetWindowTextW, GetWindowThreadProcessId,
    IsWindowVisible,
};

use crate::layout::WindowRect;

/// Returns the executable file name of the process owning `hwnd`.
unsafe fn process_name_of(hwnd: HWND) -> Option<(u32, String)> {
    unsafe {
        let mut process_id: u32 = 0;
        GetWindowThreadProcessId(hwnd, Some(&mut process_id));
        if process_id == 0 {
            return None;
        }

        let process_handle =
            OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, process_id).ok()?;

        let mut name_buf: Vec<u16> = vec![0; 1024];
        let mut len = name_buf.len() as u32;
        let result = QueryFullProcessImageNameW(
            process_handle,
            PROCESS_NAME_WIN32,
            windows::core::PWSTR(name_buf.as_mut_ptr()),
            &mut len,
        );
        let _ = windows::Win32::Foundation::CloseHandle(process_handle);

        if result.is_err() || len == 0 {
            return None;
        }

        let full_path = OsString::from_wide(&name_buf[..len as usize])
            .to_string_lossy()
            .to_string();
        let file_name = full_path
            .rsplit('\\')
            .next()
            .unwrap_or(&full_path)
            .to_string();
        Some((process_id, file_name))
    }
}

/// Finds the main window of the process whose executable is `process_name`
/// (case-insensitive, file name only).
pub fn find_window_by_process(process_name: &str) -> Result<HWND> {
    struct EnumData {
        wanted: String,
        hwnd: Option<HWND>,
    }

    unsafe extern "system" fn enum_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
        unsafe {
            let data = &mut *(lparam.0 as *mut EnumData);

            if !IsWindowVisible(hwnd).as_bool() {
                return TRUE;
            }

            // Windows without a title are not main windows
            let title_len = GetWindowTextLengthW(hwnd);
            if title_len <= 0 {
                return TRUE;
            }
            let mut title_buf: Vec<u16> = vec![0; (title_len + 1) as usize];
            GetWindowTextW(hwnd, &mut title_buf);
            let title = OsString::from_wide(&title_buf[..title_len as usize])
                .to_string_lossy()
                .to_string();

            let Some((process_id, name)) = process_name_of(hwnd) else {
                return TRUE;
            };
            tracing::trace!("  [{}] {} - \"{}\"", process_id, name, title);

            if name.to_lowercase() == data.wanted {
                tracing::info!("Found window \"{}\" of {} (pid {})", title, name, process_id);
                data.hwnd = Some(hwnd);
                return BOOL(0); // Stop enumeration
            }

            TRUE
        }
    }

    tracing::info!("Searching for {} window...", process_name);
    let mut data = EnumData {
        wanted: process_name.to_lowercase(),
        hwnd: None,
    };
    unsafe {
        // EnumWindows reports an error when the callback stops it early
        let _ = EnumWindows(Some(enum_callback), LPARAM(&mut data as *mut _ as isize));
    }

    data.hwnd
        .ok_or_else(|| anyhow!("Could not find {} window. Is the game running?", process_name))
}

/// Window rectangle in absolute screen coordinates.
pub fn get_window_rect(hwnd: HWND) -> Result<WindowRect> {
    let mut rect = RECT::default();
    unsafe { GetWindowRect(hwnd, &mut rect)? };

    Ok(WindowRect::new(
        rect.left,
        rect.top,
        rect.right - rect.left,
        rect.bottom - rect.top,
    ))
}
