//! Mouse and keyboard input for the game window.
//!
//! Uses SendInput, which simulates hardware-level input. Window messages
//! (PostMessage) are ignored by the game, which reads input through its own
//! input layer and validates focus. SendInput moves the real cursor.

use anyhow::{anyhow, Result};
use std::thread;
use std::time::Duration;

use windows::Win32::Foundation::HWND;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_KEYUP, MOUSEEVENTF_ABSOLUTE, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP,
    MOUSEEVENTF_MOVE, MOUSEEVENTF_WHEEL, MOUSEINPUT, MOUSE_EVENT_FLAGS, VIRTUAL_KEY, VK_ESCAPE,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetSystemMetrics, SetForegroundWindow, ShowWindow, SM_CXSCREEN, SM_CYSCREEN, SW_RESTORE,
};

use crate::automation::driver::Key;
use crate::layout::{Point, WindowRect};

/// One wheel notch.
const WHEEL_DELTA: i32 = 120;

/// Brings the window to the foreground and gives it time to activate.
pub fn focus_window(hwnd: HWND) -> Result<()> {
    unsafe {
        let _ = ShowWindow(hwnd, SW_RESTORE);
        if !SetForegroundWindow(hwnd).as_bool() {
            tracing::warn!("SetForegroundWindow failed; input may go to another window");
        }
    }
    thread::sleep(Duration::from_millis(100));
    Ok(())
}

/// Converts a window-relative point to the 0-65535 range used by
/// MOUSEEVENTF_ABSOLUTE.
fn normalized(window: WindowRect, at: Point) -> (i32, i32) {
    let screen_x = window.left + at.x;
    let screen_y = window.top + at.y;

    let screen_width = unsafe { GetSystemMetrics(SM_CXSCREEN) }.max(1);
    let screen_height = unsafe { GetSystemMetrics(SM_CYSCREEN) }.max(1);

    let norm_x = ((screen_x as i64 * 65535) / screen_width as i64) as i32;
    let norm_y = ((screen_y as i64 * 65535) / screen_height as i64) as i32;
    (norm_x, norm_y)
}

fn mouse_input(dx: i32, dy: i32, data: i32, flags: MOUSE_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx,
                dy,
                mouseData: data,
                dwFlags: flags | MOUSEEVENTF_ABSOLUTE | MOUSEEVENTF_MOVE,
                ..Default::default()
            },
        },
    }
}

fn key_input(key: VIRTUAL_KEY, flags: KEYBD_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: key,
                dwFlags: flags,
                ..Default::default()
            },
        },
    }
}

fn send(inputs: &[INPUT]) -> Result<()> {
    let sent = unsafe { SendInput(inputs, std::mem::size_of::<INPUT>() as i32) };
    if sent as usize != inputs.len() {
        return Err(anyhow!(
            "SendInput delivered {} of {} events (blocked by another elevated window?)",
            sent,
            inputs.len()
        ));
    }
    Ok(())
}

/// Left-clicks a window-relative point.
pub fn click_at(window: WindowRect, at: Point) -> Result<()> {
    let (x, y) = normalized(window, at);

    // Move first, then press and release with the position on each event
    send(&[mouse_input(x, y, 0, MOUSE_EVENT_FLAGS(0))])?;
    thread::sleep(Duration::from_millis(50));
    send(&[mouse_input(x, y, 0, MOUSEEVENTF_LEFTDOWN)])?;
    thread::sleep(Duration::from_millis(50));
    send(&[mouse_input(x, y, 0, MOUSEEVENTF_LEFTUP)])
}

/// Turns the wheel at a window-relative point. `distance` is in notches;
/// negative scrolls down.
pub fn scroll_at(window: WindowRect, at: Point, distance: i32) -> Result<()> {
    let (x, y) = normalized(window, at);
    send(&[mouse_input(x, y, distance * WHEEL_DELTA, MOUSEEVENTF_WHEEL)])
}

pub fn press_key(key: Key) -> Result<()> {
    let vk = match key {
        Key::Escape => VK_ESCAPE,
    };
    send(&[key_input(vk, KEYBD_EVENT_FLAGS(0))])?;
    thread::sleep(Duration::from_millis(30));
    send(&[key_input(vk, KEYEVENTF_KEYUP)])
}
