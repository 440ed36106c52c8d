//! Administrator rights.
//!
//! The game runs elevated, and Windows drops input sent from a process with
//! lower integrity. The scanner therefore relaunches itself through the UAC
//! prompt when it is not elevated.

use anyhow::Result;

#[cfg(windows)]
pub fn is_elevated() -> bool {
    unsafe { windows::Win32::UI::Shell::IsUserAnAdmin().as_bool() }
}

#[cfg(not(windows))]
pub fn is_elevated() -> bool {
    true
}

/// Quotes one argument for a Windows command line.
#[cfg_attr(not(windows), allow(dead_code))]
fn quote_arg(arg: &str) -> String {
    if !arg.is_empty() && !arg.contains([' ', '\t', '"']) {
        return arg.to_string();
    }
    format!("\"{}\"", arg.replace('"', "\\\""))
}

#[cfg_attr(not(windows), allow(dead_code))]
fn join_args<I: IntoIterator<Item = String>>(args: I) -> String {
    args.into_iter()
        .map(|a| quote_arg(&a))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Starts a new elevated copy of this executable with the same arguments.
/// The caller should exit afterwards.
#[cfg(windows)]
pub fn relaunch_elevated() -> Result<()> {
    use anyhow::{anyhow, Context};
    use windows::core::{w, HSTRING, PCWSTR};
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::Shell::ShellExecuteW;
    use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

    let exe = std::env::current_exe().context("Failed to locate the running executable")?;
    let params = join_args(std::env::args().skip(1));
    tracing::info!("Restarting with administrator rights...");

    let exe = HSTRING::from(exe.as_os_str());
    let params = HSTRING::from(params);
    let result = unsafe {
        ShellExecuteW(
            HWND::default(),
            w!("runas"),
            &exe,
            &params,
            PCWSTR::null(),
            SW_SHOWNORMAL,
        )
    };

    // Values above 32 mean success
    if result.0 as isize <= 32 {
        return Err(anyhow!(
            "Could not restart with administrator rights (code {})",
            result.0 as isize
        ));
    }
    Ok(())
}

#[cfg(not(windows))]
pub fn relaunch_elevated() -> Result<()> {
    anyhow::bail!("Elevation is only supported on Windows")
}
